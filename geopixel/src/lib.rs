//! Job configuration of the `geopixel` command line tool.
//!
//! A job is a YAML document naming an input file, an output file and how the source is
//! turned into pixels. [`config::JobConfig`] parses it and builds the
//! [`geopixel_pipeline::convert::ConversionJob`] that does the work.

pub mod config;
