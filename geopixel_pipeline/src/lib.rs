//! The conversion engine of geopixel.
//!
//! [`transform`] turns raster cell values and feature attributes into colors or 16 bit
//! intensities. [`convert`] drives the readers from `geopixel_container` and
//! `geopixel_geometry`, applies the transforms on all CPUs and writes the resulting PNG
//! files.

pub mod convert;
pub mod transform;
