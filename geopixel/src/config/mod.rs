//! YAML job configuration.
//!
//! - [`JobConfig`]: top-level document with input, output and the `source` section
//! - [`RasterConfig`]: TIFF rasters
//! - [`CsvConfig`]: CSV point tables
//! - [`GeoJsonConfig`] and [`GeoPackageConfig`]: vector features

mod common;
mod job;
mod raster;
mod vector;

pub use common::{BoundariesConfig, ColorEntry};
pub use job::{JobConfig, SourceConfig};
pub use raster::{CropConfig, RasterConfig, RasterModeConfig, ScaleConfig, TilesConfig};
pub use vector::{CsvConfig, FeatureStyleConfig, GeoJsonConfig, GeoPackageConfig, PointStyleConfig};
