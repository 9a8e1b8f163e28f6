//! Readers for the source formats of geopixel.
//!
//! - [`raster`]: stripped and tiled TIFF rasters, streamed in parallel bands
//! - [`tabular`]: CSV tables with point coordinates
//! - [`geopackage`]: GeoPackage feature layers, decoded and styled in parallel
//!
//! GeoJSON documents are read by `geopixel_geometry::geojson`.

pub mod geopackage;
pub mod raster;
pub mod tabular;

#[cfg(any(test, feature = "test"))]
pub mod testing;
