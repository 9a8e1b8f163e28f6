//! Vector geometry for geopixel: the geometry model with bounds and rasterization, attribute
//! values, the GeoPackage/WKB binary decoder and the GeoJSON loader.

mod geo;
pub mod draw;
pub mod geojson;
pub mod wkb;

pub use geo::*;
