//! GeoPackage feature layers: layer listing and decoding of all shapes of a layer.

mod layer;
mod reader;

pub use layer::*;
pub use reader::*;
