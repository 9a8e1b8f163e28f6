//! Mappings from raster cells and feature attributes to output pixels.

mod color_table;
mod feature_style;
mod gray16;
mod layer_style;
mod marker;
mod rgb;

pub use color_table::*;
pub use feature_style::*;
pub use gray16::*;
pub use layer_style::*;
pub use marker::*;
pub use rgb::*;
