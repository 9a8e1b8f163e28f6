//! Value types shared between readers, geometries and the conversion pipeline.

mod boundaries;
mod color;
mod crop_window;

pub use boundaries::*;
pub use color::*;
pub use crop_window::*;
