//! Low level drawing into packed RGBA canvases.
//!
//! Geometries are mapped from source coordinates to pixels through a [`PixelMapping`]
//! and drawn with `imageproc`. Pixel writes replace the existing value, they do not blend.

mod backup;
mod mapping;
mod primitives;

pub use backup::*;
pub use mapping::*;
pub use primitives::*;
