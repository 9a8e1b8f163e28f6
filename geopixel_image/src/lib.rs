//! Output buffers of geopixel and their PNG encoding.
//!
//! Raster conversions produce channel-major [`PlanarImage`]s or single channel
//! [`Gray16Image`]s; vector conversions draw into a packed [`RgbaImage`]. All of them end
//! up as a [`DynamicImage`] that is written with [`write_png`].

mod gray16;
mod planar;
mod png;

pub use gray16::*;
pub use planar::*;
pub use png::*;

pub use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, Rgba, RgbaImage, imageops::flip_vertical_in_place};
