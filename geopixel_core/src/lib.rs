//! Shared building blocks of the geopixel crates: byte decoding, boundaries, colors, crop
//! windows, value remapping, thread partitioning and progress reporting.

mod concurrency;
pub use concurrency::*;

pub mod io;

mod math;
pub use math::*;

pub mod progress;

pub mod types;
pub use types::*;
