//! Reading of stripped and tiled TIFF rasters.
//!
//! A [`RasterReader`] shares one decoder between its worker threads. Raw chunk reads are
//! serialized through a lock, converting the samples and visiting the cells runs in
//! parallel. Every worker owns one horizontal band of the requested window, so callers
//! can collect per-band output without further synchronisation.

mod chunk;
mod extract;
mod properties;
mod reader;

pub use chunk::*;
pub use properties::*;
pub use reader::*;
