//! Delimited text tables with point coordinates.

mod table;

pub use table::*;
