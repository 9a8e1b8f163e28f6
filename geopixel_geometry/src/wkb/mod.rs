//! Decoder for GeoPackage geometry blobs.
//!
//! A blob starts with the GeoPackage header (`"GP"`, version, flags, SRS id, optional
//! envelope) followed by an OGC well-known-binary geometry. See [`GeoPackageHeader`] and
//! [`read_wkb`].

mod blob;
mod header;
mod reader;

pub use blob::*;
pub use header::*;
pub use reader::*;
