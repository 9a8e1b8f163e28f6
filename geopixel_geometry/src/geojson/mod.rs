//! GeoJSON input: a `FeatureCollection` document is turned into [`crate::Shape`]s plus one
//! [`crate::GeoProperties`] per feature.

mod parse;
mod read;

pub use parse::*;
pub use read::*;
