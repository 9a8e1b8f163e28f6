#![allow(clippy::module_inception)]

mod geometry;
mod properties;
mod shape;
mod types;
mod value;

pub use geometry::*;
pub use properties::*;
pub use shape::*;
pub use types::*;
pub use value::*;
