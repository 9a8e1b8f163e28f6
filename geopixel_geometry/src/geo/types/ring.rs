use super::{CompositeGeometryTrait, Coordinates};
use crate::draw::PixelMapping;
use anyhow::{Result, ensure};
use geopixel_core::Boundaries;
use std::fmt::Debug;

/// A closed ring: at least four coordinates, the first equal to the last.
///
/// Rings only exist as parts of polygons, so they are not drawable on their own.
#[derive(Clone, PartialEq)]
pub struct RingGeometry(pub Vec<Coordinates>);

impl RingGeometry {
	pub fn verify(&self) -> Result<()> {
		ensure!(self.0.len() >= 4, "Ring must have at least 4 points");
		ensure!(self.0.first() == self.0.last(), "Ring must be closed");
		Ok(())
	}

	#[must_use]
	pub fn compute_bounds(&self) -> Boundaries {
		let mut bounds = Boundaries::empty();
		for coord in &self.0 {
			bounds.include_point(coord.x(), coord.y());
		}
		bounds
	}

	#[must_use]
	pub fn to_pixels(&self, mapping: &PixelMapping) -> Vec<(i64, i64)> {
		self.0.iter().map(|c| mapping.to_pixel(c)).collect()
	}
}

impl CompositeGeometryTrait<Coordinates> for RingGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<Coordinates> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<Coordinates> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<Coordinates> {
		self.0
	}
}

impl Debug for RingGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(RingGeometry, Coordinates);
