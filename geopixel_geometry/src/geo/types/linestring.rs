use super::{CompositeGeometryTrait, Coordinates, GeometryTrait};
use crate::draw::{PixelMapping, draw_segment};
use anyhow::{Result, ensure};
use geopixel_core::{Boundaries, Color};
use imageproc::image::RgbaImage;
use std::fmt::Debug;

#[derive(Clone, PartialEq)]
pub struct LineStringGeometry(pub Vec<Coordinates>);

impl GeometryTrait for LineStringGeometry {
	fn verify(&self) -> Result<()> {
		ensure!(self.0.len() >= 2, "LineString must have at least two points");
		Ok(())
	}

	fn compute_bounds(&self) -> Boundaries {
		let mut bounds = Boundaries::empty();
		for coord in &self.0 {
			bounds.include_point(coord.x(), coord.y());
		}
		bounds
	}

	/// Draws every segment whose two endpoints lie within the boundaries. Segments leaving
	/// the boundaries are dropped entirely.
	fn rasterize(&self, image: &mut RgbaImage, color: Color, mapping: &PixelMapping) {
		for pair in self.0.windows(2) {
			if mapping.contains(&pair[0]) && mapping.contains(&pair[1]) {
				draw_segment(image, mapping.to_pixel(&pair[0]), mapping.to_pixel(&pair[1]), color);
			}
		}
	}
}

impl CompositeGeometryTrait<Coordinates> for LineStringGeometry {
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

impl Debug for LineStringGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(LineStringGeometry, Coordinates);
