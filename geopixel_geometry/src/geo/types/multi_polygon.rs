use super::{CompositeGeometryTrait, GeometryTrait, PolygonGeometry};
use crate::draw::PixelMapping;
use anyhow::Result;
use geopixel_core::{Boundaries, Color};
use imageproc::image::RgbaImage;
use std::fmt::Debug;

#[derive(Clone, PartialEq)]
pub struct MultiPolygonGeometry(pub Vec<PolygonGeometry>);

impl GeometryTrait for MultiPolygonGeometry {
	fn verify(&self) -> Result<()> {
		for polygon in &self.0 {
			polygon.verify()?;
		}
		Ok(())
	}

	fn compute_bounds(&self) -> Boundaries {
		let mut bounds = Boundaries::empty();
		for polygon in &self.0 {
			bounds.include(&polygon.compute_bounds());
		}
		bounds
	}

	/// Members are drawn one after another, each with its own bounds check.
	fn rasterize(&self, image: &mut RgbaImage, color: Color, mapping: &PixelMapping) {
		for polygon in &self.0 {
			polygon.rasterize(image, color, mapping);
		}
	}
}

impl CompositeGeometryTrait<PolygonGeometry> for MultiPolygonGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<PolygonGeometry> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<PolygonGeometry> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<PolygonGeometry> {
		self.0
	}
}

impl Debug for MultiPolygonGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(MultiPolygonGeometry, PolygonGeometry);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partially_outside_members_are_skipped_individually() {
		let polygons = MultiPolygonGeometry::from(&[
			[[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]],
			[[[3, 3], [9, 3], [9, 9], [3, 9], [3, 3]]],
		]);
		assert_eq!(polygons.compute_bounds().as_array(), [0.0, 9.0, 0.0, 9.0]);

		let mapping = PixelMapping::new(Boundaries::new(0.0, 4.0, 0.0, 4.0).unwrap(), 5, 5).unwrap();
		let mut image = RgbaImage::new(5, 5);
		polygons.rasterize(&mut image, Color::WHITE, &mapping);
		assert_eq!(image.pixels().filter(|p| p.0[3] > 0).count(), 9);
	}
}
