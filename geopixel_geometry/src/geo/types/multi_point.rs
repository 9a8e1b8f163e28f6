use super::{CompositeGeometryTrait, GeometryTrait, PointGeometry};
use crate::draw::PixelMapping;
use anyhow::Result;
use geopixel_core::{Boundaries, Color};
use imageproc::image::RgbaImage;
use std::fmt::Debug;

#[derive(Clone, PartialEq)]
pub struct MultiPointGeometry(pub Vec<PointGeometry>);

impl GeometryTrait for MultiPointGeometry {
	fn verify(&self) -> Result<()> {
		Ok(())
	}

	fn compute_bounds(&self) -> Boundaries {
		let mut bounds = Boundaries::empty();
		for point in &self.0 {
			bounds.include_point(point.x(), point.y());
		}
		bounds
	}

	fn rasterize(&self, image: &mut RgbaImage, color: Color, mapping: &PixelMapping) {
		for point in &self.0 {
			point.rasterize(image, color, mapping);
		}
	}
}

impl CompositeGeometryTrait<PointGeometry> for MultiPointGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<PointGeometry> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<PointGeometry> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<PointGeometry> {
		self.0
	}
}

impl Debug for MultiPointGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(MultiPointGeometry, PointGeometry);
