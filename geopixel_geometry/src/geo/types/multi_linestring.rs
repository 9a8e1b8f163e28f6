use super::{CompositeGeometryTrait, GeometryTrait, LineStringGeometry};
use crate::draw::PixelMapping;
use anyhow::Result;
use geopixel_core::{Boundaries, Color};
use imageproc::image::RgbaImage;
use std::fmt::Debug;

#[derive(Clone, PartialEq)]
pub struct MultiLineStringGeometry(pub Vec<LineStringGeometry>);

impl GeometryTrait for MultiLineStringGeometry {
	fn verify(&self) -> Result<()> {
		for line in &self.0 {
			line.verify()?;
		}
		Ok(())
	}

	fn compute_bounds(&self) -> Boundaries {
		let mut bounds = Boundaries::empty();
		for line in &self.0 {
			bounds.include(&line.compute_bounds());
		}
		bounds
	}

	fn rasterize(&self, image: &mut RgbaImage, color: Color, mapping: &PixelMapping) {
		for line in &self.0 {
			line.rasterize(image, color, mapping);
		}
	}
}

impl CompositeGeometryTrait<LineStringGeometry> for MultiLineStringGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<LineStringGeometry> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<LineStringGeometry> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<LineStringGeometry> {
		self.0
	}
}

impl Debug for MultiLineStringGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(MultiLineStringGeometry, LineStringGeometry);
