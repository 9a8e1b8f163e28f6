use super::{Coordinates, GeometryTrait};
use crate::draw::{PixelMapping, draw_pixel};
use geopixel_core::{Boundaries, Color};
use imageproc::image::RgbaImage;
use std::fmt::Debug;

/// A single position.
#[derive(Clone, PartialEq)]
pub struct PointGeometry(pub Coordinates);

impl PointGeometry {
	#[must_use]
	pub fn new(c: Coordinates) -> Self {
		Self(c)
	}
	#[must_use]
	pub fn x(&self) -> f64 {
		self.0.x()
	}
	#[must_use]
	pub fn y(&self) -> f64 {
		self.0.y()
	}
	#[must_use]
	pub fn as_coord(&self) -> &Coordinates {
		&self.0
	}
}

impl GeometryTrait for PointGeometry {
	fn verify(&self) -> anyhow::Result<()> {
		Ok(())
	}

	fn compute_bounds(&self) -> Boundaries {
		let mut bounds = Boundaries::empty();
		bounds.include_point(self.x(), self.y());
		bounds
	}

	/// Points outside the mapped boundaries are skipped.
	fn rasterize(&self, image: &mut RgbaImage, color: Color, mapping: &PixelMapping) {
		if mapping.contains(&self.0) {
			draw_pixel(image, mapping.to_pixel(&self.0), color);
		}
	}
}

impl Debug for PointGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

impl<T> From<T> for PointGeometry
where
	Coordinates: From<T>,
{
	fn from(value: T) -> Self {
		Self(Coordinates::from(value))
	}
}
