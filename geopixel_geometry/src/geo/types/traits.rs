use crate::draw::PixelMapping;
use anyhow::Result;
use geopixel_core::{Boundaries, Color};
use imageproc::image::RgbaImage;
use std::fmt::Debug;

/// Common interface of all geometry primitives.
pub trait GeometryTrait: Debug + Clone + Sized {
	/// Checks structural validity, e.g. that polygon rings are closed and have at least four
	/// points.
	fn verify(&self) -> Result<()>;

	/// Bounding box of all coordinates; [`Boundaries::empty`] for an empty geometry.
	fn compute_bounds(&self) -> Boundaries;

	/// Draws the geometry into `image` with `color`. Parts outside the mapped boundaries are
	/// skipped, not clipped.
	fn rasterize(&self, image: &mut RgbaImage, color: Color, mapping: &PixelMapping);
}

/// Geometries that are lists of simpler elements: a polygon of rings, a multi-line of lines.
pub trait CompositeGeometryTrait<Item>: Debug + Clone {
	fn new() -> Self;

	fn as_vec(&self) -> &Vec<Item>;

	fn as_mut_vec(&mut self) -> &mut Vec<Item>;

	fn into_inner(self) -> Vec<Item>;

	fn is_empty(&self) -> bool {
		self.as_vec().is_empty()
	}

	fn len(&self) -> usize {
		self.as_vec().len()
	}

	fn push(&mut self, item: Item) {
		self.as_mut_vec().push(item);
	}

	fn first(&self) -> Option<&Item> {
		self.as_vec().first()
	}

	fn last(&self) -> Option<&Item> {
		self.as_vec().last()
	}
}
