use super::*;
use crate::draw::{PixelBackup, PixelMapping, fill_ring};
use anyhow::{Result, ensure};
use geopixel_core::{Boundaries, Color};
use imageproc::image::RgbaImage;
use std::fmt::Debug;

/// An exterior ring followed by zero or more interior rings (holes).
#[derive(Clone, PartialEq)]
pub struct PolygonGeometry(pub Vec<RingGeometry>);

impl PolygonGeometry {
	#[must_use]
	pub fn exterior(&self) -> Option<&RingGeometry> {
		self.0.first()
	}

	pub fn holes(&self) -> impl Iterator<Item = &RingGeometry> {
		self.0.iter().skip(1)
	}
}

impl GeometryTrait for PolygonGeometry {
	fn verify(&self) -> Result<()> {
		ensure!(!self.0.is_empty(), "Polygon must have at least one ring");
		for ring in &self.0 {
			ring.verify()?;
		}
		Ok(())
	}

	/// The bounds of the exterior ring; holes lie inside it.
	fn compute_bounds(&self) -> Boundaries {
		self.exterior().map_or_else(Boundaries::empty, RingGeometry::compute_bounds)
	}

	/// Fills the exterior ring, then punches every hole out with full transparency.
	///
	/// Polygons that are not completely inside the mapped boundaries are skipped. Pixels
	/// that other shapes drew inside a hole before this polygon are put back, so a hole
	/// only ever erases this polygon's own fill.
	fn rasterize(&self, image: &mut RgbaImage, color: Color, mapping: &PixelMapping) {
		let Some(exterior) = self.exterior() else {
			return;
		};
		let bounds = exterior.compute_bounds();
		if !bounds.is_valid() || !mapping.bounds().contains(&bounds) {
			return;
		}

		let has_holes = self.0.len() > 1;
		let backup = if has_holes {
			PixelBackup::capture(image, &mapping.to_pixel_box(&bounds))
		} else {
			PixelBackup::default()
		};

		fill_ring(image, &exterior.to_pixels(mapping), color);

		for hole in self.holes() {
			fill_ring(image, &hole.to_pixels(mapping), Color::TRANSPARENT);
			if !backup.is_empty() {
				backup.restore_cleared(image, &mapping.to_pixel_box(&hole.compute_bounds()));
			}
		}
	}
}

impl CompositeGeometryTrait<RingGeometry> for PolygonGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<RingGeometry> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<RingGeometry> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<RingGeometry> {
		self.0
	}
}

impl Debug for PolygonGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(PolygonGeometry, RingGeometry);

#[cfg(test)]
mod tests {
	use super::*;

	const RED: Color = Color::new(255, 0, 0, 255);
	const BLUE: Color = Color::new(0, 0, 255, 255);

	fn mapping() -> PixelMapping {
		PixelMapping::new(Boundaries::new(0.0, 19.0, 0.0, 19.0).unwrap(), 20, 20).unwrap()
	}

	fn square(min: f64, max: f64) -> Vec<[f64; 2]> {
		vec![[min, min], [max, min], [max, max], [min, max], [min, min]]
	}

	fn count(image: &RgbaImage, color: Color) -> usize {
		image.pixels().filter(|p| p.0 == color.0).count()
	}

	#[test]
	fn verify() {
		assert!(PolygonGeometry::new().verify().is_err());
		assert!(PolygonGeometry::from(vec![square(0.0, 1.0)]).verify().is_ok());
		assert!(PolygonGeometry::from(vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]).verify().is_err());
	}

	#[test]
	fn bounds_come_from_exterior() {
		let polygon = PolygonGeometry::from(vec![square(1.0, 5.0), square(2.0, 3.0)]);
		assert_eq!(polygon.compute_bounds().as_array(), [1.0, 5.0, 1.0, 5.0]);
		assert_eq!(polygon.holes().count(), 1);
	}

	#[test]
	fn fills_without_holes() {
		let mut image = RgbaImage::new(20, 20);
		PolygonGeometry::from(vec![square(2.0, 6.0)]).rasterize(&mut image, RED, &mapping());
		assert_eq!(count(&image, RED), 25);
	}

	#[test]
	fn polygon_outside_boundaries_is_skipped() {
		let mut image = RgbaImage::new(20, 20);
		PolygonGeometry::from(vec![square(15.0, 25.0)]).rasterize(&mut image, RED, &mapping());
		assert_eq!(count(&image, RED), 0);
	}

	#[test]
	fn hole_is_punched_out() {
		let mut image = RgbaImage::new(20, 20);
		PolygonGeometry::from(vec![square(2.0, 12.0), square(5.0, 9.0)]).rasterize(&mut image, RED, &mapping());
		assert_eq!(image.get_pixel(7, 7).0, [0, 0, 0, 0]);
		assert_eq!(image.get_pixel(3, 3).0, RED.0);
		assert_eq!(count(&image, RED), 121 - 25);
	}

	#[test]
	fn hole_restores_earlier_shapes() {
		let mut image = RgbaImage::new(20, 20);
		let inner = PolygonGeometry::from(vec![square(6.0, 8.0)]);
		inner.rasterize(&mut image, BLUE, &mapping());
		assert_eq!(count(&image, BLUE), 9);

		let outer = PolygonGeometry::from(vec![square(2.0, 12.0), square(5.0, 9.0)]);
		outer.rasterize(&mut image, RED, &mapping());

		for y in 6..=8 {
			for x in 6..=8 {
				assert_eq!(image.get_pixel(x, y).0, BLUE.0);
			}
		}
		assert_eq!(count(&image, BLUE), 9);
		assert_eq!(image.get_pixel(5, 7).0, [0, 0, 0, 0]);
		assert_eq!(count(&image, RED), 121 - 25);
	}
}
