use crate::Coordinates;
use anyhow::{Result, ensure};
use geopixel_core::{Boundaries, coordinate_to_pixel};

/// Maps source coordinates inside `bounds` onto a `width`×`height` pixel grid.
///
/// `min_x` lands on column 0 and `max_x` on column `width - 1`; likewise `min_y` lands on
/// row 0, so north-up output needs a vertical flip afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelMapping {
	bounds: Boundaries,
	width: u32,
	height: u32,
}

impl PixelMapping {
	pub fn new(bounds: Boundaries, width: u32, height: u32) -> Result<PixelMapping> {
		ensure!(width > 0 && height > 0, "output size {width}x{height} has no pixels");
		ensure!(bounds.is_valid(), "boundaries {bounds} are not valid");
		Ok(PixelMapping { bounds, width, height })
	}

	#[must_use]
	pub fn bounds(&self) -> &Boundaries {
		&self.bounds
	}

	#[must_use]
	pub fn width(&self) -> u32 {
		self.width
	}

	#[must_use]
	pub fn height(&self) -> u32 {
		self.height
	}

	#[must_use]
	pub fn contains(&self, coord: &Coordinates) -> bool {
		self.bounds.contains_point(coord.x(), coord.y())
	}

	#[must_use]
	pub fn to_pixel(&self, coord: &Coordinates) -> (i64, i64) {
		(
			coordinate_to_pixel(coord.x(), self.bounds.min_x, self.bounds.max_x, self.width),
			coordinate_to_pixel(coord.y(), self.bounds.min_y, self.bounds.max_y, self.height),
		)
	}

	/// The pixel rectangle covered by `bounds`, clamped to the grid.
	#[must_use]
	pub fn to_pixel_box(&self, bounds: &Boundaries) -> PixelBox {
		let (x0, y0) = self.to_pixel(&Coordinates::new(bounds.min_x, bounds.min_y));
		let (x1, y1) = self.to_pixel(&Coordinates::new(bounds.max_x, bounds.max_y));
		let clamp_x = |v: i64| v.clamp(0, i64::from(self.width) - 1) as u32;
		let clamp_y = |v: i64| v.clamp(0, i64::from(self.height) - 1) as u32;
		PixelBox {
			min_x: clamp_x(x0.min(x1)),
			min_y: clamp_y(y0.min(y1)),
			max_x: clamp_x(x0.max(x1)),
			max_y: clamp_y(y0.max(y1)),
		}
	}
}

/// Inclusive rectangle of pixel positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBox {
	pub min_x: u32,
	pub min_y: u32,
	pub max_x: u32,
	pub max_y: u32,
}

impl PixelBox {
	#[must_use]
	pub fn contains(&self, x: u32, y: u32) -> bool {
		x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
	}

	/// All positions, row by row.
	pub fn positions(&self) -> impl Iterator<Item = (u32, u32)> + use<> {
		let (min_x, max_x) = (self.min_x, self.max_x);
		(self.min_y..=self.max_y).flat_map(move |y| (min_x..=max_x).map(move |x| (x, y)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn mapping() -> PixelMapping {
		PixelMapping::new(Boundaries::new(0.0, 10.0, -5.0, 5.0).unwrap(), 11, 21).unwrap()
	}

	#[rstest]
	#[case(0.0, -5.0, (0, 0))]
	#[case(10.0, 5.0, (10, 20))]
	#[case(5.0, 0.0, (5, 10))]
	#[case(2.26, -4.74, (2, 1))]
	fn maps_corners_and_center(#[case] x: f64, #[case] y: f64, #[case] expected: (i64, i64)) {
		assert_eq!(mapping().to_pixel(&Coordinates::new(x, y)), expected);
	}

	#[test]
	fn rejects_empty_grid() {
		assert!(PixelMapping::new(Boundaries::new(0.0, 1.0, 0.0, 1.0).unwrap(), 0, 5).is_err());
		assert!(PixelMapping::new(Boundaries::empty(), 5, 5).is_err());
	}

	#[test]
	fn pixel_box_is_clamped() {
		let pixel_box = mapping().to_pixel_box(&Boundaries::new(-3.0, 4.0, 0.0, 50.0).unwrap());
		assert_eq!(
			pixel_box,
			PixelBox {
				min_x: 0,
				min_y: 10,
				max_x: 4,
				max_y: 20
			}
		);
		assert_eq!(pixel_box.positions().count(), 5 * 11);
		assert!(pixel_box.contains(4, 20));
		assert!(!pixel_box.contains(5, 20));
	}
}
