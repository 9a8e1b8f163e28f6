use super::PixelBox;
use imageproc::image::{Rgba, RgbaImage};

/// Non-transparent pixels captured from a region of a canvas.
///
/// Used by polygons with holes: pixels drawn earlier by other shapes are captured before
/// the exterior ring is filled and put back after a hole has been punched out.
#[derive(Debug, Default)]
pub struct PixelBackup {
	pixels: Vec<(u32, u32, Rgba<u8>)>,
}

impl PixelBackup {
	#[must_use]
	pub fn capture(image: &RgbaImage, region: &PixelBox) -> PixelBackup {
		let pixels = region
			.positions()
			.filter(|(x, y)| *x < image.width() && *y < image.height())
			.filter_map(|(x, y)| {
				let pixel = *image.get_pixel(x, y);
				(pixel.0 != [0, 0, 0, 0]).then_some((x, y, pixel))
			})
			.collect();
		PixelBackup { pixels }
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.pixels.is_empty()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.pixels.len()
	}

	/// Restores captured pixels inside `region` that are fully transparent now.
	pub fn restore_cleared(&self, image: &mut RgbaImage, region: &PixelBox) {
		for (x, y, pixel) in &self.pixels {
			if region.contains(*x, *y) && image.get_pixel(*x, *y).0 == [0, 0, 0, 0] {
				image.put_pixel(*x, *y, *pixel);
			}
		}
	}
}
