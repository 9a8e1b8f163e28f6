use anyhow::{Result, anyhow, ensure};
use geopixel_core::Color;
use image::{DynamicImage, RgbaImage};

/// An RGBA image stored as four planes: all red values, then all green values, and so on.
///
/// The value of channel `c` of pixel `i` lives at `data[i + c * pixel_count]`. Pixels are
/// numbered row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarImage {
	width: u32,
	height: u32,
	data: Vec<u8>,
}

impl PlanarImage {
	/// A fully transparent image.
	pub fn new(width: u32, height: u32) -> PlanarImage {
		PlanarImage {
			width,
			height,
			data: vec![0; width as usize * height as usize * 4],
		}
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn pixel_count(&self) -> usize {
		self.width as usize * self.height as usize
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	pub fn set_pixel(&mut self, index: usize, color: Color) {
		let count = self.pixel_count();
		for (channel, value) in color.0.into_iter().enumerate() {
			self.data[index + channel * count] = value;
		}
	}

	pub fn pixel(&self, index: usize) -> Color {
		let count = self.pixel_count();
		Color([
			self.data[index],
			self.data[index + count],
			self.data[index + 2 * count],
			self.data[index + 3 * count],
		])
	}

	/// Copies all pixels of `band` into this image, starting at pixel `offset`. Empty bands
	/// are ignored.
	pub fn write_band(&mut self, offset: usize, band: &PlanarImage) -> Result<()> {
		let count = self.pixel_count();
		let band_count = band.pixel_count();
		if band_count == 0 {
			return Ok(());
		}
		ensure!(
			offset + band_count <= count,
			"band of {band_count} pixels at offset {offset} exceeds image of {count} pixels"
		);
		for channel in 0..4 {
			let source = &band.data[channel * band_count..(channel + 1) * band_count];
			let start = channel * count + offset;
			self.data[start..start + band_count].copy_from_slice(source);
		}
		Ok(())
	}

	/// Interleaves the planes into a packed RGBA image, optionally mirrored vertically.
	pub fn to_rgba_image(&self, flip_y: bool) -> Result<RgbaImage> {
		let count = self.pixel_count();
		let mut packed = Vec::with_capacity(count * 4);
		for index in 0..count {
			packed.extend(self.pixel(index).0);
		}
		let mut image = RgbaImage::from_raw(self.width, self.height, packed)
			.ok_or_else(|| anyhow!("pixel buffer does not match {}x{}", self.width, self.height))?;
		if flip_y {
			image::imageops::flip_vertical_in_place(&mut image);
		}
		Ok(image)
	}

	pub fn to_dynamic_image(&self, flip_y: bool) -> Result<DynamicImage> {
		Ok(DynamicImage::ImageRgba8(self.to_rgba_image(flip_y)?))
	}
}
