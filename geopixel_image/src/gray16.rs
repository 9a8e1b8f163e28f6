use anyhow::{Result, anyhow, ensure};
use image::{DynamicImage, ImageBuffer, Luma};

/// A single channel image with 16 bit intensities, row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Gray16Image {
	width: u32,
	height: u32,
	data: Vec<u16>,
}

impl Gray16Image {
	pub fn new(width: u32, height: u32) -> Gray16Image {
		Gray16Image {
			width,
			height,
			data: vec![0; width as usize * height as usize],
		}
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn values(&self) -> &[u16] {
		&self.data
	}

	pub fn set(&mut self, index: usize, value: u16) {
		self.data[index] = value;
	}

	pub fn get(&self, index: usize) -> u16 {
		self.data[index]
	}

	/// Copies all values of `band` into this image, starting at pixel `offset`. Empty bands
	/// are ignored.
	pub fn write_band(&mut self, offset: usize, band: &Gray16Image) -> Result<()> {
		if band.data.is_empty() {
			return Ok(());
		}
		let end = offset + band.data.len();
		ensure!(
			end <= self.data.len(),
			"band of {} pixels at offset {offset} exceeds image of {} pixels",
			band.data.len(),
			self.data.len()
		);
		self.data[offset..end].copy_from_slice(&band.data);
		Ok(())
	}

	pub fn to_dynamic_image(&self, flip_y: bool) -> Result<DynamicImage> {
		let mut image: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(self.width, self.height, self.data.clone())
			.ok_or_else(|| anyhow!("pixel buffer does not match {}x{}", self.width, self.height))?;
		if flip_y {
			image::imageops::flip_vertical_in_place(&mut image);
		}
		Ok(DynamicImage::ImageLuma16(image))
	}
}
