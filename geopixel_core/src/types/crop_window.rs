use anyhow::{Result, ensure};
use std::fmt::Debug;

/// An inclusive pixel rectangle inside a raster: columns `start_x..=end_x`, rows
/// `start_y..=end_y`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
	pub start_x: u32,
	pub start_y: u32,
	pub end_x: u32,
	pub end_y: u32,
}

impl CropWindow {
	pub fn new(start_x: u32, start_y: u32, end_x: u32, end_y: u32) -> Result<CropWindow> {
		ensure!(
			start_x <= end_x && start_y <= end_y,
			"invalid crop window: start ({start_x}, {start_y}) is after end ({end_x}, {end_y})"
		);
		Ok(CropWindow {
			start_x,
			start_y,
			end_x,
			end_y,
		})
	}

	/// The whole image.
	pub fn full(width: u32, height: u32) -> Result<CropWindow> {
		ensure!(width > 0 && height > 0, "image has no pixels ({width}x{height})");
		CropWindow::new(0, 0, width - 1, height - 1)
	}

	/// Checks a user supplied crop: start must be strictly before end on both axes and the
	/// window must lie inside a `width`×`height` image.
	pub fn validate_for(&self, width: u32, height: u32) -> Result<()> {
		ensure!(
			self.start_x < self.end_x,
			"crop start x ({}) must be smaller than end x ({})",
			self.start_x,
			self.end_x
		);
		ensure!(
			self.start_y < self.end_y,
			"crop start y ({}) must be smaller than end y ({})",
			self.start_y,
			self.end_y
		);
		ensure!(
			self.end_x < width && self.end_y < height,
			"crop {self:?} exceeds image size {width}x{height}"
		);
		Ok(())
	}

	#[must_use]
	pub fn width(&self) -> u32 {
		self.end_x - self.start_x + 1
	}

	#[must_use]
	pub fn height(&self) -> u32 {
		self.end_y - self.start_y + 1
	}

	#[must_use]
	pub fn pixel_count(&self) -> usize {
		self.width() as usize * self.height() as usize
	}

	#[must_use]
	pub fn contains(&self, x: u32, y: u32) -> bool {
		x >= self.start_x && x <= self.end_x && y >= self.start_y && y <= self.end_y
	}

	/// True if the half-open block `[x, x+width) × [y, y+height)` touches the window.
	#[must_use]
	pub fn intersects_block(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
		let block_end_x = u64::from(x) + u64::from(width);
		let block_end_y = u64::from(y) + u64::from(height);
		block_end_x > u64::from(self.start_x)
			&& x <= self.end_x
			&& block_end_y > u64::from(self.start_y)
			&& y <= self.end_y
	}
}

impl Debug for CropWindow {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"CropWindow[{}..={}, {}..={}]",
			self.start_x, self.end_x, self.start_y, self.end_y
		)
	}
}
