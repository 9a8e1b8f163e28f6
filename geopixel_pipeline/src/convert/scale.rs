use anyhow::{Result, ensure};
use geopixel_core::{
	progress::{ProgressSink, SliceProgress},
	run_partitioned,
};

/// Resampling applied to raw raster values before they are transformed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScaleMode {
	#[default]
	None,
	/// Average `n`×`n` blocks into one pixel.
	Decrease(u32),
	/// Repeat every pixel as an `n`×`n` block.
	Increase(u32),
}

impl ScaleMode {
	pub fn validate(&self) -> Result<()> {
		if let ScaleMode::Decrease(factor) | ScaleMode::Increase(factor) = self {
			ensure!(*factor >= 1, "scale factor must be at least 1, found {factor}");
		}
		Ok(())
	}

	pub fn is_none(&self) -> bool {
		matches!(self, ScaleMode::None)
	}

	/// Output size for a `width`×`height` input.
	pub fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
		match *self {
			ScaleMode::None => (width, height),
			ScaleMode::Decrease(factor) => (width.div_ceil(factor), height.div_ceil(factor)),
			ScaleMode::Increase(factor) => (width * factor, height * factor),
		}
	}
}

/// A row-major grid of raw values.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueGrid {
	pub width: u32,
	pub height: u32,
	pub values: Vec<f64>,
}

impl ValueGrid {
	/// Smallest and largest value, NaN ignored.
	pub fn min_max(&self) -> Option<(f64, f64)> {
		self.values.iter().filter(|v| !v.is_nan()).fold(None, |acc, &v| match acc {
			None => Some((v, v)),
			Some((min, max)) => Some((min.min(v), max.max(v))),
		})
	}

	/// Resamples the grid on `threads` workers, each producing a band of output rows.
	pub fn scale(&self, mode: ScaleMode, threads: usize, progress: &dyn ProgressSink) -> Result<ValueGrid> {
		mode.validate()?;
		let (width, height) = mode.output_size(self.width, self.height);
		if mode.is_none() {
			return Ok(self.clone());
		}

		let bands = run_partitioned(0..height as usize, threads, |slice, rows| {
			let slice_progress = SliceProgress::new(progress, slice);
			let total = rows.len();
			let mut band = Vec::with_capacity(total * width as usize);
			for (done, y) in rows.enumerate() {
				for x in 0..width as usize {
					band.push(self.scaled_value(mode, x, y));
				}
				slice_progress.update(done + 1, total);
			}
			Ok(band)
		})?;

		Ok(ValueGrid {
			width,
			height,
			values: bands.into_iter().flatten().collect(),
		})
	}

	fn scaled_value(&self, mode: ScaleMode, x: usize, y: usize) -> f64 {
		let raw_width = self.width as usize;
		let raw_height = self.height as usize;
		match mode {
			ScaleMode::None => self.values[y * raw_width + x],
			ScaleMode::Increase(factor) => {
				let factor = factor as usize;
				self.values[(y / factor) * raw_width + x / factor]
			}
			ScaleMode::Decrease(factor) => {
				let factor = factor as usize;
				let mut sum = 0.0;
				let mut count = 0usize;
				for raw_y in (y * factor..(y + 1) * factor).take_while(|v| *v < raw_height) {
					for raw_x in (x * factor..(x + 1) * factor).take_while(|v| *v < raw_width) {
						sum += self.values[raw_y * raw_width + raw_x];
						count += 1;
					}
				}
				sum / count as f64
			}
		}
	}
}
