use super::RasterReader;
use anyhow::{Result, bail};
use geopixel_core::{CropWindow, progress::ProgressSink};
use std::{cmp::Ordering, collections::BTreeSet};

/// Orders floats by `total_cmp` so they can be collected into a set.
#[derive(Clone, Copy, Debug)]
struct OrderedValue(f64);

impl PartialEq for OrderedValue {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for OrderedValue {}

impl PartialOrd for OrderedValue {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for OrderedValue {
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.total_cmp(&other.0)
	}
}

impl RasterReader {
	/// All values of `window`, row by row.
	pub fn read_window(&self, window: &CropWindow, threads: usize, progress: &dyn ProgressSink) -> Result<Vec<f64>> {
		let width = window.width() as usize;
		let bands = self.stream(
			window,
			threads,
			progress,
			|band| (band.start, vec![0.0; band.len() * width]),
			|(band_start, values), chunk| {
				chunk.for_each_cell(window, |x, y, value| {
					values[(y - *band_start) as usize * width + (x - window.start_x) as usize] = value;
				});
				Ok(())
			},
		)?;

		let mut values = Vec::with_capacity(window.pixel_count());
		for (_, band) in bands {
			values.extend(band);
		}
		Ok(values)
	}

	/// Smallest and largest value inside `window`. NaN cells are ignored.
	pub fn min_max(&self, window: &CropWindow, threads: usize, progress: &dyn ProgressSink) -> Result<(f64, f64)> {
		let bands = self.stream(
			window,
			threads,
			progress,
			|_| (f64::INFINITY, f64::NEG_INFINITY),
			|(min, max), chunk| {
				chunk.for_each_cell(window, |_, _, value| {
					if !value.is_nan() {
						*min = min.min(value);
						*max = max.max(value);
					}
				});
				Ok(())
			},
		)?;

		let (min, max) = bands
			.into_iter()
			.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (band_min, band_max)| {
				(min.min(band_min), max.max(band_max))
			});
		if min > max {
			bail!("window {window:?} contains no numeric values");
		}
		log::debug!("values in {window:?} range from {min} to {max}");
		Ok((min, max))
	}

	/// The distinct values inside `window` in ascending order. NaN cells are ignored.
	pub fn distinct_values(
		&self,
		window: &CropWindow,
		threads: usize,
		progress: &dyn ProgressSink,
	) -> Result<Vec<f64>> {
		let bands = self.stream(
			window,
			threads,
			progress,
			|_| BTreeSet::new(),
			|set, chunk| {
				chunk.for_each_cell(window, |_, _, value| {
					if !value.is_nan() {
						set.insert(OrderedValue(value));
					}
				});
				Ok(())
			},
		)?;

		let mut values = BTreeSet::new();
		for band in bands {
			values.extend(band);
		}
		Ok(values.into_iter().map(|v| v.0).collect())
	}
}
