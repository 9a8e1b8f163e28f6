use anyhow::{Result, bail};
use geopixel_core::CropWindow;
use tiff::decoder::DecodingResult;

/// One unit of decoded raster data, handed to the visitor of [`super::RasterReader::stream`].
///
/// Stripped rasters are visited row by row, tiled rasters tile by tile.
#[derive(Debug, PartialEq)]
pub enum RasterChunk<'a> {
	/// Row `y`, already cut to the columns of the requested window starting at `start_x`.
	Row { y: u32, start_x: u32, values: &'a [f64] },
	/// A whole tile at pixel position `(x, y)`. `values` holds `height` rows of `stride`
	/// values, `width` of which are image data.
	Tile {
		x: u32,
		y: u32,
		width: u32,
		height: u32,
		stride: u32,
		values: &'a [f64],
	},
}

impl RasterChunk<'_> {
	/// Calls `f(x, y, value)` for every cell of this chunk that lies inside `window`.
	pub fn for_each_cell(&self, window: &CropWindow, mut f: impl FnMut(u32, u32, f64)) {
		match *self {
			RasterChunk::Row { y, start_x, values } => {
				if y < window.start_y || y > window.end_y {
					return;
				}
				for (x, value) in (start_x..).zip(values) {
					if x >= window.start_x && x <= window.end_x {
						f(x, y, *value);
					}
				}
			}
			RasterChunk::Tile {
				x,
				y,
				width,
				height,
				stride,
				values,
			} => {
				let x0 = x.max(window.start_x);
				let x1 = (x + width).min(window.end_x + 1);
				let y0 = y.max(window.start_y);
				let y1 = (y + height).min(window.end_y + 1);
				for cell_y in y0..y1 {
					let row = ((cell_y - y) * stride) as usize;
					for cell_x in x0..x1 {
						if let Some(value) = values.get(row + (cell_x - x) as usize) {
							f(cell_x, cell_y, *value);
						}
					}
				}
			}
		}
	}
}

macro_rules! first_samples {
	($values:expr, $step:expr) => {
		$values.iter().step_by($step).map(|v| *v as f64).collect()
	};
}

/// Converts decoded samples to `f64`, keeping the first sample of every pixel.
#[allow(unreachable_patterns)]
pub(crate) fn first_samples_as_f64(result: DecodingResult, samples_per_pixel: usize) -> Result<Vec<f64>> {
	let step = samples_per_pixel.max(1);
	Ok(match result {
		DecodingResult::U8(v) => first_samples!(v, step),
		DecodingResult::U16(v) => first_samples!(v, step),
		DecodingResult::U32(v) => first_samples!(v, step),
		DecodingResult::U64(v) => first_samples!(v, step),
		DecodingResult::I8(v) => first_samples!(v, step),
		DecodingResult::I16(v) => first_samples!(v, step),
		DecodingResult::I32(v) => first_samples!(v, step),
		DecodingResult::I64(v) => first_samples!(v, step),
		DecodingResult::F32(v) => first_samples!(v, step),
		DecodingResult::F64(v) => first_samples!(v, step),
		_ => bail!("unsupported sample encoding"),
	})
}
