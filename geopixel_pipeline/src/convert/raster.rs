use super::{ScaleMode, TileMode, ValueGrid};
use crate::transform::{ColorTable, Gray16Transform, RgbTransform};
use anyhow::{Result, anyhow, bail};
use geopixel_container::raster::RasterReader;
use geopixel_core::{
	CropWindow,
	progress::{ProgressSink, SliceProgress},
	run_partitioned,
};
use geopixel_derive::context;
use geopixel_image::{DynamicImage, Gray16Image, PlanarImage, write_png};
use std::path::{Path, PathBuf};

/// What a raster conversion produces.
#[derive(Clone, Debug, PartialEq)]
pub enum RasterOutput {
	Gray16TrueValue { offset: f64 },
	/// Bounds that are not given are taken from the data of every output image.
	Gray16MinToMax { min: Option<f64>, max: Option<f64> },
	RgbUserValues { colors: ColorTable },
	RgbUserRanges { colors: ColorTable, gradient: bool },
	RgbFormula,
}

#[derive(Clone, Copy, Debug)]
enum PixelTransform<'a> {
	Gray16(Gray16Transform),
	Rgb(&'a RgbTransform),
}

/// A raster conversion job.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterJob {
	pub input: PathBuf,
	pub output: PathBuf,
	/// The full raster if not set.
	pub crop: Option<CropWindow>,
	pub mode: RasterOutput,
	pub scale: ScaleMode,
	/// Ignored when `scale` is active.
	pub tiles: TileMode,
	pub flip_y: bool,
}

/// A rendered raster image.
#[derive(Clone, Debug, PartialEq)]
pub enum RasterImage {
	Gray16(Gray16Image),
	Rgba(PlanarImage),
}

impl RasterImage {
	fn new(gray: bool, width: u32, height: u32) -> RasterImage {
		if gray {
			RasterImage::Gray16(Gray16Image::new(width, height))
		} else {
			RasterImage::Rgba(PlanarImage::new(width, height))
		}
	}

	pub fn width(&self) -> u32 {
		match self {
			RasterImage::Gray16(image) => image.width(),
			RasterImage::Rgba(image) => image.width(),
		}
	}

	pub fn height(&self) -> u32 {
		match self {
			RasterImage::Gray16(image) => image.height(),
			RasterImage::Rgba(image) => image.height(),
		}
	}

	fn set(&mut self, index: usize, cell: f64, transform: PixelTransform) -> Result<()> {
		match (self, transform) {
			(RasterImage::Gray16(image), PixelTransform::Gray16(t)) => image.set(index, t.apply(cell)),
			(RasterImage::Rgba(image), PixelTransform::Rgb(t)) => image.set_pixel(index, t.apply(cell)?),
			_ => bail!("pixel transform does not fit the image buffer"),
		}
		Ok(())
	}

	fn write_band(&mut self, offset: usize, band: &RasterImage) -> Result<()> {
		match (self, band) {
			(RasterImage::Gray16(image), RasterImage::Gray16(band)) => image.write_band(offset, band),
			(RasterImage::Rgba(image), RasterImage::Rgba(band)) => image.write_band(offset, band),
			_ => bail!("band buffer does not fit the image buffer"),
		}
	}

	pub fn to_dynamic_image(&self, flip_y: bool) -> Result<DynamicImage> {
		match self {
			RasterImage::Gray16(image) => image.to_dynamic_image(flip_y),
			RasterImage::Rgba(image) => image.to_dynamic_image(flip_y),
		}
	}
}

impl RasterOutput {
	fn is_gray(&self) -> bool {
		matches!(
			self,
			RasterOutput::Gray16TrueValue { .. } | RasterOutput::Gray16MinToMax { .. }
		)
	}

	fn rgb_transform(&self) -> Option<RgbTransform> {
		match self {
			RasterOutput::RgbUserValues { colors } => Some(RgbTransform::UserValues(colors.clone())),
			RasterOutput::RgbUserRanges { colors, gradient } => Some(RgbTransform::UserRanges {
				table: colors.clone(),
				gradient: *gradient,
			}),
			RasterOutput::RgbFormula => Some(RgbTransform::Formula),
			_ => None,
		}
	}

	/// Resolves the gray transform, calling `min_max` only for missing bounds.
	fn gray16_transform(&self, min_max: impl FnOnce() -> Result<(f64, f64)>) -> Result<Option<Gray16Transform>> {
		Ok(match *self {
			RasterOutput::Gray16TrueValue { offset } => Some(Gray16Transform::TrueValue { offset }),
			RasterOutput::Gray16MinToMax {
				min: Some(min),
				max: Some(max),
			} => Some(Gray16Transform::MinToMax { min, max }),
			RasterOutput::Gray16MinToMax { min, max } => {
				let (data_min, data_max) = min_max()?;
				log::debug!("value range of the data is {data_min} .. {data_max}");
				Some(Gray16Transform::MinToMax {
					min: min.unwrap_or(data_min),
					max: max.unwrap_or(data_max),
				})
			}
			_ => None,
		})
	}
}

/// Streams `window` through the transform into a new image, one row band per worker.
pub fn render_window(
	reader: &RasterReader,
	window: &CropWindow,
	output: &RasterOutput,
	threads: usize,
	progress: &dyn ProgressSink,
) -> Result<RasterImage> {
	let rgb = output.rgb_transform();
	let gray = output.gray16_transform(|| reader.min_max(window, threads, progress))?;
	let transform = match (&gray, &rgb) {
		(Some(gray), _) => PixelTransform::Gray16(*gray),
		(None, Some(rgb)) => PixelTransform::Rgb(rgb),
		(None, None) => bail!("raster output {output:?} has no transform"),
	};

	let width = window.width();
	let bands = reader.stream(
		window,
		threads,
		progress,
		|band| (band.start, RasterImage::new(output.is_gray(), width, band.len() as u32)),
		|(band_start, image), chunk| {
			let mut result = Ok(());
			chunk.for_each_cell(window, |x, y, cell| {
				if result.is_ok() {
					let index = (y - *band_start) as usize * width as usize + (x - window.start_x) as usize;
					result = image.set(index, cell, transform);
				}
			});
			result
		},
	)?;

	let mut image = RasterImage::new(output.is_gray(), width, window.height());
	for (band_start, band) in &bands {
		image.write_band((band_start - window.start_y) as usize * width as usize, band)?;
	}
	Ok(image)
}

/// Transforms a grid of already extracted values, one row band per worker.
pub fn render_grid(
	grid: &ValueGrid,
	output: &RasterOutput,
	threads: usize,
	progress: &dyn ProgressSink,
) -> Result<RasterImage> {
	let rgb = output.rgb_transform();
	let gray = output.gray16_transform(|| {
		grid
			.min_max()
			.ok_or_else(|| anyhow!("scaled raster contains no numeric values"))
	})?;
	let transform = match (&gray, &rgb) {
		(Some(gray), _) => PixelTransform::Gray16(*gray),
		(None, Some(rgb)) => PixelTransform::Rgb(rgb),
		(None, None) => bail!("raster output {output:?} has no transform"),
	};

	let width = grid.width as usize;
	let bands = run_partitioned(0..grid.height as usize, threads, |slice, rows| {
		let slice_progress = SliceProgress::new(progress, slice);
		let total = rows.len();
		let mut band = RasterImage::new(output.is_gray(), grid.width, total as u32);
		for (done, y) in rows.clone().enumerate() {
			for x in 0..width {
				band.set(done * width + x, grid.values[y * width + x], transform)?;
			}
			slice_progress.update(done + 1, total);
		}
		Ok((rows.start, band))
	})?;

	let mut image = RasterImage::new(output.is_gray(), grid.width, grid.height);
	for (row, band) in &bands {
		image.write_band(row * width, band)?;
	}
	Ok(image)
}

/// Runs a raster job and returns the paths of all written images.
#[context("failed to convert raster {:?}", job.input)]
pub fn convert_raster(job: &RasterJob, threads: usize, progress: &dyn ProgressSink) -> Result<Vec<PathBuf>> {
	job.scale.validate()?;
	let reader = RasterReader::open(&job.input)?;
	log::info!("read {:?}: {}", job.input, reader.properties());

	let crop = match job.crop {
		Some(crop) => {
			crop.validate_for(reader.width(), reader.height())?;
			crop
		}
		None => reader.properties().full_window(),
	};

	if !job.scale.is_none() {
		if job.tiles != TileMode::None {
			log::warn!("tiling is ignored because the raster is scaled");
		}
		let grid = ValueGrid {
			width: crop.width(),
			height: crop.height(),
			values: reader.read_window(&crop, threads, progress)?,
		};
		let scaled = grid.scale(job.scale, threads, progress)?;
		log::debug!("scaled {}x{} to {}x{}", grid.width, grid.height, scaled.width, scaled.height);
		let image = render_grid(&scaled, &job.mode, threads, progress)?;
		write_image(&image, job.flip_y, &job.output)?;
		return Ok(vec![job.output.clone()]);
	}

	let tiles = job.tiles.split(&crop)?;
	if tiles.len() == 1 && job.tiles == TileMode::None {
		let image = render_window(&reader, &crop, &job.mode, threads, progress)?;
		write_image(&image, job.flip_y, &job.output)?;
		return Ok(vec![job.output.clone()]);
	}

	log::info!("writing {} tiles", tiles.len());
	let mut paths = Vec::with_capacity(tiles.len());
	for tile in &tiles {
		let path = tile.output_path(&job.output);
		let image = render_window(&reader, &tile.window, &job.mode, threads, progress)?;
		write_image(&image, job.flip_y, &path)?;
		paths.push(path);
	}
	Ok(paths)
}

fn write_image(image: &RasterImage, flip_y: bool, path: &Path) -> Result<()> {
	write_png(&image.to_dynamic_image(flip_y)?, path)
}
