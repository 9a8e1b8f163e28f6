use anyhow::{Result, bail, ensure};
use geopixel_core::CropWindow;
use std::fmt::Display;

/// How the samples of a raster are to be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleKind {
	Unsigned,
	Signed,
	Float,
}

impl SampleKind {
	/// Maps a TIFF `SampleFormat` value. A missing tag means unsigned integers.
	pub fn from_tag(value: u32) -> Result<SampleKind> {
		Ok(match value {
			1 => SampleKind::Unsigned,
			2 => SampleKind::Signed,
			3 => SampleKind::Float,
			_ => bail!("unsupported sample format {value}"),
		})
	}
}

impl Display for SampleKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			SampleKind::Unsigned => "unsigned integer",
			SampleKind::Signed => "signed integer",
			SampleKind::Float => "float",
		})
	}
}

/// Organisation of the raster data in the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkLayout {
	Strips { rows_per_strip: u32 },
	Tiles { tile_width: u32, tile_height: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterProperties {
	pub width: u32,
	pub height: u32,
	pub bits_per_sample: u32,
	pub sample_kind: SampleKind,
	/// Only the first sample of every pixel is read.
	pub samples_per_pixel: u32,
	pub layout: ChunkLayout,
}

impl RasterProperties {
	/// Validates the combination before any data is read.
	pub fn new(
		width: u32,
		height: u32,
		bits_per_sample: u32,
		sample_kind: SampleKind,
		samples_per_pixel: u32,
		layout: ChunkLayout,
	) -> Result<RasterProperties> {
		ensure!(width > 0 && height > 0, "raster has no pixels ({width}x{height})");
		ensure!(
			matches!(bits_per_sample, 8 | 16 | 32 | 64),
			"unsupported bits per sample: {bits_per_sample}"
		);
		ensure!(
			sample_kind != SampleKind::Float || bits_per_sample >= 32,
			"unsupported sample format: {bits_per_sample} bit float"
		);
		ensure!(samples_per_pixel > 0, "raster has no samples per pixel");
		match layout {
			ChunkLayout::Strips { rows_per_strip } => ensure!(rows_per_strip > 0, "rows per strip must not be 0"),
			ChunkLayout::Tiles {
				tile_width,
				tile_height,
			} => ensure!(tile_width > 0 && tile_height > 0, "tile size must not be 0"),
		}
		Ok(RasterProperties {
			width,
			height,
			bits_per_sample,
			sample_kind,
			samples_per_pixel,
			layout,
		})
	}

	pub fn full_window(&self) -> CropWindow {
		CropWindow {
			start_x: 0,
			start_y: 0,
			end_x: self.width - 1,
			end_y: self.height - 1,
		}
	}

	/// Number of chunks per row of chunks: 1 for strips.
	pub fn chunks_across(&self) -> u32 {
		match self.layout {
			ChunkLayout::Strips { .. } => 1,
			ChunkLayout::Tiles { tile_width, .. } => self.width.div_ceil(tile_width),
		}
	}

	/// Height of one row of chunks.
	pub fn chunk_height(&self) -> u32 {
		match self.layout {
			ChunkLayout::Strips { rows_per_strip } => rows_per_strip,
			ChunkLayout::Tiles { tile_height, .. } => tile_height,
		}
	}

	/// Width of a chunk as stored in the file (tiles at the right edge are padded).
	pub fn chunk_width(&self) -> u32 {
		match self.layout {
			ChunkLayout::Strips { .. } => self.width,
			ChunkLayout::Tiles { tile_width, .. } => tile_width,
		}
	}

	/// Size of the image data inside chunk `(column, row)`, excluding padding.
	pub fn chunk_data_size(&self, column: u32, row: u32) -> (u32, u32) {
		let chunk_width = self.chunk_width();
		let chunk_height = self.chunk_height();
		let width = chunk_width.min(self.width.saturating_sub(column * chunk_width));
		let height = chunk_height.min(self.height.saturating_sub(row * chunk_height));
		(width, height)
	}
}

impl Display for RasterProperties {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}x{} pixels, {} bit {}, {} sample(s) per pixel, ",
			self.width, self.height, self.bits_per_sample, self.sample_kind, self.samples_per_pixel
		)?;
		match self.layout {
			ChunkLayout::Strips { rows_per_strip } => write!(f, "strips of {rows_per_strip} rows"),
			ChunkLayout::Tiles {
				tile_width,
				tile_height,
			} => write!(f, "tiles of {tile_width}x{tile_height}"),
		}
	}
}
