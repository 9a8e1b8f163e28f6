use super::{ChunkLayout, RasterChunk, RasterProperties, SampleKind, chunk::first_samples_as_f64};
use anyhow::{Context, Result, anyhow, ensure};
use geopixel_core::{
	CropWindow,
	progress::{ProgressSink, SliceProgress},
	run_partitioned,
};
use geopixel_derive::context;
use std::{
	fs::File,
	io::BufReader,
	ops::Range,
	path::{Path, PathBuf},
	sync::Mutex,
};
use tiff::{
	decoder::{Decoder, Limits},
	tags::Tag,
};

type TiffDecoder = Decoder<BufReader<File>>;

/// Reader for stripped and tiled TIFF files with one or more samples per pixel.
pub struct RasterReader {
	path: PathBuf,
	properties: RasterProperties,
	decoder: Mutex<TiffDecoder>,
}

fn tag_u32(decoder: &mut TiffDecoder, tag: Tag) -> Result<Option<u32>> {
	Ok(match decoder.find_tag(tag)? {
		Some(value) => Some(value.into_u32()?),
		None => None,
	})
}

fn tag_u32_list(decoder: &mut TiffDecoder, tag: Tag) -> Result<Option<Vec<u32>>> {
	Ok(match decoder.find_tag(tag)? {
		Some(value) => Some(value.into_u32_vec()?),
		None => None,
	})
}

fn read_properties(decoder: &mut TiffDecoder) -> Result<RasterProperties> {
	let (width, height) = decoder.dimensions()?;

	let bits = tag_u32_list(decoder, Tag::BitsPerSample)?.unwrap_or_else(|| vec![1]);
	let bits_per_sample = bits.first().copied().unwrap_or(1);
	ensure!(
		bits.iter().all(|b| *b == bits_per_sample),
		"samples with different bit depths ({bits:?}) are not supported"
	);

	let sample_format = tag_u32_list(decoder, Tag::SampleFormat)?
		.and_then(|formats| formats.first().copied())
		.unwrap_or(1);
	let sample_kind = SampleKind::from_tag(sample_format)?;

	let samples_per_pixel = tag_u32(decoder, Tag::SamplesPerPixel)?.unwrap_or(1);
	let planar_configuration = tag_u32(decoder, Tag::PlanarConfiguration)?.unwrap_or(1);
	ensure!(
		planar_configuration == 1 || samples_per_pixel == 1,
		"rasters with separate sample planes are not supported"
	);

	let layout = match tag_u32(decoder, Tag::TileWidth)? {
		Some(tile_width) => ChunkLayout::Tiles {
			tile_width,
			tile_height: tag_u32(decoder, Tag::TileLength)?.ok_or_else(|| anyhow!("tiled raster has no tile length"))?,
		},
		None => ChunkLayout::Strips {
			rows_per_strip: tag_u32(decoder, Tag::RowsPerStrip)?.unwrap_or(height).min(height),
		},
	};

	RasterProperties::new(width, height, bits_per_sample, sample_kind, samples_per_pixel, layout)
}

impl RasterReader {
	/// Opens a raster and reads its properties. Unsupported sample encodings are rejected
	/// here, before any data is read.
	#[context("failed to open raster {path:?}")]
	pub fn open(path: &Path) -> Result<RasterReader> {
		log::debug!("open raster {path:?}");
		let file = File::open(path).with_context(|| format!("cannot open file {path:?}"))?;
		let mut decoder = Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited());
		let properties = read_properties(&mut decoder)?;
		log::debug!("raster {path:?}: {properties}");

		Ok(RasterReader {
			path: path.to_path_buf(),
			properties,
			decoder: Mutex::new(decoder),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn properties(&self) -> &RasterProperties {
		&self.properties
	}

	pub fn width(&self) -> u32 {
		self.properties.width
	}

	pub fn height(&self) -> u32 {
		self.properties.height
	}

	/// Reads and decodes one chunk. Only the raw read holds the decoder lock.
	fn read_chunk(&self, index: u32) -> Result<Vec<f64>> {
		let result = {
			let mut decoder = self
				.decoder
				.lock()
				.map_err(|_| anyhow!("raster decoder lock is poisoned"))?;
			decoder
				.read_chunk(index)
				.with_context(|| format!("failed to read chunk {index} of {:?}", self.path))?
		};
		first_samples_as_f64(result, self.properties.samples_per_pixel as usize)
	}

	/// Visits every chunk that intersects `window` on `threads` workers.
	///
	/// The rows of the window are split into contiguous bands, one per worker. Each worker
	/// creates its state with `init(band)` (absolute row numbers), passes every chunk of its
	/// band to `visit`, and the states are returned in band order. Only the first worker
	/// reports progress.
	pub fn stream<T, I, V>(
		&self,
		window: &CropWindow,
		threads: usize,
		progress: &dyn ProgressSink,
		init: I,
		visit: V,
	) -> Result<Vec<T>>
	where
		T: Send,
		I: Fn(Range<u32>) -> T + Sync,
		V: Fn(&mut T, &RasterChunk) -> Result<()> + Sync,
	{
		ensure!(
			window.end_x < self.width() && window.end_y < self.height(),
			"window {window:?} exceeds raster size {}x{}",
			self.width(),
			self.height()
		);
		log::trace!("stream {window:?} of {:?} with {threads} threads", self.path);

		match self.properties.layout {
			ChunkLayout::Strips { rows_per_strip } => {
				self.stream_strips(window, rows_per_strip, threads, progress, &init, &visit)
			}
			ChunkLayout::Tiles {
				tile_width,
				tile_height,
			} => self.stream_tiles(window, (tile_width, tile_height), threads, progress, &init, &visit),
		}
	}

	fn stream_strips<T, I, V>(
		&self,
		window: &CropWindow,
		rows_per_strip: u32,
		threads: usize,
		progress: &dyn ProgressSink,
		init: &I,
		visit: &V,
	) -> Result<Vec<T>>
	where
		T: Send,
		I: Fn(Range<u32>) -> T + Sync,
		V: Fn(&mut T, &RasterChunk) -> Result<()> + Sync,
	{
		let width = self.width() as usize;
		let rows = window.start_y as usize..window.end_y as usize + 1;

		run_partitioned(rows, threads, |slice, rows| {
			let slice_progress = SliceProgress::new(progress, slice);
			let band = rows.start as u32..rows.end as u32;
			let total = band.len();
			let mut state = init(band.clone());
			let mut strip_index = None;
			let mut values = Vec::new();

			for (done, y) in band.enumerate() {
				let index = y / rows_per_strip;
				if strip_index != Some(index) {
					values = self.read_chunk(index)?;
					strip_index = Some(index);
				}
				let offset = (y - index * rows_per_strip) as usize * width;
				let row = values
					.get(offset + window.start_x as usize..offset + window.end_x as usize + 1)
					.ok_or_else(|| anyhow!("strip {index} of {:?} is too short", self.path))?;
				visit(
					&mut state,
					&RasterChunk::Row {
						y,
						start_x: window.start_x,
						values: row,
					},
				)?;
				slice_progress.update(done + 1, total);
			}
			Ok(state)
		})
	}

	fn stream_tiles<T, I, V>(
		&self,
		window: &CropWindow,
		(tile_width, tile_height): (u32, u32),
		threads: usize,
		progress: &dyn ProgressSink,
		init: &I,
		visit: &V,
	) -> Result<Vec<T>>
	where
		T: Send,
		I: Fn(Range<u32>) -> T + Sync,
		V: Fn(&mut T, &RasterChunk) -> Result<()> + Sync,
	{
		let across = self.properties.chunks_across();
		let columns = window.start_x / tile_width..window.end_x / tile_width + 1;
		let tile_rows = (window.start_y / tile_height) as usize..(window.end_y / tile_height) as usize + 1;
		log::trace!("reading {} tile rows of {} tiles", tile_rows.len(), columns.len());

		run_partitioned(tile_rows, threads, |slice, tile_rows| {
			let slice_progress = SliceProgress::new(progress, slice);
			let band_start = (tile_rows.start as u32).saturating_mul(tile_height).max(window.start_y);
			let band_end = (tile_rows.end as u32)
				.saturating_mul(tile_height)
				.min(window.end_y + 1)
				.max(band_start);
			let mut state = init(band_start..band_end);

			let total = tile_rows.len() * columns.len();
			let mut done = 0;
			for row in tile_rows {
				let row = row as u32;
				for column in columns.clone() {
					let values = self.read_chunk(row * across + column)?;
					let (width, height) = self.properties.chunk_data_size(column, row);
					let stride = if values.len() >= (tile_width * tile_height) as usize {
						tile_width
					} else {
						width
					};
					visit(
						&mut state,
						&RasterChunk::Tile {
							x: column * tile_width,
							y: row * tile_height,
							width,
							height,
							stride,
							values: &values,
						},
					)?;
					done += 1;
					slice_progress.update(done, total);
				}
			}
			Ok(state)
		})
	}
}

impl std::fmt::Debug for RasterReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RasterReader")
			.field("path", &self.path)
			.field("properties", &self.properties)
			.finish()
	}
}
