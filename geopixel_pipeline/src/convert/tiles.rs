use anyhow::{Result, ensure};
use geopixel_core::CropWindow;
use std::path::{Path, PathBuf};

/// How a raster output is split into several images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TileMode {
	#[default]
	None,
	/// A fixed number of tiles across and down.
	Count { columns: u32, rows: u32 },
	/// Tiles of a fixed pixel size; the last column and row may be smaller.
	Size { width: u32, height: u32 },
}

/// One output tile: its position in the tile grid and the source window it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterTile {
	pub column: u32,
	pub row: u32,
	pub window: CropWindow,
}

impl RasterTile {
	/// `<dir>/<stem>_<column>_<row>.png` next to `output`.
	pub fn output_path(&self, output: &Path) -> PathBuf {
		let stem = output.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
		output.with_file_name(format!("{stem}_{}_{}.png", self.column, self.row))
	}
}

impl TileMode {
	/// Splits `crop` into tiles, column by column, each column top to bottom.
	///
	/// Edge tiles are clipped to the crop. Without tiling the whole crop is one tile.
	pub fn split(&self, crop: &CropWindow) -> Result<Vec<RasterTile>> {
		let (tile_width, tile_height) = match *self {
			TileMode::None => (crop.width(), crop.height()),
			TileMode::Count { columns, rows } => {
				ensure!(columns > 0 && rows > 0, "tile count {columns}x{rows} must be positive");
				(crop.width().div_ceil(columns), crop.height().div_ceil(rows))
			}
			TileMode::Size { width, height } => {
				ensure!(width > 0 && height > 0, "tile size {width}x{height} must be positive");
				(width, height)
			}
		};

		let columns = crop.width().div_ceil(tile_width);
		let rows = crop.height().div_ceil(tile_height);
		let mut tiles = Vec::with_capacity((columns * rows) as usize);
		for column in 0..columns {
			for row in 0..rows {
				let start_x = crop.start_x + column * tile_width;
				let start_y = crop.start_y + row * tile_height;
				let window = CropWindow::new(
					start_x,
					start_y,
					(start_x + tile_width - 1).min(crop.end_x),
					(start_y + tile_height - 1).min(crop.end_y),
				)?;
				tiles.push(RasterTile { column, row, window });
			}
		}
		Ok(tiles)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn crop() -> CropWindow {
		CropWindow::new(10, 20, 19, 26).unwrap()
	}

	fn windows(mode: TileMode) -> Vec<(u32, u32, [u32; 4])> {
		mode
			.split(&crop())
			.unwrap()
			.into_iter()
			.map(|t| {
				let w = t.window;
				(t.column, t.row, [w.start_x, w.start_y, w.end_x, w.end_y])
			})
			.collect()
	}

	#[test]
	fn no_tiling() {
		assert_eq!(windows(TileMode::None), vec![(0, 0, [10, 20, 19, 26])]);
	}

	#[test]
	fn by_count() {
		assert_eq!(
			windows(TileMode::Count { columns: 3, rows: 2 }),
			vec![
				(0, 0, [10, 20, 13, 23]),
				(0, 1, [10, 24, 13, 26]),
				(1, 0, [14, 20, 17, 23]),
				(1, 1, [14, 24, 17, 26]),
				(2, 0, [18, 20, 19, 23]),
				(2, 1, [18, 24, 19, 26]),
			]
		);
	}

	#[test]
	fn by_size() {
		assert_eq!(
			windows(TileMode::Size { width: 8, height: 7 }),
			vec![(0, 0, [10, 20, 17, 26]), (1, 0, [18, 20, 19, 26])]
		);
	}

	#[test]
	fn invalid_modes() {
		assert!(TileMode::Count { columns: 0, rows: 1 }.split(&crop()).is_err());
		assert!(TileMode::Size { width: 1, height: 0 }.split(&crop()).is_err());
	}

	#[test]
	fn tile_file_names() {
		let tile = RasterTile {
			column: 2,
			row: 5,
			window: crop(),
		};
		assert_eq!(
			tile.output_path(Path::new("/out/dem.png")),
			PathBuf::from("/out/dem_2_5.png")
		);
	}
}
