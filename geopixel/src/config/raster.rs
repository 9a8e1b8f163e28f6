use super::ColorEntry;
use anyhow::{Result, bail};
use geopixel_core::CropWindow;
use geopixel_pipeline::{
	convert::{RasterJob, RasterOutput, ScaleMode, TileMode},
	transform::ColorTable,
};
use serde::Deserialize;
use std::path::PathBuf;

/// The `source` section of a raster job.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RasterConfig {
	/// Inclusive pixel window; the whole raster if omitted.
	#[serde(default)]
	pub crop: Option<CropConfig>,
	pub output: RasterModeConfig,
	#[serde(default)]
	pub scale: ScaleConfig,
	#[serde(default)]
	pub tiles: TilesConfig,
	#[serde(default)]
	pub flip_y: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CropConfig {
	pub start_x: u32,
	pub start_y: u32,
	pub end_x: u32,
	pub end_y: u32,
}

/// How raster cells become pixels, selected by `mode`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case", deny_unknown_fields)]
pub enum RasterModeConfig {
	Gray16TrueValue {
		#[serde(default)]
		offset: f64,
	},
	Gray16MinToMax {
		#[serde(default)]
		min: Option<f64>,
		#[serde(default)]
		max: Option<f64>,
	},
	RgbUserValues {
		colors: Vec<ColorEntry>,
	},
	RgbUserRanges {
		colors: Vec<ColorEntry>,
		#[serde(default)]
		gradient: bool,
	},
	RgbFormula,
}

/// At most one of `decrease` and `increase`.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScaleConfig {
	pub decrease: Option<u32>,
	pub increase: Option<u32>,
}

/// At most one of `count: [columns, rows]` and `size: [width, height]`.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TilesConfig {
	pub count: Option<[u32; 2]>,
	pub size: Option<[u32; 2]>,
}

fn color_table(colors: &[ColorEntry]) -> Result<ColorTable> {
	ColorTable::new(colors.iter().map(ColorEntry::to_pair).collect::<Result<Vec<_>>>()?)
}

impl RasterModeConfig {
	pub fn to_output(&self) -> Result<RasterOutput> {
		Ok(match self {
			RasterModeConfig::Gray16TrueValue { offset } => RasterOutput::Gray16TrueValue { offset: *offset },
			RasterModeConfig::Gray16MinToMax { min, max } => RasterOutput::Gray16MinToMax { min: *min, max: *max },
			RasterModeConfig::RgbUserValues { colors } => RasterOutput::RgbUserValues {
				colors: color_table(colors)?,
			},
			RasterModeConfig::RgbUserRanges { colors, gradient } => RasterOutput::RgbUserRanges {
				colors: color_table(colors)?,
				gradient: *gradient,
			},
			RasterModeConfig::RgbFormula => RasterOutput::RgbFormula,
		})
	}
}

impl ScaleConfig {
	pub fn to_mode(&self) -> Result<ScaleMode> {
		let mode = match (self.decrease, self.increase) {
			(None, None) => ScaleMode::None,
			(Some(factor), None) => ScaleMode::Decrease(factor),
			(None, Some(factor)) => ScaleMode::Increase(factor),
			(Some(_), Some(_)) => bail!("scale can either decrease or increase, not both"),
		};
		mode.validate()?;
		Ok(mode)
	}
}

impl TilesConfig {
	pub fn to_mode(&self) -> Result<TileMode> {
		Ok(match (self.count, self.size) {
			(None, None) => TileMode::None,
			(Some([columns, rows]), None) => TileMode::Count { columns, rows },
			(None, Some([width, height])) => TileMode::Size { width, height },
			(Some(_), Some(_)) => bail!("tiles can be given either by count or by size, not both"),
		})
	}
}

impl RasterConfig {
	pub fn to_job(&self, input: PathBuf, output: PathBuf) -> Result<RasterJob> {
		let crop = match &self.crop {
			Some(crop) => Some(CropWindow::new(crop.start_x, crop.start_y, crop.end_x, crop.end_y)?),
			None => None,
		};
		Ok(RasterJob {
			input,
			output,
			crop,
			mode: self.output.to_output()?,
			scale: self.scale.to_mode()?,
			tiles: self.tiles.to_mode()?,
			flip_y: self.flip_y,
		})
	}
}
