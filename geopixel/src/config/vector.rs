use super::{
	BoundariesConfig,
	common::{optional_scalar_string, scalar_string},
};
use anyhow::{Context, Result, bail, ensure};
use geopixel_container::tabular::CsvOptions;
use geopixel_core::Boundaries;
use geopixel_pipeline::{
	convert::{GeoJsonJob, GeoPackageJob, PointsJob},
	transform::{FeatureStyles, LayerStyles, PointStyle, StyleRule},
};
use serde::Deserialize;
use std::{collections::BTreeMap, path::PathBuf};

fn default_true() -> bool {
	true
}

fn default_size() -> u32 {
	1
}

fn default_delimiter() -> String {
	String::from(",")
}

fn boundaries(config: Option<&BoundariesConfig>) -> Result<Option<Boundaries>> {
	config.map(BoundariesConfig::to_boundaries).transpose()
}

/// The `source` section of a CSV point job.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CsvConfig {
	/// Column name or zero-based column index.
	#[serde(deserialize_with = "scalar_string")]
	pub x_column: String,
	#[serde(deserialize_with = "scalar_string")]
	pub y_column: String,
	pub width: u32,
	pub height: u32,
	#[serde(default)]
	pub boundaries: Option<BoundariesConfig>,
	#[serde(default = "default_true")]
	pub has_header: bool,
	#[serde(default = "default_delimiter")]
	pub delimiter: String,
	/// The first entry is the default style.
	pub styles: Vec<PointStyleConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PointStyleConfig {
	pub shape_color: String,
	pub center_color: String,
	pub shape: String,
	#[serde(default = "default_size")]
	pub size: u32,
	#[serde(default, deserialize_with = "optional_scalar_string")]
	pub column: Option<String>,
	#[serde(default, deserialize_with = "scalar_string")]
	pub value: String,
}

impl PointStyleConfig {
	pub fn to_style(&self) -> Result<PointStyle> {
		Ok(PointStyle {
			shape_color: self.shape_color.parse()?,
			center_color: self.center_color.parse()?,
			shape: self.shape.parse()?,
			size: self.size,
			column: self.column.clone(),
			value: self.value.clone(),
		})
	}
}

impl CsvConfig {
	pub fn to_job(&self, input: PathBuf, output: PathBuf) -> Result<PointsJob> {
		let delimiter = match self.delimiter.as_bytes() {
			[byte] => *byte,
			_ => bail!("delimiter must be a single ASCII character, found {:?}", self.delimiter),
		};
		ensure!(!self.styles.is_empty(), "a CSV job needs at least one style");
		let styles = self
			.styles
			.iter()
			.enumerate()
			.map(|(index, style)| style.to_style().with_context(|| format!("invalid style {index}")))
			.collect::<Result<Vec<_>>>()?;
		Ok(PointsJob {
			input,
			output,
			x_column: self.x_column.clone(),
			y_column: self.y_column.clone(),
			width: self.width,
			height: self.height,
			boundaries: boundaries(self.boundaries.as_ref())?,
			csv: CsvOptions {
				has_header: self.has_header,
				delimiter,
			},
			styles,
		})
	}
}

/// A color and the condition under which it applies.
///
/// `key` names a feature property (GeoJSON) or a table column (GeoPackage); it may also be
/// written as `property` or `column`. Entries without a key only make sense as defaults.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FeatureStyleConfig {
	pub color: String,
	#[serde(default, alias = "property", alias = "column")]
	pub key: Option<String>,
	#[serde(default, deserialize_with = "scalar_string")]
	pub value: String,
}

impl FeatureStyleConfig {
	pub fn to_rule(&self) -> Result<StyleRule> {
		Ok(StyleRule {
			color: self.color.parse()?,
			key: self.key.clone(),
			value: self.value.clone(),
		})
	}
}

fn style_rules(styles: &[FeatureStyleConfig]) -> Result<Vec<StyleRule>> {
	styles.iter().map(FeatureStyleConfig::to_rule).collect()
}

/// The `source` section of a GeoJSON job.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeoJsonConfig {
	pub width: u32,
	pub height: u32,
	#[serde(default)]
	pub boundaries: Option<BoundariesConfig>,
	/// The first entry is the default color.
	#[serde(default)]
	pub styles: Vec<FeatureStyleConfig>,
	#[serde(default = "default_true")]
	pub flip_y: bool,
}

impl GeoJsonConfig {
	pub fn to_job(&self, input: PathBuf, output: PathBuf) -> Result<GeoJsonJob> {
		if self.styles.is_empty() {
			log::warn!("no styles configured, every feature will be transparent");
		}
		Ok(GeoJsonJob {
			input,
			output,
			width: self.width,
			height: self.height,
			boundaries: boundaries(self.boundaries.as_ref())?,
			styles: FeatureStyles::new(style_rules(&self.styles)?),
			flip_y: self.flip_y,
		})
	}
}

/// The `source` section of a GeoPackage job.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeoPackageConfig {
	pub width: u32,
	pub height: u32,
	#[serde(default)]
	pub boundaries: Option<BoundariesConfig>,
	/// Drawing order; every feature layer if empty.
	#[serde(default)]
	pub layers: Vec<String>,
	/// Style lists keyed by layer name or `"!ALL LAYERS!"`.
	pub styles: BTreeMap<String, Vec<FeatureStyleConfig>>,
	#[serde(default = "default_true")]
	pub flip_y: bool,
}

impl GeoPackageConfig {
	pub fn to_job(&self, input: PathBuf, output: PathBuf) -> Result<GeoPackageJob> {
		let mut styles = LayerStyles::new();
		for (layer, rules) in &self.styles {
			styles.insert(layer, style_rules(rules)?)?;
		}
		Ok(GeoPackageJob {
			input,
			output,
			width: self.width,
			height: self.height,
			boundaries: boundaries(self.boundaries.as_ref())?,
			layers: self.layers.clone(),
			styles,
			flip_y: self.flip_y,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use geopixel_core::Color;
	use geopixel_pipeline::transform::{ALL_LAYERS, MarkerShape};
	use pretty_assertions::assert_eq;

	const RED: Color = Color::new(255, 0, 0, 255);

	#[test]
	fn csv_job() {
		let config: CsvConfig = serde_yaml_ng::from_str(
			"x_column: 0
y_column: lat
width: 100
height: 50
delimiter: \";\"
boundaries: {min_x: 0, max_x: 10, min_y: 0, max_y: 5}
styles:
  - {shape_color: \"0,0,0\", center_color: \"255,0,0\", shape: Circle, size: 3}
  - {shape_color: \"0,0,0\", center_color: \"0,0,255\", shape: emptysquare, column: kind, value: 7}
",
		)
		.unwrap();
		let job = config.to_job(PathBuf::from("p.csv"), PathBuf::from("p.png")).unwrap();
		assert_eq!(job.x_column, "0");
		assert_eq!(job.y_column, "lat");
		assert_eq!(job.csv, CsvOptions { has_header: true, delimiter: b';' });
		assert_eq!(job.boundaries, Some(Boundaries::new(0.0, 10.0, 0.0, 5.0).unwrap()));
		assert_eq!(
			job.styles,
			vec![
				PointStyle {
					shape_color: Color::BLACK,
					center_color: RED,
					shape: MarkerShape::Circle,
					size: 3,
					column: None,
					value: String::new(),
				},
				PointStyle {
					shape_color: Color::BLACK,
					center_color: Color::new(0, 0, 255, 255),
					shape: MarkerShape::EmptySquare,
					size: 1,
					column: Some(String::from("kind")),
					value: String::from("7"),
				},
			]
		);
	}

	#[test]
	fn csv_job_errors() {
		let parse = |yaml: &str| -> Result<PointsJob> {
			let config: CsvConfig = serde_yaml_ng::from_str(yaml)?;
			config.to_job(PathBuf::new(), PathBuf::new())
		};
		let base = "x_column: x\ny_column: y\nwidth: 1\nheight: 1\n";
		assert_eq!(
			parse(&format!("{base}styles: []")).unwrap_err().to_string(),
			"a CSV job needs at least one style"
		);
		assert!(
			parse(&format!("{base}delimiter: \"::\"\nstyles: []"))
				.unwrap_err()
				.to_string()
				.starts_with("delimiter must be a single ASCII character")
		);
		assert_eq!(
			parse(&format!(
				"{base}styles: [{{shape_color: \"0,0,0\", center_color: \"0,0,0\", shape: star}}]"
			))
			.unwrap_err()
			.to_string(),
			"invalid style 0"
		);
	}

	#[test]
	fn geojson_job() {
		let config: GeoJsonConfig = serde_yaml_ng::from_str(
			"width: 20
height: 10
styles:
  - color: \"255,0,0\"
  - {color: \"0,0,0,0\", property: \"!GEOMETRY TYPE!\", value: Point}
  - {color: \"1,2,3\", property: open, value: true}
",
		)
		.unwrap();
		let job = config.to_job(PathBuf::new(), PathBuf::new()).unwrap();
		assert!(job.flip_y);
		assert_eq!(job.boundaries, None);
		assert_eq!(
			job.styles.rules(),
			&[
				StyleRule::new(RED),
				StyleRule::matching(Color::TRANSPARENT, "!GEOMETRY TYPE!", "Point"),
				StyleRule::matching(Color::new(1, 2, 3, 255), "open", "true"),
			]
		);
	}

	#[test]
	fn geopackage_job() {
		let config: GeoPackageConfig = serde_yaml_ng::from_str(
			"width: 20
height: 10
layers: [water, roads]
flip_y: false
styles:
  \"!ALL LAYERS!\":
    - color: \"255,0,0\"
  roads:
    - color: \"0,0,0\"
    - {color: \"255,0,0\", column: lanes, value: 2}
",
		)
		.unwrap();
		let job = config.to_job(PathBuf::new(), PathBuf::new()).unwrap();
		assert!(!job.flip_y);
		assert_eq!(job.layers, ["water", "roads"]);
		assert_eq!(job.styles.get(ALL_LAYERS), Some(&[StyleRule::new(RED)][..]));
		assert_eq!(
			job.styles.get("roads"),
			Some(&[StyleRule::new(Color::BLACK), StyleRule::matching(RED, "lanes", "2")][..])
		);
	}

	#[test]
	fn geopackage_layer_without_colors() {
		let config: GeoPackageConfig = serde_yaml_ng::from_str("width: 1\nheight: 1\nstyles: {roads: []}").unwrap();
		assert_eq!(
			config.to_job(PathBuf::new(), PathBuf::new()).unwrap_err().to_string(),
			"style of layer 'roads' has no colors"
		);
	}
}
