use geopixel_core::Color;
use geopixel_geometry::Shape;
use std::fmt::Display;

/// The `data_type` of a `gpkg_contents` entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
	Features,
	Tiles,
	Attributes,
	Unknown,
}

impl LayerKind {
	pub fn from_data_type(data_type: &str) -> LayerKind {
		match data_type {
			"features" => LayerKind::Features,
			"tiles" => LayerKind::Tiles,
			"attributes" => LayerKind::Attributes,
			_ => LayerKind::Unknown,
		}
	}
}

impl Display for LayerKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			LayerKind::Features => "features",
			LayerKind::Tiles => "tiles",
			LayerKind::Attributes => "attributes",
			LayerKind::Unknown => "unknown",
		})
	}
}

/// One entry of `gpkg_contents`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerInfo {
	pub name: String,
	pub kind: LayerKind,
	pub identifier: String,
}

/// The attributes of one table row, handed to the styling callback.
///
/// `columns` and `values` exclude the geometry column.
#[derive(Debug)]
pub struct FeatureRow<'a> {
	pub layer: &'a str,
	pub index: usize,
	pub columns: &'a [String],
	pub values: &'a [String],
}

impl FeatureRow<'_> {
	/// The value of `column` rendered as text.
	pub fn get(&self, column: &str) -> Option<&str> {
		self
			.columns
			.iter()
			.position(|c| c == column)
			.and_then(|i| self.values.get(i))
			.map(String::as_str)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyledShape {
	pub shape: Shape,
	pub color: Color,
}

/// All shapes of a layer in row order, every shape with the color the styler picked.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerShapes {
	pub name: String,
	pub row_count: usize,
	pub shapes: Vec<StyledShape>,
}
