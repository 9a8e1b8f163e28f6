use anyhow::Result;
use geopixel_core::{Boundaries, Color};
use serde::{Deserialize, Deserializer, de::Error};
use serde_yaml_ng::Value;

/// Reads a YAML scalar as text, so that `value: 5` and `value: "5"` are the same.
pub fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	match Value::deserialize(deserializer)? {
		Value::String(text) => Ok(text),
		Value::Number(number) => Ok(number.to_string()),
		Value::Bool(flag) => Ok(flag.to_string()),
		Value::Null => Ok(String::new()),
		other => Err(D::Error::custom(format!("expected a scalar, found {other:?}"))),
	}
}

pub fn optional_scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
	let text = scalar_string(deserializer)?;
	Ok((!text.is_empty()).then_some(text))
}

/// Coordinate range of the output image.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BoundariesConfig {
	pub min_x: f64,
	pub max_x: f64,
	pub min_y: f64,
	pub max_y: f64,
}

impl BoundariesConfig {
	pub fn to_boundaries(&self) -> Result<Boundaries> {
		Boundaries::new(self.min_x, self.max_x, self.min_y, self.max_y)
	}
}

/// One row of a raster color table. Colors are written `"r,g,b"` or `"r,g,b,a"`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ColorEntry {
	pub value: f64,
	pub color: String,
}

impl ColorEntry {
	pub fn to_pair(&self) -> Result<(f64, Color)> {
		Ok((self.value, self.color.parse()?))
	}
}
