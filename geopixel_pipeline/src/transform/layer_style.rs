use super::{GEOMETRY_TYPE_RULE, StyleRule};
use anyhow::{Result, bail, ensure};
use geopixel_container::geopackage::FeatureRow;
use geopixel_core::Color;
use geopixel_geometry::{Geometry, GeometryType};
use std::collections::BTreeMap;

/// Style key used for layers without their own style list.
pub const ALL_LAYERS: &str = "!ALL LAYERS!";

/// Rule key that matches on the layer name instead of a column.
pub const LAYER_NAME_RULE: &str = "!LAYER NAME!";

/// Style lists of GeoPackage layers, keyed by layer name or [`ALL_LAYERS`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerStyles {
	styles: BTreeMap<String, Vec<StyleRule>>,
}

impl LayerStyles {
	pub fn new() -> LayerStyles {
		LayerStyles::default()
	}

	pub fn insert(&mut self, layer: &str, rules: Vec<StyleRule>) -> Result<()> {
		ensure!(!rules.is_empty(), "style of layer '{layer}' has no colors");
		self.styles.insert(layer.to_string(), rules);
		Ok(())
	}

	pub fn get(&self, layer: &str) -> Option<&[StyleRule]> {
		self.styles.get(layer).map(Vec::as_slice)
	}

	/// Picks the color of one geometry of a table row.
	///
	/// The layer's own list is used if there is one, [`ALL_LAYERS`] otherwise. Rules match
	/// a column value verbatim, the layer name ([`LAYER_NAME_RULE`]) or the geometry type
	/// ([`GEOMETRY_TYPE_RULE`]). A layer's own rule naming an unknown column is an error;
	/// in the shared list such a rule does not match.
	pub fn color_for(&self, row: &FeatureRow, geometry: &Geometry) -> Result<Color> {
		let (rules, own) = match self.styles.get(row.layer) {
			Some(rules) => (rules, true),
			None => match self.styles.get(ALL_LAYERS) {
				Some(rules) => (rules, false),
				None => bail!("no style for layer '{}' and no \"{ALL_LAYERS}\" style", row.layer),
			},
		};
		let Some(default) = rules.first() else {
			bail!("style of layer '{}' has no colors", row.layer)
		};
		if rules.len() == 1 {
			return Ok(default.color);
		}

		for rule in &rules[1..] {
			let Some(key) = rule.key.as_deref() else { continue };
			let hit = match key {
				LAYER_NAME_RULE => row.layer == rule.value,
				GEOMETRY_TYPE_RULE => rule
					.value
					.parse::<GeometryType>()
					.is_ok_and(|t| t == geometry.get_type()),
				column => match row.get(column) {
					Some(value) => value == rule.value,
					None if own => bail!("layer '{}' has no column '{column}'", row.layer),
					None => false,
				},
			};
			if hit {
				return Ok(rule.color);
			}
		}
		Ok(default.color)
	}
}
