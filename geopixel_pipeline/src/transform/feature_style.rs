use geopixel_core::Color;
use geopixel_geometry::{GeoProperties, GeoValue, GeometryType};

/// Rule key that matches on the geometry type instead of an attribute.
pub const GEOMETRY_TYPE_RULE: &str = "!GEOMETRY TYPE!";

/// One entry of a style list: a color and the condition under which it applies.
///
/// The first entry of a list is the default and its condition is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
	pub color: Color,
	pub key: Option<String>,
	pub value: String,
}

impl StyleRule {
	pub fn new(color: Color) -> StyleRule {
		StyleRule {
			color,
			key: None,
			value: String::new(),
		}
	}

	pub fn matching(color: Color, key: &str, value: &str) -> StyleRule {
		StyleRule {
			color,
			key: Some(key.to_string()),
			value: value.to_string(),
		}
	}
}

/// Outcome of testing one rule against a feature.
enum RuleMatch {
	Hit,
	Miss,
	/// The rule value cannot be compared with the feature, use the default color.
	Invalid,
}

/// Colors GeoJSON features by their geometry type or attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureStyles {
	rules: Vec<StyleRule>,
}

impl FeatureStyles {
	pub fn new(rules: Vec<StyleRule>) -> FeatureStyles {
		FeatureStyles { rules }
	}

	pub fn rules(&self) -> &[StyleRule] {
		&self.rules
	}

	/// Picks the color of a feature.
	///
	/// Features without attributes and empty style lists are transparent. A single rule
	/// applies unconditionally; otherwise the first matching rule after the default wins.
	pub fn color_for(&self, geometry_type: GeometryType, properties: Option<&GeoProperties>) -> Color {
		let (Some(properties), Some(default)) = (properties, self.rules.first()) else {
			return Color::TRANSPARENT;
		};
		if self.rules.len() == 1 {
			return default.color;
		}

		for rule in &self.rules[1..] {
			let Some(key) = &rule.key else { continue };
			let outcome = if key == GEOMETRY_TYPE_RULE {
				match_geometry_type(&rule.value, geometry_type)
			} else {
				properties
					.get(key)
					.map_or(RuleMatch::Miss, |value| match_value(&rule.value, value))
			};
			match outcome {
				RuleMatch::Hit => return rule.color,
				RuleMatch::Miss => {}
				RuleMatch::Invalid => return default.color,
			}
		}
		default.color
	}
}

fn match_geometry_type(expected: &str, geometry_type: GeometryType) -> RuleMatch {
	match expected.parse::<GeometryType>() {
		Ok(expected) if expected == geometry_type => RuleMatch::Hit,
		Ok(_) => RuleMatch::Miss,
		Err(_) => RuleMatch::Invalid,
	}
}

/// Numbers compare numerically, booleans against `"true"`/`"false"`, strings verbatim.
fn match_value(expected: &str, value: &GeoValue) -> RuleMatch {
	if let Some(number) = value.as_f64() {
		return match expected.trim().parse::<f64>() {
			Ok(expected) if expected == number => RuleMatch::Hit,
			Ok(_) => RuleMatch::Miss,
			Err(_) => RuleMatch::Invalid,
		};
	}
	match value {
		GeoValue::Bool(flag) => match expected {
			"true" | "false" if (expected == "true") == *flag => RuleMatch::Hit,
			"true" | "false" => RuleMatch::Miss,
			_ => RuleMatch::Invalid,
		},
		GeoValue::String(text) if text == expected => RuleMatch::Hit,
		_ => RuleMatch::Miss,
	}
}
