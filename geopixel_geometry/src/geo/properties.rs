use super::GeoValue;
use std::{
	collections::{BTreeMap, btree_map},
	fmt::Debug,
};

/// Named attribute values of one feature.
#[derive(Clone, Default, PartialEq)]
pub struct GeoProperties {
	properties: BTreeMap<String, GeoValue>,
}

impl GeoProperties {
	#[must_use]
	pub fn new() -> GeoProperties {
		GeoProperties {
			properties: BTreeMap::new(),
		}
	}
	pub fn insert(&mut self, key: String, value: GeoValue) {
		self.properties.insert(key, value);
	}
	#[must_use]
	pub fn get(&self, key: &str) -> Option<&GeoValue> {
		self.properties.get(key)
	}
	pub fn iter(&self) -> btree_map::Iter<'_, String, GeoValue> {
		self.properties.iter()
	}
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.properties.keys().map(String::as_str)
	}
	#[must_use]
	pub fn len(&self) -> usize {
		self.properties.len()
	}
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.properties.is_empty()
	}
}

impl From<Vec<(&str, GeoValue)>> for GeoProperties {
	fn from(value: Vec<(&str, GeoValue)>) -> Self {
		GeoProperties {
			properties: value.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
		}
	}
}

impl From<&serde_json::Map<String, serde_json::Value>> for GeoProperties {
	fn from(value: &serde_json::Map<String, serde_json::Value>) -> Self {
		value.iter().map(|(k, v)| (k.clone(), GeoValue::from(v))).collect()
	}
}

impl FromIterator<(String, GeoValue)> for GeoProperties {
	fn from_iter<T: IntoIterator<Item = (String, GeoValue)>>(iter: T) -> Self {
		GeoProperties {
			properties: BTreeMap::from_iter(iter),
		}
	}
}

impl Debug for GeoProperties {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map().entries(self.properties.iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn from_json_object() {
		let object = json!({"name": "Nice", "population": 348085, "is_nice": true});
		let properties = GeoProperties::from(object.as_object().unwrap());
		assert_eq!(properties.len(), 3);
		assert_eq!(properties.get("name"), Some(&GeoValue::from("Nice")));
		assert_eq!(properties.get("population"), Some(&GeoValue::UInt(348085)));
		assert_eq!(properties.keys().collect::<Vec<_>>(), vec!["is_nice", "name", "population"]);
	}

	#[test]
	fn debug() {
		let properties = GeoProperties::from(vec![("a", GeoValue::from(1)), ("b", GeoValue::Null)]);
		assert_eq!(format!("{properties:?}"), r#"{"a": UInt(1), "b": Null}"#);
		assert!(GeoProperties::new().is_empty());
	}
}
