use std::fmt::{Debug, Display};

/// A single attribute value of a feature or table row.
#[derive(Clone, PartialEq)]
pub enum GeoValue {
	Bool(bool),
	Double(f64),
	Int(i64),
	Null,
	String(String),
	UInt(u64),
}

impl GeoValue {
	/// Numeric view of integer and floating point values.
	#[must_use]
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			GeoValue::Double(v) => Some(*v),
			GeoValue::Int(v) => Some(*v as f64),
			GeoValue::UInt(v) => Some(*v as f64),
			_ => None,
		}
	}

	#[must_use]
	pub fn is_number(&self) -> bool {
		self.as_f64().is_some()
	}

	#[must_use]
	pub fn type_name(&self) -> &'static str {
		match self {
			GeoValue::Bool(_) => "bool",
			GeoValue::Double(_) | GeoValue::Int(_) | GeoValue::UInt(_) => "number",
			GeoValue::Null => "null",
			GeoValue::String(_) => "string",
		}
	}
}

impl Debug for GeoValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::String(v) => f.debug_tuple("String").field(v).finish(),
			Self::Double(v) => f.debug_tuple("Double").field(v).finish(),
			Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
			Self::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
			Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
			Self::Null => f.debug_tuple("Null").finish(),
		}
	}
}

/// Text form used for style matching: numbers in their shortest form, `Null` as "".
impl Display for GeoValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			GeoValue::Bool(v) => write!(f, "{v}"),
			GeoValue::Double(v) => write!(f, "{v}"),
			GeoValue::Int(v) => write!(f, "{v}"),
			GeoValue::Null => Ok(()),
			GeoValue::String(v) => f.write_str(v),
			GeoValue::UInt(v) => write!(f, "{v}"),
		}
	}
}

impl From<&str> for GeoValue {
	fn from(value: &str) -> Self {
		GeoValue::String(value.to_string())
	}
}

impl From<String> for GeoValue {
	fn from(value: String) -> Self {
		GeoValue::String(value)
	}
}

impl From<i32> for GeoValue {
	fn from(value: i32) -> Self {
		if value < 0 {
			GeoValue::Int(i64::from(value))
		} else {
			GeoValue::UInt(value as u64)
		}
	}
}

impl From<i64> for GeoValue {
	fn from(value: i64) -> Self {
		GeoValue::Int(value)
	}
}

impl From<u64> for GeoValue {
	fn from(value: u64) -> Self {
		GeoValue::UInt(value)
	}
}

impl From<f64> for GeoValue {
	fn from(value: f64) -> Self {
		GeoValue::Double(value)
	}
}

impl From<bool> for GeoValue {
	fn from(value: bool) -> Self {
		GeoValue::Bool(value)
	}
}

impl From<&serde_json::Value> for GeoValue {
	/// Arrays and objects have no scalar form and are kept as their JSON text.
	fn from(value: &serde_json::Value) -> Self {
		use serde_json::Value;
		match value {
			Value::Null => GeoValue::Null,
			Value::Bool(v) => GeoValue::Bool(*v),
			Value::Number(n) => {
				if let Some(v) = n.as_u64() {
					GeoValue::UInt(v)
				} else if let Some(v) = n.as_i64() {
					GeoValue::Int(v)
				} else {
					GeoValue::Double(n.as_f64().unwrap_or(f64::NAN))
				}
			}
			Value::String(v) => GeoValue::String(v.clone()),
			Value::Array(_) | Value::Object(_) => GeoValue::String(value.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(GeoValue::from(true), "true")]
	#[case(GeoValue::from(1.5), "1.5")]
	#[case(GeoValue::from(2.0), "2")]
	#[case(GeoValue::from(-3), "-3")]
	#[case(GeoValue::from(7), "7")]
	#[case(GeoValue::from("text"), "text")]
	#[case(GeoValue::Null, "")]
	fn display(#[case] value: GeoValue, #[case] expected: &str) {
		assert_eq!(value.to_string(), expected);
	}

	#[test]
	fn from_json() {
		assert_eq!(GeoValue::from(&json!(null)), GeoValue::Null);
		assert_eq!(GeoValue::from(&json!(false)), GeoValue::Bool(false));
		assert_eq!(GeoValue::from(&json!(12)), GeoValue::UInt(12));
		assert_eq!(GeoValue::from(&json!(-12)), GeoValue::Int(-12));
		assert_eq!(GeoValue::from(&json!(0.25)), GeoValue::Double(0.25));
		assert_eq!(GeoValue::from(&json!("a")), GeoValue::from("a"));
		assert_eq!(GeoValue::from(&json!([1, 2])), GeoValue::from("[1,2]"));
	}

	#[test]
	fn numeric_view() {
		assert_eq!(GeoValue::from(-4).as_f64(), Some(-4.0));
		assert_eq!(GeoValue::from(u64::MAX).type_name(), "number");
		assert_eq!(GeoValue::from("4").as_f64(), None);
		assert_eq!(GeoValue::from(true).type_name(), "bool");
	}
}
