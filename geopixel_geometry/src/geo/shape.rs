use super::Geometry;

/// A decoded geometry plus the index of the feature or row it was read from.
///
/// `property_id` indexes the attribute list returned next to the shapes; `None` means the
/// geometry has no attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
	pub geometry: Geometry,
	pub property_id: Option<usize>,
}

impl Shape {
	#[must_use]
	pub fn new(geometry: Geometry, property_id: usize) -> Shape {
		Shape {
			geometry,
			property_id: Some(property_id),
		}
	}

	#[must_use]
	pub fn without_properties(geometry: Geometry) -> Shape {
		Shape {
			geometry,
			property_id: None,
		}
	}
}
