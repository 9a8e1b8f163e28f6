use crate::{
	Coordinates, Geometry, GeometryTrait, GeometryType, LineStringGeometry, MultiLineStringGeometry, MultiPointGeometry,
	MultiPolygonGeometry, PointGeometry, PolygonGeometry, RingGeometry,
};
use anyhow::{Context, Result, anyhow, bail, ensure};
use serde_json::Value;

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
	value.as_array().ok_or_else(|| anyhow!("{what} must be an array"))
}

/// Accepts `[x, y]` and `[x, y, z]`; a height is dropped since only x and y are drawn.
fn parse_position(value: &Value) -> Result<Coordinates> {
	let array = as_array(value, "position")?;
	ensure!(
		array.len() == 2 || array.len() == 3,
		"position must have 2 or 3 numbers, found {}",
		array.len()
	);
	let number = |v: &Value| v.as_f64().ok_or_else(|| anyhow!("position contains a non-number: {v}"));
	Ok(Coordinates::new(number(&array[0])?, number(&array[1])?))
}

fn parse_positions(value: &Value) -> Result<Vec<Coordinates>> {
	as_array(value, "coordinates")?.iter().map(parse_position).collect()
}

fn parse_polygon(value: &Value) -> Result<PolygonGeometry> {
	let rings = as_array(value, "polygon")?
		.iter()
		.map(|ring| Ok(RingGeometry(parse_positions(ring)?)))
		.collect::<Result<Vec<_>>>()?;
	let polygon = PolygonGeometry(rings);
	polygon.verify()?;
	Ok(polygon)
}

/// Builds a geometry from a GeoJSON geometry object (`{"type": ..., "coordinates": ...}`).
pub fn parse_geometry(value: &Value) -> Result<Geometry> {
	let object = value.as_object().ok_or_else(|| anyhow!("geometry must be an object"))?;
	let type_name = object
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| anyhow!("geometry has no \"type\""))?;
	let geometry_type: GeometryType = type_name.parse()?;
	let coordinates = object
		.get("coordinates")
		.ok_or_else(|| anyhow!("{type_name} has no \"coordinates\""))?;

	let geometry = match geometry_type {
		GeometryType::Point => Geometry::Point(PointGeometry(parse_position(coordinates)?)),
		GeometryType::MultiPoint => Geometry::MultiPoint(MultiPointGeometry(
			parse_positions(coordinates)?.into_iter().map(PointGeometry).collect(),
		)),
		GeometryType::LineString => Geometry::LineString(LineStringGeometry(parse_positions(coordinates)?)),
		GeometryType::MultiLineString => Geometry::MultiLineString(MultiLineStringGeometry(
			as_array(coordinates, "coordinates")?
				.iter()
				.map(|line| Ok(LineStringGeometry(parse_positions(line)?)))
				.collect::<Result<_>>()?,
		)),
		GeometryType::Polygon => Geometry::Polygon(parse_polygon(coordinates)?),
		GeometryType::MultiPolygon => Geometry::MultiPolygon(MultiPolygonGeometry(
			as_array(coordinates, "coordinates")?
				.iter()
				.map(parse_polygon)
				.collect::<Result<_>>()?,
		)),
	};
	Ok(geometry)
}

/// Geometries of one feature: its `"geometry"` object, or every entry of its
/// `"geometries"` array. A `GeometryCollection` geometry object is expanded as well.
pub fn parse_feature_geometries(feature: &Value) -> Result<Vec<Geometry>> {
	if let Some(geometries) = feature.get("geometries") {
		return parse_geometry_list(geometries);
	}
	match feature.get("geometry") {
		Some(geometry) if geometry.get("type").and_then(Value::as_str) == Some("GeometryCollection") => {
			parse_geometry_list(geometry.get("geometries").unwrap_or(&Value::Null))
		}
		Some(geometry) => Ok(vec![parse_geometry(geometry)?]),
		None => bail!("feature contains neither \"geometry\" nor \"geometries\""),
	}
}

fn parse_geometry_list(value: &Value) -> Result<Vec<Geometry>> {
	as_array(value, "\"geometries\"")?
		.iter()
		.enumerate()
		.map(|(index, geometry)| parse_geometry(geometry).with_context(|| format!("geometry {index}")))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use serde_json::json;

	#[test]
	fn all_types() {
		let cases = [
			(json!({"type": "Point", "coordinates": [1, 2]}), Geometry::new_point([1.0, 2.0])),
			(
				json!({"type": "MultiPoint", "coordinates": [[1, 2], [3, 4]]}),
				Geometry::new_multi_point(vec![[1.0, 2.0], [3.0, 4.0]]),
			),
			(
				json!({"type": "LineString", "coordinates": [[1, 2], [3, 4.5]]}),
				Geometry::new_line_string(vec![[1.0, 2.0], [3.0, 4.5]]),
			),
			(
				json!({"type": "MultiLineString", "coordinates": [[[1, 2], [3, 4]], [[0, 0], [1, 1]]]}),
				Geometry::new_multi_line_string(vec![vec![[1.0, 2.0], [3.0, 4.0]], vec![[0.0, 0.0], [1.0, 1.0]]]),
			),
			(
				json!({"type": "Polygon", "coordinates": [[[0, 0], [4, 0], [4, 4], [0, 0]]]}),
				Geometry::new_polygon(vec![vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]]]),
			),
			(
				json!({"type": "MultiPolygon", "coordinates": [[[[0, 0], [4, 0], [4, 4], [0, 0]]]]}),
				Geometry::new_multi_polygon(vec![vec![vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]]]]),
			),
		];
		for (json, expected) in cases {
			assert_eq!(parse_geometry(&json).unwrap(), expected);
		}
	}

	#[test]
	fn third_ordinate_is_ignored() {
		let geometry = parse_geometry(&json!({"type": "Point", "coordinates": [1, 2, 300]})).unwrap();
		assert_eq!(geometry, Geometry::new_point([1.0, 2.0]));

		let line = json!({"type": "LineString", "coordinates": [[0, 0, 5], [3, 4, 6]]});
		assert_eq!(parse_geometry(&line).unwrap(), Geometry::new_line_string(vec![[0.0, 0.0], [3.0, 4.0]]));
	}

	#[rstest]
	#[case(json!([1, 2]), "geometry must be an object")]
	#[case(json!({"coordinates": [1, 2]}), "geometry has no \"type\"")]
	#[case(json!({"type": "Circle", "coordinates": [1, 2]}), "unknown geometry type 'Circle'")]
	#[case(json!({"type": "Point"}), "Point has no \"coordinates\"")]
	#[case(json!({"type": "Point", "coordinates": [1]}), "position must have 2 or 3 numbers, found 1")]
	#[case(json!({"type": "Point", "coordinates": [1, 2, 3, 4]}), "position must have 2 or 3 numbers, found 4")]
	#[case(json!({"type": "Point", "coordinates": [1, "a"]}), "position contains a non-number: \"a\"")]
	#[case(json!({"type": "LineString", "coordinates": 5}), "coordinates must be an array")]
	#[case(json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [0, 0]]]}), "Ring must have at least 4 points")]
	#[case(json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1]]]}), "Ring must be closed")]
	fn invalid(#[case] json: Value, #[case] message: &str) {
		assert_eq!(parse_geometry(&json).unwrap_err().to_string(), message);
	}

	#[test]
	fn feature_geometries() {
		let single = json!({"geometry": {"type": "Point", "coordinates": [0, 0]}});
		assert_eq!(parse_feature_geometries(&single).unwrap().len(), 1);

		let list = json!({"geometries": [
			{"type": "Point", "coordinates": [0, 0]},
			{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}
		]});
		assert_eq!(parse_feature_geometries(&list).unwrap().len(), 2);

		let collection = json!({"geometry": {"type": "GeometryCollection", "geometries": [
			{"type": "Point", "coordinates": [0, 0]}
		]}});
		assert_eq!(parse_feature_geometries(&collection).unwrap().len(), 1);

		let error = parse_feature_geometries(&json!({"properties": {}})).unwrap_err();
		assert_eq!(error.to_string(), "feature contains neither \"geometry\" nor \"geometries\"");

		let error = parse_feature_geometries(&json!({"geometries": [{"type": "Point", "coordinates": []}]}))
			.unwrap_err();
		assert_eq!(error.to_string(), "geometry 0");
	}
}
