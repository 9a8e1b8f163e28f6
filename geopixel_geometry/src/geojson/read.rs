use super::parse_feature_geometries;
use crate::{GeoProperties, Shape};
use anyhow::{Context, Result, anyhow, bail, ensure};
use geopixel_core::{
	Boundaries, BoundaryAccumulator,
	progress::{ProgressSink, SliceProgress},
	run_partitioned,
};
use geopixel_derive::context;
use serde_json::Value;
use std::{fs, path::Path};

/// Shapes and attributes of a GeoJSON feature collection.
///
/// `properties[i]` belongs to feature `i`; every shape's `property_id` is the index of the
/// feature it was read from. Shapes are in feature order.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoJsonData {
	pub shapes: Vec<Shape>,
	pub properties: Vec<GeoProperties>,
	pub boundaries: Boundaries,
}

fn feature_properties(feature: &Value, index: usize) -> Result<GeoProperties> {
	match feature.get("properties") {
		Some(Value::Object(map)) => Ok(GeoProperties::from(map)),
		Some(Value::Null) | None => Ok(GeoProperties::new()),
		Some(_) => bail!("invalid properties object at index {index}"),
	}
}

/// Parses a GeoJSON document with `threads` workers.
///
/// When `boundaries` is `None` they are computed from every coordinate of every feature.
pub fn parse_geojson(
	text: &str,
	boundaries: Option<Boundaries>,
	threads: usize,
	progress: &dyn ProgressSink,
) -> Result<GeoJsonData> {
	let document: Value = serde_json::from_str(text).context("invalid JSON")?;
	ensure!(document.is_object(), "GeoJSON document must be an object");
	let features = document
		.get("features")
		.and_then(Value::as_array)
		.ok_or_else(|| anyhow!("GeoJSON document has no \"features\" array"))?;
	log::debug!("parsing {} GeoJSON features with {threads} threads", features.len());

	let accumulator = BoundaryAccumulator::new();
	let fold_bounds = boundaries.is_none();

	let slices = run_partitioned(0..features.len(), threads, |slice, range| {
		let slice_progress = SliceProgress::new(progress, slice);
		let total = range.len();
		let mut shapes = Vec::new();
		let mut properties = Vec::with_capacity(total);

		for (done, index) in range.enumerate() {
			let feature = &features[index];
			ensure!(feature.is_object(), "feature at index {index} is not an object");
			properties.push(feature_properties(feature, index)?);

			let geometries = parse_feature_geometries(feature).with_context(|| {
				format!("object at index {index} doesn't contain valid geometry or geometries")
			})?;
			for geometry in geometries {
				if fold_bounds {
					accumulator.fold(&geometry.compute_bounds())?;
				}
				shapes.push(Shape::new(geometry, index));
			}
			slice_progress.update(done + 1, total);
		}
		Ok((shapes, properties))
	})?;

	let boundaries = match boundaries {
		Some(boundaries) => boundaries,
		None => accumulator.finish()?,
	};

	let mut data = GeoJsonData {
		shapes: Vec::new(),
		properties: Vec::with_capacity(features.len()),
		boundaries,
	};
	for (shapes, properties) in slices {
		data.shapes.extend(shapes);
		data.properties.extend(properties);
	}
	log::debug!("read {} shapes from {} features", data.shapes.len(), data.properties.len());
	Ok(data)
}

/// Reads and parses a GeoJSON file, see [`parse_geojson`].
#[context("failed to read GeoJSON file {path:?}")]
pub fn read_geojson_file(
	path: &Path,
	boundaries: Option<Boundaries>,
	threads: usize,
	progress: &dyn ProgressSink,
) -> Result<GeoJsonData> {
	log::info!("reading GeoJSON {path:?}");
	let text = fs::read_to_string(path)?;
	parse_geojson(&text, boundaries, threads, progress)
}
