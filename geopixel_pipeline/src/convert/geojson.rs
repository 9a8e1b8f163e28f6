use crate::transform::FeatureStyles;
use anyhow::{Result, anyhow};
use geopixel_core::{
	Boundaries,
	progress::{ProgressSink, SliceProgress},
	run_partitioned,
};
use geopixel_derive::context;
use geopixel_geometry::{
	draw::PixelMapping,
	geojson::{GeoJsonData, read_geojson_file},
};
use geopixel_image::{DynamicImage, RgbaImage, flip_vertical_in_place, write_png};
use std::{path::PathBuf, sync::Mutex};

/// A GeoJSON conversion job.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoJsonJob {
	pub input: PathBuf,
	pub output: PathBuf,
	pub width: u32,
	pub height: u32,
	/// Computed from all coordinates if not set.
	pub boundaries: Option<Boundaries>,
	pub styles: FeatureStyles,
	pub flip_y: bool,
}

/// Draws every shape of `data` into a `width`×`height` canvas.
///
/// Colors are picked in parallel, the drawing itself is serialized through a lock because
/// polygon holes read back pixels of the canvas.
pub fn render_geojson(
	data: &GeoJsonData,
	width: u32,
	height: u32,
	styles: &FeatureStyles,
	threads: usize,
	progress: &dyn ProgressSink,
) -> Result<RgbaImage> {
	let mapping = PixelMapping::new(data.boundaries, width, height)?;
	let canvas = Mutex::new(RgbaImage::new(width, height));
	log::debug!("drawing {} shapes inside {}", data.shapes.len(), data.boundaries);

	run_partitioned(0..data.shapes.len(), threads, |slice, range| {
		let slice_progress = SliceProgress::new(progress, slice);
		let total = range.len();
		for (done, index) in range.enumerate() {
			let shape = &data.shapes[index];
			let properties = shape.property_id.and_then(|id| data.properties.get(id));
			let color = styles.color_for(shape.geometry.get_type(), properties);

			let mut image = canvas.lock().map_err(|_| anyhow!("canvas lock is poisoned"))?;
			shape.geometry.rasterize(&mut image, color, &mapping);
			drop(image);

			slice_progress.update(done + 1, total);
		}
		Ok(())
	})?;

	canvas.into_inner().map_err(|_| anyhow!("canvas lock is poisoned"))
}

/// Runs a GeoJSON job.
#[context("failed to convert GeoJSON file {:?}", job.input)]
pub fn convert_geojson(job: &GeoJsonJob, threads: usize, progress: &dyn ProgressSink) -> Result<()> {
	let data = read_geojson_file(&job.input, job.boundaries, threads, progress)?;
	let mut image = render_geojson(&data, job.width, job.height, &job.styles, threads, progress)?;
	if job.flip_y {
		flip_vertical_in_place(&mut image);
	}
	write_png(&DynamicImage::ImageRgba8(image), &job.output)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transform::StyleRule;
	use geopixel_core::{Color, progress::ProgressDrain};
	use geopixel_geometry::geojson::parse_geojson;
	use geopixel_image::decode_png;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	const RED: Color = Color::new(255, 0, 0, 255);
	const GREEN: Color = Color::new(0, 255, 0, 255);
	const BLUE: Color = Color::new(0, 0, 255, 255);

	const DOCUMENT: &str = r#"{
		"type": "FeatureCollection",
		"features": [
			{"type": "Feature", "properties": {"kind": "tree"},
			 "geometry": {"type": "Point", "coordinates": [0, 0]}},
			{"type": "Feature", "properties": {"kind": "bush", "height": 2},
			 "geometry": {"type": "Point", "coordinates": [4, 0]}},
			{"type": "Feature", "properties": {"kind": "rock"},
			 "geometry": {"type": "LineString", "coordinates": [[0, 4], [4, 4]]}},
			{"type": "Feature", "properties": {"kind": "rock"},
			 "geometry": {"type": "Point", "coordinates": [2, 2]}}
		]
	}"#;

	fn styles() -> FeatureStyles {
		FeatureStyles::new(vec![
			StyleRule::new(RED),
			StyleRule::matching(GREEN, "height", "2"),
			StyleRule::matching(BLUE, "!GEOMETRY TYPE!", "LineString"),
		])
	}

	fn pixel(image: &RgbaImage, x: u32, y: u32) -> Color {
		Color(image.get_pixel(x, y).0)
	}

	#[rstest]
	#[case(1)]
	#[case(3)]
	#[case(8)]
	fn draws_styled_shapes(#[case] threads: usize) {
		let data = parse_geojson(DOCUMENT, None, threads, &ProgressDrain).unwrap();
		let image = render_geojson(&data, 5, 5, &styles(), threads, &ProgressDrain).unwrap();

		assert_eq!(pixel(&image, 0, 0), RED);
		assert_eq!(pixel(&image, 4, 0), GREEN);
		assert_eq!(pixel(&image, 2, 2), RED);
		for x in 0..5 {
			assert_eq!(pixel(&image, x, 4), BLUE);
		}
		assert_eq!(pixel(&image, 1, 1), Color::TRANSPARENT);
		assert_eq!(image.pixels().filter(|p| p.0[3] > 0).count(), 8);
	}

	#[test]
	fn explicit_boundaries_clip_shapes() {
		let bounds = Boundaries::new(0.0, 2.0, 0.0, 2.0).unwrap();
		let data = parse_geojson(DOCUMENT, Some(bounds), 2, &ProgressDrain).unwrap();
		let image = render_geojson(&data, 3, 3, &styles(), 2, &ProgressDrain).unwrap();
		assert_eq!(pixel(&image, 0, 0), RED);
		assert_eq!(pixel(&image, 2, 2), RED);
		assert_eq!(image.pixels().filter(|p| p.0[3] > 0).count(), 2);
	}

	#[test]
	fn empty_style_list_is_transparent() {
		let data = parse_geojson(DOCUMENT, None, 1, &ProgressDrain).unwrap();
		let image = render_geojson(&data, 5, 5, &FeatureStyles::default(), 1, &ProgressDrain).unwrap();
		assert!(image.pixels().all(|p| p.0 == [0, 0, 0, 0]));
	}

	#[test]
	fn empty_size_fails() {
		let data = parse_geojson(DOCUMENT, None, 1, &ProgressDrain).unwrap();
		assert!(render_geojson(&data, 0, 5, &styles(), 1, &ProgressDrain).is_err());
	}

	#[rstest]
	#[case(false, 0)]
	#[case(true, 4)]
	fn convert_writes_png(#[case] flip_y: bool, #[case] tree_row: u32) {
		let dir = tempfile::tempdir().unwrap();
		let job = GeoJsonJob {
			input: dir.path().join("features.geojson"),
			output: dir.path().join("features.png"),
			width: 5,
			height: 5,
			boundaries: None,
			styles: styles(),
			flip_y,
		};
		std::fs::write(&job.input, DOCUMENT).unwrap();
		convert_geojson(&job, 2, &ProgressDrain).unwrap();

		let image = decode_png(&std::fs::read(&job.output).unwrap()).unwrap().to_rgba8();
		assert_eq!(image.dimensions(), (5, 5));
		assert_eq!(pixel(&image, 0, tree_row), RED);
		assert_eq!(pixel(&image, 0, 4 - tree_row), BLUE);
	}

	#[test]
	fn missing_file_names_the_input() {
		let job = GeoJsonJob {
			input: PathBuf::from("/does/not/exist.geojson"),
			output: PathBuf::from("/does/not/exist.png"),
			width: 5,
			height: 5,
			boundaries: None,
			styles: styles(),
			flip_y: true,
		};
		let error = convert_geojson(&job, 1, &ProgressDrain).unwrap_err();
		assert_eq!(error.to_string(), "failed to convert GeoJSON file \"/does/not/exist.geojson\"");
	}
}
