use crate::transform::LayerStyles;
use anyhow::Result;
use geopixel_container::geopackage::{GeoPackageReader, LayerShapes};
use geopixel_core::{Boundaries, BoundaryAccumulator, progress::ProgressSink};
use geopixel_derive::context;
use geopixel_geometry::draw::PixelMapping;
use geopixel_image::{DynamicImage, RgbaImage, flip_vertical_in_place, write_png};
use std::path::PathBuf;

/// A GeoPackage conversion job.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoPackageJob {
	pub input: PathBuf,
	pub output: PathBuf,
	pub width: u32,
	pub height: u32,
	/// Computed across all selected layers if not set.
	pub boundaries: Option<Boundaries>,
	/// Layers in drawing order. Empty selects every feature layer.
	pub layers: Vec<String>,
	pub styles: LayerStyles,
	pub flip_y: bool,
}

/// Decodes and styles the selected layers. Returns the layers in drawing order together
/// with the boundaries to draw them in.
///
/// A layer that fails to read (unknown name, missing style, undecodable geometry) fails
/// the whole job, so no image is written from a subset of the selected layers. Layers that
/// are not selected are never read.
pub fn read_layers(
	reader: &GeoPackageReader,
	job: &GeoPackageJob,
	threads: usize,
	progress: &dyn ProgressSink,
) -> Result<(Vec<LayerShapes>, Boundaries)> {
	let names = if job.layers.is_empty() {
		reader.feature_layers()?
	} else {
		job.layers.clone()
	};
	log::debug!("selected layers {names:?}");

	let accumulator = BoundaryAccumulator::new();
	let fold = job.boundaries.is_none().then_some(&accumulator);

	let mut layers = Vec::with_capacity(names.len());
	for name in &names {
		let shapes = reader.read_layer(name, fold, threads, progress, |row, geometry| {
			job.styles.color_for(row, geometry)
		})?;
		log::info!("layer '{name}': {} shapes in {} rows", shapes.shapes.len(), shapes.row_count);
		layers.push(shapes);
	}

	let boundaries = match job.boundaries {
		Some(boundaries) => boundaries,
		None => accumulator.finish()?,
	};
	Ok((layers, boundaries))
}

/// Draws the shapes of all layers, layer by layer in row order.
pub fn render_layers(layers: &[LayerShapes], boundaries: Boundaries, width: u32, height: u32) -> Result<RgbaImage> {
	let mapping = PixelMapping::new(boundaries, width, height)?;
	let mut image = RgbaImage::new(width, height);
	for layer in layers {
		log::trace!("drawing layer '{}'", layer.name);
		for styled in &layer.shapes {
			styled.shape.geometry.rasterize(&mut image, styled.color, &mapping);
		}
	}
	Ok(image)
}

/// Runs a GeoPackage job.
#[context("failed to convert GeoPackage {:?}", job.input)]
pub fn convert_geopackage(job: &GeoPackageJob, threads: usize, progress: &dyn ProgressSink) -> Result<()> {
	let reader = GeoPackageReader::open(&job.input)?;
	let (layers, boundaries) = read_layers(&reader, job, threads, progress)?;
	let mut image = render_layers(&layers, boundaries, job.width, job.height)?;
	if job.flip_y {
		flip_vertical_in_place(&mut image);
	}
	write_png(&DynamicImage::ImageRgba8(image), &job.output)
}
