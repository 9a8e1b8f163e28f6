//! Conversion jobs: each reads one source, transforms it on all workers and writes PNG files.

mod geojson;
mod geopackage;
mod points;
mod raster;
mod scale;
mod tiles;

pub use geojson::*;
pub use geopackage::*;
pub use points::*;
pub use raster::*;
pub use scale::*;
pub use tiles::*;

use anyhow::Result;
use geopixel_core::progress::ProgressSink;
use std::path::{Path, PathBuf};

/// One conversion, by source kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ConversionJob {
	Raster(RasterJob),
	Points(PointsJob),
	GeoJson(GeoJsonJob),
	GeoPackage(GeoPackageJob),
}

impl ConversionJob {
	pub fn input(&self) -> &Path {
		match self {
			ConversionJob::Raster(job) => &job.input,
			ConversionJob::Points(job) => &job.input,
			ConversionJob::GeoJson(job) => &job.input,
			ConversionJob::GeoPackage(job) => &job.input,
		}
	}

	pub fn output(&self) -> &Path {
		match self {
			ConversionJob::Raster(job) => &job.output,
			ConversionJob::Points(job) => &job.output,
			ConversionJob::GeoJson(job) => &job.output,
			ConversionJob::GeoPackage(job) => &job.output,
		}
	}

	pub fn set_input(&mut self, path: PathBuf) {
		match self {
			ConversionJob::Raster(job) => job.input = path,
			ConversionJob::Points(job) => job.input = path,
			ConversionJob::GeoJson(job) => job.input = path,
			ConversionJob::GeoPackage(job) => job.input = path,
		}
	}

	pub fn set_output(&mut self, path: PathBuf) {
		match self {
			ConversionJob::Raster(job) => job.output = path,
			ConversionJob::Points(job) => job.output = path,
			ConversionJob::GeoJson(job) => job.output = path,
			ConversionJob::GeoPackage(job) => job.output = path,
		}
	}
}

/// Runs `job` on `threads` workers and returns the written files.
pub fn run_conversion(job: &ConversionJob, threads: usize, progress: &dyn ProgressSink) -> Result<Vec<PathBuf>> {
	let threads = threads.max(1);
	log::info!("converting {:?} with {threads} threads", job.input());
	match job {
		ConversionJob::Raster(job) => convert_raster(job, threads, progress),
		ConversionJob::Points(job) => {
			convert_points(job, threads, progress)?;
			Ok(vec![job.output.clone()])
		}
		ConversionJob::GeoJson(job) => {
			convert_geojson(job, threads, progress)?;
			Ok(vec![job.output.clone()])
		}
		ConversionJob::GeoPackage(job) => {
			convert_geopackage(job, threads, progress)?;
			Ok(vec![job.output.clone()])
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transform::{FeatureStyles, StyleRule};
	use geopixel_core::{Color, progress::ProgressDrain};

	fn geojson_job(dir: &Path) -> ConversionJob {
		ConversionJob::GeoJson(GeoJsonJob {
			input: dir.join("in.geojson"),
			output: dir.join("out.png"),
			width: 4,
			height: 4,
			boundaries: None,
			styles: FeatureStyles::new(vec![StyleRule::new(Color::WHITE)]),
			flip_y: true,
		})
	}

	#[test]
	fn paths_can_be_overridden() {
		let mut job = geojson_job(Path::new("/data"));
		assert_eq!(job.input(), Path::new("/data/in.geojson"));
		job.set_input(PathBuf::from("a.json"));
		job.set_output(PathBuf::from("b.png"));
		assert_eq!(job.input(), Path::new("a.json"));
		assert_eq!(job.output(), Path::new("b.png"));
	}

	#[test]
	fn returns_written_files() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(
			dir.path().join("in.geojson"),
			r#"{"features": [{"properties": {}, "geometry": {"type": "LineString", "coordinates": [[0, 0], [3, 3]]}}]}"#,
		)
		.unwrap();
		let job = geojson_job(dir.path());
		let files = run_conversion(&job, 0, &ProgressDrain).unwrap();
		assert_eq!(files, vec![dir.path().join("out.png")]);
		assert!(files[0].exists());
	}
}
