use super::{CsvConfig, GeoJsonConfig, GeoPackageConfig, RasterConfig};
use anyhow::Result;
use geopixel_derive::context;
use geopixel_pipeline::convert::ConversionJob;
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::{Path, PathBuf},
};

/// A conversion job as written in a YAML file.
///
/// ```yaml
/// input: elevation.tif
/// output: elevation.png
/// source:
///   type: raster
///   output:
///     mode: gray16_min_to_max
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
	pub input: PathBuf,
	pub output: PathBuf,
	/// Worker count; all logical CPUs if omitted.
	#[serde(default)]
	pub threads: Option<usize>,
	pub source: SourceConfig,
}

/// The kind of input, selected by `type`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
	Raster(RasterConfig),
	Csv(CsvConfig),
	GeoJson(GeoJsonConfig),
	GeoPackage(GeoPackageConfig),
}

impl JobConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parses a job file. Relative input and output paths are resolved against the
	/// directory of the job file.
	#[context("failed to read job file {path:?}")]
	pub fn from_path(path: &Path) -> Result<Self> {
		log::debug!("reading job {path:?}");
		let file = File::open(path)?;
		let mut config = JobConfig::from_reader(BufReader::new(file))?;
		if let Some(base) = path.parent() {
			config.resolve_paths(base);
		}
		Ok(config)
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		if self.input.is_relative() {
			self.input = base.join(&self.input);
		}
		if self.output.is_relative() {
			self.output = base.join(&self.output);
		}
	}

	/// Builds the job the pipeline runs.
	#[context("invalid {} job", self.source.name())]
	pub fn to_job(&self) -> Result<ConversionJob> {
		let input = self.input.clone();
		let output = self.output.clone();
		Ok(match &self.source {
			SourceConfig::Raster(config) => ConversionJob::Raster(config.to_job(input, output)?),
			SourceConfig::Csv(config) => ConversionJob::Points(config.to_job(input, output)?),
			SourceConfig::GeoJson(config) => ConversionJob::GeoJson(config.to_job(input, output)?),
			SourceConfig::GeoPackage(config) => ConversionJob::GeoPackage(config.to_job(input, output)?),
		})
	}
}

impl SourceConfig {
	pub fn name(&self) -> &'static str {
		match self {
			SourceConfig::Raster(_) => "raster",
			SourceConfig::Csv(_) => "csv",
			SourceConfig::GeoJson(_) => "geojson",
			SourceConfig::GeoPackage(_) => "geopackage",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use geopixel_pipeline::convert::{RasterOutput, ScaleMode, TileMode};
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	const RASTER: &str = "input: in/dem.tif
output: out/dem.png
threads: 3
source:
  type: raster
  output:
    mode: gray16_min_to_max
";

	#[test]
	fn parse_raster_job() {
		let config = JobConfig::from_string(RASTER).unwrap();
		assert_eq!(config.threads, Some(3));
		assert_eq!(config.source.name(), "raster");
		let ConversionJob::Raster(job) = config.to_job().unwrap() else {
			panic!("expected a raster job");
		};
		assert_eq!(job.input, PathBuf::from("in/dem.tif"));
		assert_eq!(job.mode, RasterOutput::Gray16MinToMax { min: None, max: None });
		assert_eq!(job.scale, ScaleMode::None);
		assert_eq!(job.tiles, TileMode::None);
	}

	#[rstest]
	#[case("csv", "source:\n  type: csv\n  x_column: 0\n  y_column: 1\n  width: 4\n  height: 4\n  styles: [{shape_color: \"0,0,0\", center_color: \"0,0,0\", shape: square}]")]
	#[case("geojson", "source:\n  type: geojson\n  width: 4\n  height: 4")]
	#[case("geopackage", "source:\n  type: geopackage\n  width: 4\n  height: 4\n  styles: {\"!ALL LAYERS!\": [{color: \"0,0,0\"}]}")]
	fn parse_vector_jobs(#[case] name: &str, #[case] source: &str) {
		let config = JobConfig::from_string(&format!("input: a\noutput: b\n{source}")).unwrap();
		assert_eq!(config.source.name(), name);
		let job = config.to_job().unwrap();
		assert_eq!(job.input(), Path::new("a"));
		assert_eq!(job.output(), Path::new("b"));
	}

	#[rstest]
	#[case("input: a\noutput: b\nsource: {type: shapefile}")]
	#[case("input: a\noutput: b\nsource: {type: geojson, width: 1, height: 1, depth: 3}")]
	#[case("input: a\noutput: b\nextra: 1\nsource: {type: geojson, width: 1, height: 1}")]
	#[case("input: a\nsource: {type: geojson, width: 1, height: 1}")]
	fn rejects_invalid_documents(#[case] yaml: &str) {
		assert!(JobConfig::from_string(yaml).is_err());
	}

	#[test]
	fn invalid_job_names_the_source() {
		let config =
			JobConfig::from_string("input: a\noutput: b\nsource: {type: geojson, width: 1, height: 1, styles: [{color: red}]}")
				.unwrap();
		let error = config.to_job().unwrap_err();
		assert_eq!(
			format!("{error:#}"),
			"invalid geojson job: invalid color 'red': expected 'r,g,b' or 'r,g,b,a'"
		);
	}

	#[test]
	fn paths_are_relative_to_the_job_file() {
		let dir = assert_fs::TempDir::new().unwrap();
		let path = dir.path().join("job.yml");
		std::fs::write(&path, RASTER.replace("out/dem.png", "/tmp/dem.png")).unwrap();
		let config = JobConfig::from_path(&path).unwrap();
		assert_eq!(config.input, dir.path().join("in/dem.tif"));
		assert_eq!(config.output, PathBuf::from("/tmp/dem.png"));
	}

	#[test]
	fn missing_job_file() {
		let error = JobConfig::from_path(Path::new("/no/such/job.yml")).unwrap_err();
		assert_eq!(error.to_string(), "failed to read job file \"/no/such/job.yml\"");
	}
}
