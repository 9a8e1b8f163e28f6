use anyhow::{Result, bail};
use clap::ArgAction::Count;
use geopixel_container::{
	geopackage::GeoPackageReader,
	raster::RasterReader,
	tabular::{CsvOptions, CsvTable},
};
use geopixel_core::{ConcurrencyLimits, progress::ProgressDrain};
use geopixel_derive::context;
use geopixel_geometry::geojson::read_geojson_file;
use std::{
	collections::BTreeSet,
	fmt::Write,
	path::{Path, PathBuf},
};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// file you want to probe
	/// supported formats are: *.tif, *.tiff, *.gpkg, *.csv, *.geojson, *.json
	#[arg(required = true, verbatim_doc_comment)]
	filename: PathBuf,

	/// deep scan
	/// -d also scans the values of a raster
	#[arg(long, short, action = Count, verbatim_doc_comment)]
	deep: u8,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	eprintln!("probe {:?}", arguments.filename);
	print!("{}", probe_file(&arguments.filename, arguments.deep)?);
	Ok(())
}

#[context("failed to probe {path:?}")]
pub fn probe_file(path: &Path, deep: u8) -> Result<String> {
	let extension = path
		.extension()
		.and_then(|e| e.to_str())
		.map(str::to_ascii_lowercase)
		.unwrap_or_default();
	let threads = ConcurrencyLimits::default().cpu_bound;
	match extension.as_str() {
		"tif" | "tiff" => probe_raster(path, deep, threads),
		"gpkg" => probe_geopackage(path),
		"csv" => probe_csv(path),
		"geojson" | "json" => probe_geojson(path, threads),
		_ => bail!("unknown file type, expected *.tif, *.tiff, *.gpkg, *.csv, *.geojson or *.json"),
	}
}

fn probe_raster(path: &Path, deep: u8, threads: usize) -> Result<String> {
	let reader = RasterReader::open(path)?;
	let properties = reader.properties();
	let mut report = format!("raster: {properties}\n");
	if deep > 0 {
		let (min, max) = reader.min_max(&properties.full_window(), threads, &ProgressDrain)?;
		writeln!(report, "values: {min} .. {max}")?;
	}
	Ok(report)
}

fn probe_geopackage(path: &Path) -> Result<String> {
	let reader = GeoPackageReader::open(path)?;
	let mut report = String::new();
	for layer in reader.layers()? {
		writeln!(report, "layer '{}': {} ({})", layer.name, layer.kind, layer.identifier)?;
	}
	if report.is_empty() {
		report.push_str("no layers\n");
	}
	Ok(report)
}

fn probe_csv(path: &Path) -> Result<String> {
	let table = CsvTable::open(path, CsvOptions::default())?;
	Ok(format!(
		"columns: {}\nrows: {}\n",
		table.headers().join(", "),
		table.row_count()
	))
}

fn probe_geojson(path: &Path, threads: usize) -> Result<String> {
	let data = read_geojson_file(path, None, threads, &ProgressDrain)?;
	let names = data
		.properties
		.iter()
		.flat_map(|properties| properties.keys())
		.collect::<BTreeSet<_>>();
	Ok(format!(
		"features: {}\nshapes: {}\nproperties: {}\nboundaries: {}\n",
		data.properties.len(),
		data.shapes.len(),
		names.into_iter().collect::<Vec<_>>().join(", "),
		data.boundaries
	))
}
