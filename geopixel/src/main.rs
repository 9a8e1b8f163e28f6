mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[clap(alias = "render")]
	/// Run a conversion job described by a YAML file
	Convert(tools::convert::Subcommand),

	/// Show what geopixel sees in an input file
	Probe(tools::probe::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Convert(arguments) => tools::convert::run(arguments),
		Commands::Probe(arguments) => tools::probe::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	pub fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{cli:?}");
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["geopixel"]).unwrap_err().to_string();
		assert!(err.starts_with("Converts TIFF rasters, CSV points, GeoJSON and GeoPackage layers into PNG images."));
		assert!(err.contains("\nUsage: geopixel [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["geopixel", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("geopixel "));
	}

	#[test]
	fn convert_subcommand() {
		let output = run_command(vec!["geopixel", "convert"]).unwrap_err().to_string();
		assert!(output.starts_with("Run a conversion job described by a YAML file"));
	}

	#[test]
	fn probe_subcommand() {
		let output = run_command(vec!["geopixel", "probe"]).unwrap_err().to_string();
		assert!(output.starts_with("Show what geopixel sees in an input file"));
	}
}
