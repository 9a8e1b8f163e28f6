use anyhow::Result;
use geopixel::config::JobConfig;
use geopixel_core::{ConcurrencyLimits, progress::get_progress_bar};
use geopixel_pipeline::convert::run_conversion;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// YAML job file
	#[arg()]
	job_file: PathBuf,

	/// read from this file instead of the job's input
	#[arg(long, short, value_name = "PATH", display_order = 1)]
	input: Option<PathBuf>,

	/// write to this file instead of the job's output
	#[arg(long, short, value_name = "PATH", display_order = 1)]
	output: Option<PathBuf>,

	/// number of worker threads, defaults to the job's setting or all CPUs
	#[arg(long, short, value_name = "int", display_order = 2)]
	threads: Option<usize>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let config = JobConfig::from_path(&arguments.job_file)?;
	let mut job = config.to_job()?;
	if let Some(input) = &arguments.input {
		job.set_input(input.clone());
	}
	if let Some(output) = &arguments.output {
		job.set_output(output.clone());
	}
	let threads = arguments
		.threads
		.or(config.threads)
		.unwrap_or_else(|| ConcurrencyLimits::default().cpu_bound);

	eprintln!("convert {:?} to {:?}", job.input(), job.output());

	let progress = get_progress_bar("converting");
	let files = run_conversion(&job, threads, &progress)?;
	progress.finish();

	for file in &files {
		log::info!("wrote {file:?}");
	}
	eprintln!("finished converting, {} file(s) written", files.len());

	Ok(())
}
