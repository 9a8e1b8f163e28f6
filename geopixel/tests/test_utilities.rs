#![allow(unused)]

use assert_cmd::{Command, cargo};
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Helper to create a Command for the geopixel binary.
pub fn geopixel_cmd() -> Command {
	Command::new(cargo::cargo_bin!())
}

/// Helper to get a temp directory with a job file written into it.
pub fn write_job(yaml: &str) -> (TempDir, PathBuf) {
	let dir = tempdir().expect("failed to create temp dir");
	let path = dir.path().join("job.yml");
	std::fs::write(&path, yaml).expect("failed to write job file");
	(dir, path)
}

pub fn path_str(path: &Path) -> &str {
	path.to_str().expect("path is not valid UTF-8")
}
