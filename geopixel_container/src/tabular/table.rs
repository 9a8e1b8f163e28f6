use anyhow::{Context, Result, anyhow, bail, ensure};
use geopixel_core::Boundaries;
use geopixel_derive::context;
use std::{fs::File, io::Read, path::Path};

/// How a delimited file is to be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CsvOptions {
	pub has_header: bool,
	pub delimiter: u8,
}

impl Default for CsvOptions {
	fn default() -> Self {
		CsvOptions {
			has_header: true,
			delimiter: b',',
		}
	}
}

/// A CSV table held as strings. Rows may have different lengths; missing cells read as
/// empty strings.
#[derive(Clone, Debug, PartialEq)]
pub struct CsvTable {
	headers: Vec<String>,
	rows: Vec<Vec<String>>,
}

impl CsvTable {
	pub fn from_reader<R: Read>(reader: R, options: CsvOptions) -> Result<CsvTable> {
		let mut csv_reader = csv::ReaderBuilder::new()
			.has_headers(options.has_header)
			.delimiter(options.delimiter)
			.flexible(true)
			.from_reader(reader);

		let headers: Vec<String> = if options.has_header {
			csv_reader
				.headers()
				.context("failed to read CSV header")?
				.iter()
				.map(String::from)
				.collect()
		} else {
			Vec::new()
		};

		let mut rows = Vec::new();
		for (index, record) in csv_reader.records().enumerate() {
			let record = record.with_context(|| format!("failed to read CSV record {index}"))?;
			rows.push(record.iter().map(String::from).collect::<Vec<_>>());
		}

		let column_count = if options.has_header {
			headers.len()
		} else {
			rows.first().map_or(0, Vec::len)
		};
		ensure!(column_count > 0 && !rows.is_empty(), "invalid CSV file: no rows or no columns");
		ensure!(
			column_count >= 2,
			"CSV file has only one column, whereas it requires at least two (for x and y values)"
		);
		log::debug!("read CSV table with {column_count} columns and {} rows", rows.len());

		let headers = if options.has_header {
			headers
		} else {
			(0..column_count).map(|i| format!("column {}", i + 1)).collect()
		};
		Ok(CsvTable { headers, rows })
	}

	#[context("failed to read CSV file {path:?}")]
	pub fn open(path: &Path, options: CsvOptions) -> Result<CsvTable> {
		log::info!("reading CSV {path:?}");
		let file = File::open(path)?;
		CsvTable::from_reader(file, options)
	}

	/// Column names. Tables without a header row name their columns "column 1", "column 2", …
	pub fn headers(&self) -> &[String] {
		&self.headers
	}

	pub fn column_count(&self) -> usize {
		self.headers.len()
	}

	pub fn row_count(&self) -> usize {
		self.rows.len()
	}

	pub fn row(&self, index: usize) -> Option<&[String]> {
		self.rows.get(index).map(Vec::as_slice)
	}

	/// The cell at `(row, column)`, or an empty string if the row is shorter.
	pub fn cell(&self, row: usize, column: usize) -> &str {
		self.rows
			.get(row)
			.and_then(|cells| cells.get(column))
			.map_or("", String::as_str)
	}

	/// Finds a column by header name, falling back to a zero-based index.
	pub fn resolve_column(&self, name: &str) -> Result<usize> {
		if let Some(index) = self.headers.iter().position(|h| h == name) {
			return Ok(index);
		}
		match name.trim().parse::<usize>() {
			Ok(index) if index < self.column_count() => Ok(index),
			_ => bail!("unknown column '{name}', available are {:?}", self.headers),
		}
	}

	/// The coordinate pair of `row`.
	pub fn coordinate(&self, row: usize, x_column: usize, y_column: usize) -> Result<(f64, f64)> {
		let parse = |column: usize| -> Result<f64> {
			let cell = self.cell(row, column).trim();
			cell
				.parse::<f64>()
				.map_err(|_| anyhow!("invalid CSV file (value '{cell}' in row {row}, column {column} is not a number)"))
		};
		Ok((parse(x_column)?, parse(y_column)?))
	}

	/// Bounding box of all coordinates. Fails if any coordinate cell is not a number.
	pub fn compute_boundaries(&self, x_column: usize, y_column: usize) -> Result<Boundaries> {
		let mut bounds = Boundaries::empty();
		for row in 0..self.rows.len() {
			let (x, y) = self.coordinate(row, x_column, y_column)?;
			bounds.include_point(x, y);
		}
		ensure!(bounds.is_valid(), "CSV table contains no coordinates");
		Ok(bounds)
	}
}
