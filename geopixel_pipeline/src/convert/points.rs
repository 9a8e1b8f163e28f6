use crate::transform::{PointStyle, PointStyleMatcher};
use anyhow::{Result, ensure};
use geopixel_container::tabular::{CsvOptions, CsvTable};
use geopixel_core::{
	Boundaries, coordinate_to_pixel,
	progress::{ProgressSink, SliceProgress},
	run_partitioned,
};
use geopixel_derive::context;
use geopixel_image::{PlanarImage, write_png};
use std::path::PathBuf;

/// A CSV point conversion job.
#[derive(Clone, Debug, PartialEq)]
pub struct PointsJob {
	pub input: PathBuf,
	pub output: PathBuf,
	/// Column name or zero-based column index.
	pub x_column: String,
	pub y_column: String,
	pub width: u32,
	pub height: u32,
	/// Computed from the coordinates if not set.
	pub boundaries: Option<Boundaries>,
	pub csv: CsvOptions,
	/// The first style is the default.
	pub styles: Vec<PointStyle>,
}

/// The output position of one CSV row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Marker {
	x: i64,
	y: i64,
	style: usize,
}

/// Draws every row of `table` as a marker into a `width`×`height` image.
///
/// Markers are placed and styled in parallel. All center cells are set first; marker shapes
/// then fill the surrounding cells in row order, never overwriting a center cell.
pub fn render_points(
	table: &CsvTable,
	job: &PointsJob,
	threads: usize,
	progress: &dyn ProgressSink,
) -> Result<PlanarImage> {
	ensure!(
		job.width > 0 && job.height > 0,
		"output size {}x{} has no pixels",
		job.width,
		job.height
	);
	let x_column = table.resolve_column(&job.x_column)?;
	let y_column = table.resolve_column(&job.y_column)?;
	let matcher = PointStyleMatcher::new(&job.styles, |name| table.resolve_column(name))?;

	// validates every coordinate, even when the boundaries are given
	let computed = table.compute_boundaries(x_column, y_column)?;
	let bounds = job.boundaries.unwrap_or(computed);
	log::debug!("drawing {} points inside {bounds}", table.row_count());

	let slices = run_partitioned(0..table.row_count(), threads, |slice, rows| {
		let slice_progress = SliceProgress::new(progress, slice);
		let total = rows.len();
		let mut markers = Vec::with_capacity(total);
		for (done, row) in rows.enumerate() {
			let (x, y) = table.coordinate(row, x_column, y_column)?;
			if bounds.contains_point(x, y) {
				markers.push(Marker {
					x: coordinate_to_pixel(x, bounds.min_x, bounds.max_x, job.width),
					y: coordinate_to_pixel(y, bounds.min_y, bounds.max_y, job.height),
					style: matcher.style_index(|column| table.cell(row, column)),
				});
			}
			slice_progress.update(done + 1, total);
		}
		Ok(markers)
	})?;
	let markers = slices.into_iter().flatten().collect::<Vec<_>>();

	let width = job.width as usize;
	let mut image = PlanarImage::new(job.width, job.height);
	let mut centers = vec![false; image.pixel_count()];
	let index_of = |x: i64, y: i64| -> Option<usize> {
		(x >= 0 && y >= 0 && x < i64::from(job.width) && y < i64::from(job.height))
			.then(|| y as usize * width + x as usize)
	};

	for marker in &markers {
		if let Some(index) = index_of(marker.x, marker.y) {
			image.set_pixel(index, job.styles[marker.style].center_color);
			centers[index] = true;
		}
	}

	for marker in &markers {
		let style = &job.styles[marker.style];
		if style.size < 2 {
			continue;
		}
		let reach = i64::from(style.size) - 1;
		for dy in -reach..=reach {
			for dx in -reach..=reach {
				let Some(index) = index_of(marker.x + dx, marker.y + dy) else {
					continue;
				};
				if centers[index] || !style.shape.covers(dx, dy, style.size) {
					continue;
				}
				image.set_pixel(index, style.shape_color);
			}
		}
	}
	Ok(image)
}

/// Runs a CSV point job.
#[context("failed to convert CSV file {:?}", job.input)]
pub fn convert_points(job: &PointsJob, threads: usize, progress: &dyn ProgressSink) -> Result<()> {
	let table = CsvTable::open(&job.input, job.csv)?;
	let image = render_points(&table, job, threads, progress)?;
	write_png(&image.to_dynamic_image(false)?, &job.output)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transform::MarkerShape;
	use geopixel_core::{Color, progress::ProgressDrain};
	use geopixel_image::decode_png;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	const RED: Color = Color::new(255, 0, 0, 255);
	const GREEN: Color = Color::new(0, 255, 0, 255);
	const BLUE: Color = Color::new(0, 0, 255, 255);

	fn style(
		center_color: Color,
		shape: MarkerShape,
		size: u32,
		column: Option<&str>,
		value: &str,
	) -> PointStyle {
		PointStyle {
			shape_color: Color::BLACK,
			center_color,
			shape,
			size,
			column: column.map(str::to_string),
			value: value.to_string(),
		}
	}

	fn job(styles: Vec<PointStyle>, boundaries: Option<Boundaries>) -> PointsJob {
		PointsJob {
			input: PathBuf::from("points.csv"),
			output: PathBuf::from("points.png"),
			x_column: String::from("lon"),
			y_column: String::from("lat"),
			width: 5,
			height: 5,
			boundaries,
			csv: CsvOptions::default(),
			styles,
		}
	}

	fn table(text: &str) -> CsvTable {
		CsvTable::from_reader(text.as_bytes(), CsvOptions::default()).unwrap()
	}

	/// One character per cell: `.` empty, `#` shape, `r`/`g`/`b` centers.
	fn picture(image: &PlanarImage) -> Vec<String> {
		(0..image.height() as usize)
			.map(|y| {
				(0..image.width() as usize)
					.map(|x| match image.pixel(y * image.width() as usize + x) {
						Color::TRANSPARENT => '.',
						RED => 'r',
						GREEN => 'g',
						BLUE => 'b',
						Color::BLACK => '#',
						_ => '?',
					})
					.collect()
			})
			.collect()
	}

	#[rstest]
	#[case(1)]
	#[case(4)]
	fn centers_and_styles(#[case] threads: usize) {
		let table = table("lon,lat,kind\n0,0,tree\n4,4,bush\n2,1,\n");
		let styles = vec![
			style(RED, MarkerShape::Square, 1, None, ""),
			style(GREEN, MarkerShape::Square, 1, Some("kind"), "tree"),
			style(BLUE, MarkerShape::Square, 1, Some("kind"), ""),
		];
		let image = render_points(&table, &job(styles, None), threads, &ProgressDrain).unwrap();
		assert_eq!(picture(&image), ["g....", "..r..", ".....", ".....", "....b"]);
	}

	#[test]
	fn shapes_do_not_cover_other_centers() {
		let table = table("lon,lat\n1,1\n2,1\n");
		let styles = vec![style(RED, MarkerShape::Square, 2, None, "")];
		let bounds = Boundaries::new(0.0, 4.0, 0.0, 4.0).unwrap();
		let image = render_points(&table, &job(styles, Some(bounds)), 2, &ProgressDrain).unwrap();
		assert_eq!(picture(&image), ["####.", "#rr#.", "####.", ".....", "....."]);
	}

	#[test]
	fn outlines_are_clipped_at_the_edge() {
		let table = table("lon,lat\n0,2\n");
		let styles = vec![style(RED, MarkerShape::EmptySquare, 3, None, "")];
		let bounds = Boundaries::new(0.0, 4.0, 0.0, 4.0).unwrap();
		let image = render_points(&table, &job(styles, Some(bounds)), 1, &ProgressDrain).unwrap();
		assert_eq!(picture(&image), ["###..", "..#..", "r.#..", "..#..", "###.."]);
	}

	#[test]
	fn points_outside_the_boundaries_are_skipped() {
		let table = table("lon,lat\n1,1\n9,9\n");
		let styles = vec![style(RED, MarkerShape::Circle, 1, None, "")];
		let bounds = Boundaries::new(0.0, 4.0, 0.0, 4.0).unwrap();
		let image = render_points(&table, &job(styles, Some(bounds)), 1, &ProgressDrain).unwrap();
		assert_eq!(picture(&image), [".....", ".r...", ".....", ".....", "....."]);
	}

	#[test]
	fn invalid_coordinates_fail_even_with_boundaries() {
		let table = table("lon,lat\n1,1\nx,2\n");
		let styles = vec![style(RED, MarkerShape::Square, 1, None, "")];
		let bounds = Boundaries::new(0.0, 4.0, 0.0, 4.0).unwrap();
		let error = render_points(&table, &job(styles, Some(bounds)), 1, &ProgressDrain).unwrap_err();
		assert_eq!(
			error.to_string(),
			"invalid CSV file (value 'x' in row 1, column 0 is not a number)"
		);
	}

	#[test]
	fn unknown_columns() {
		let table = table("lon,lat\n1,1\n");
		let styles = vec![style(RED, MarkerShape::Square, 1, None, "")];
		let mut job = job(styles, None);
		job.y_column = String::from("height");
		assert!(render_points(&table, &job, 1, &ProgressDrain).is_err());
	}

	#[test]
	fn convert_writes_png() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("points.csv");
		std::fs::write(&input, "a;b\n0;0\n1;1\n").unwrap();
		let mut job = job(vec![style(RED, MarkerShape::Square, 1, None, "")], None);
		job.input = input;
		job.output = dir.path().join("points.png");
		job.x_column = String::from("a");
		job.y_column = String::from("1");
		job.csv.delimiter = b';';
		convert_points(&job, 2, &ProgressDrain).unwrap();

		let image = decode_png(&std::fs::read(&job.output).unwrap()).unwrap().to_rgba8();
		assert_eq!(image.get_pixel(0, 0).0, RED.0);
		assert_eq!(image.get_pixel(4, 4).0, RED.0);
		assert_eq!(image.get_pixel(2, 2).0, [0, 0, 0, 0]);
	}
}
