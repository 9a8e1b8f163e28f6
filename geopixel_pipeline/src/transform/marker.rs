use anyhow::{Result, bail, ensure};
use geopixel_core::Color;
use std::{fmt::Display, str::FromStr};

/// The outline drawn around a CSV point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
	Square,
	EmptySquare,
	Circle,
	EmptyCircle,
}

impl MarkerShape {
	/// Whether the cell at offset `(dx, dy)` from the center belongs to a marker of `size`.
	///
	/// Only offsets with `|dx|, |dy| < size` are ever asked for.
	pub fn covers(&self, dx: i64, dy: i64, size: u32) -> bool {
		let size = i64::from(size);
		let distance = || ((dx * dx + dy * dy) as f64).sqrt();
		match self {
			MarkerShape::Square => true,
			MarkerShape::EmptySquare => dx.abs() == size - 1 || dy.abs() == size - 1,
			MarkerShape::Circle => distance() < size as f64 - 0.6,
			MarkerShape::EmptyCircle => {
				let distance = distance();
				distance >= (size - 1) as f64 && distance < size as f64 - 0.1
			}
		}
	}
}

impl FromStr for MarkerShape {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s.to_ascii_lowercase().as_str() {
			"square" => MarkerShape::Square,
			"emptysquare" => MarkerShape::EmptySquare,
			"circle" => MarkerShape::Circle,
			"emptycircle" => MarkerShape::EmptyCircle,
			_ => bail!("unknown marker shape '{s}', expected square, emptysquare, circle or emptycircle"),
		})
	}
}

impl Display for MarkerShape {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			MarkerShape::Square => "square",
			MarkerShape::EmptySquare => "emptysquare",
			MarkerShape::Circle => "circle",
			MarkerShape::EmptyCircle => "emptycircle",
		})
	}
}

/// How the points of a CSV file are drawn.
///
/// The center cell gets `center_color`; markers of `size` 2 or more also fill the cells
/// within `size - 1` of the center that `shape` covers with `shape_color`.
#[derive(Clone, Debug, PartialEq)]
pub struct PointStyle {
	pub shape_color: Color,
	pub center_color: Color,
	pub shape: MarkerShape,
	pub size: u32,
	/// Column this style is selected by; ignored for the first (default) style.
	pub column: Option<String>,
	/// Required column value; empty matches any non-empty cell.
	pub value: String,
}

/// A [`PointStyle`] condition with its column resolved to an index.
#[derive(Clone, Debug, PartialEq)]
pub struct PointStyleMatcher {
	conditions: Vec<Option<(usize, String)>>,
}

impl PointStyleMatcher {
	/// `resolve` maps a column name of a style to its index.
	pub fn new(styles: &[PointStyle], resolve: impl Fn(&str) -> Result<usize>) -> Result<PointStyleMatcher> {
		ensure!(!styles.is_empty(), "no point style configured");
		let conditions = styles
			.iter()
			.enumerate()
			.map(|(index, style)| match (&style.column, index) {
				(Some(column), 1..) => Ok(Some((resolve(column)?, style.value.clone()))),
				_ => Ok(None),
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(PointStyleMatcher { conditions })
	}

	/// Index of the style for a row whose cells are looked up with `cell`.
	pub fn style_index<'a>(&self, cell: impl Fn(usize) -> &'a str) -> usize {
		if self.conditions.len() == 1 {
			return 0;
		}
		self
			.conditions
			.iter()
			.enumerate()
			.skip(1)
			.find_map(|(index, condition)| {
				let (column, value) = condition.as_ref()?;
				let cell = cell(*column);
				let hit = if value.is_empty() {
					!cell.is_empty()
				} else {
					cell == value
				};
				hit.then_some(index)
			})
			.unwrap_or(0)
	}
}
