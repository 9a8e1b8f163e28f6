use super::ColorTable;
use anyhow::Result;
use geopixel_core::Color;

/// How a raster cell becomes an RGBA color.
#[derive(Clone, Debug, PartialEq)]
pub enum RgbTransform {
	/// Exact lookup; every value in the raster needs an entry.
	UserValues(ColorTable),
	/// Step function over the table keys, optionally blended.
	UserRanges { table: ColorTable, gradient: bool },
	/// Fixed encoding of the integer part, see [`formula_color`].
	Formula,
}

impl RgbTransform {
	pub fn apply(&self, cell: f64) -> Result<Color> {
		Ok(match self {
			RgbTransform::UserValues(table) => table.exact(cell)?,
			RgbTransform::UserRanges { table, gradient } => table.range(cell, *gradient),
			RgbTransform::Formula => formula_color(cell),
		})
	}
}

/// Encodes the integer part of `cell` as a 24 bit big endian number in red, green and blue.
///
/// Negative values are encoded by their magnitude with alpha 128, other values get alpha 255.
/// Magnitudes of 256³ and above become white.
pub fn formula_color(cell: f64) -> Color {
	let value = cell as i64;
	let alpha = if value < 0 { 128 } else { 255 };
	let magnitude = value.unsigned_abs();
	if magnitude >= 1 << 24 {
		return Color::new(255, 255, 255, alpha);
	}
	Color::new(
		(magnitude >> 16) as u8,
		((magnitude >> 8) & 0xFF) as u8,
		(magnitude & 0xFF) as u8,
		alpha,
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0.0, [0, 0, 0, 255])]
	#[case(-1.0, [0, 0, 1, 128])]
	#[case(255.9, [0, 0, 255, 255])]
	#[case(256.0, [0, 1, 0, 255])]
	#[case(65536.0, [1, 0, 0, 255])]
	#[case(16_777_215.0, [255, 255, 255, 255])]
	#[case(16_777_216.0, [255, 255, 255, 255])]
	#[case(-1e12, [255, 255, 255, 128])]
	#[case(-0.5, [0, 0, 0, 255])]
	fn formula(#[case] cell: f64, #[case] expected: [u8; 4]) {
		assert_eq!(formula_color(cell), Color(expected));
	}

	#[test]
	fn dispatch() {
		let table = ColorTable::new([(1.0, Color::BLACK), (2.0, Color::WHITE)]).unwrap();
		assert_eq!(RgbTransform::UserValues(table.clone()).apply(2.0).unwrap(), Color::WHITE);
		assert!(RgbTransform::UserValues(table.clone()).apply(1.5).is_err());
		let ranges = RgbTransform::UserRanges { table, gradient: false };
		assert_eq!(ranges.apply(1.5).unwrap(), Color::WHITE);
		assert_eq!(RgbTransform::Formula.apply(1.0).unwrap(), Color::new(0, 0, 1, 255));
	}
}
