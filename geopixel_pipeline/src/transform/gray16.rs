use geopixel_core::remap;

/// How a raster cell becomes a 16 bit gray value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gray16Transform {
	/// `cell + offset`, clamped to `0..=65535` and truncated.
	TrueValue { offset: f64 },
	/// `min` maps to 0 and `max` to 65535, rounded.
	MinToMax { min: f64, max: f64 },
}

impl Gray16Transform {
	pub fn apply(&self, cell: f64) -> u16 {
		match *self {
			Gray16Transform::TrueValue { offset } => gray16_true_value(cell, offset),
			Gray16Transform::MinToMax { min, max } => gray16_min_to_max(cell, min, max),
		}
	}
}

pub fn gray16_true_value(cell: f64, offset: f64) -> u16 {
	// NaN falls through the clamp and casts to 0
	(cell + offset).clamp(0.0, f64::from(u16::MAX)) as u16
}

/// A degenerate range (`min == max`) maps everything to 0.
pub fn gray16_min_to_max(cell: f64, min: f64, max: f64) -> u16 {
	if min == max {
		return 0;
	}
	let max_value = f64::from(u16::MAX);
	remap(cell, min, max, 0.0, max_value).round().clamp(0.0, max_value) as u16
}
