/// Linear four-point interpolation: maps `value` from `[from1, to1]` onto `[from2, to2]`.
///
/// Values outside the source range are extrapolated. A degenerate source range
/// (`from1 == to1`) yields a non-finite result, callers that may hit it check first.
#[must_use]
pub fn remap(value: f64, from1: f64, to1: f64, from2: f64, to2: f64) -> f64 {
	(value - from1) / (to1 - from1) * (to2 - from2) + from2
}

/// Maps a source coordinate into a pixel index on an axis with `dimension` pixels.
///
/// `from` maps to pixel 0 and `to` maps to pixel `dimension - 1`. If the source range is
/// degenerate everything lands on pixel 0.
#[must_use]
pub fn coordinate_to_pixel(value: f64, from: f64, to: f64, dimension: u32) -> i64 {
	if from == to {
		return 0;
	}
	remap(value, from, to, 0.0, f64::from(dimension.saturating_sub(1))).round() as i64
}
