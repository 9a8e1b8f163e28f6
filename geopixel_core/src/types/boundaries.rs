use anyhow::{Result, anyhow, ensure};
use std::{
	fmt::{Debug, Display},
	sync::Mutex,
};

/// An axis aligned box in source coordinate space.
///
/// Bounds are inclusive on all sides. While data is being folded in, a box may be
/// [`Boundaries::empty`] (min above max); [`Boundaries::is_valid`] tells whether at least one
/// coordinate has been added.
///
/// ```
/// use geopixel_core::Boundaries;
///
/// let mut bounds = Boundaries::empty();
/// bounds.include_point(3.0, -1.0);
/// bounds.include_point(-2.0, 4.0);
/// assert_eq!(bounds, Boundaries::new(-2.0, 3.0, -1.0, 4.0).unwrap());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Boundaries {
	pub min_x: f64,
	pub max_x: f64,
	pub min_y: f64,
	pub max_y: f64,
}

impl Boundaries {
	/// Creates finalized boundaries, requiring `min_x <= max_x` and `min_y <= max_y`.
	pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Boundaries> {
		let bounds = Boundaries {
			min_x,
			max_x,
			min_y,
			max_y,
		};
		ensure!(bounds.is_valid(), "invalid boundaries {bounds}: minimum exceeds maximum");
		Ok(bounds)
	}

	/// Neutral element of [`Boundaries::include`]: min is `+MAX`, max is `-MAX`.
	#[must_use]
	pub fn empty() -> Boundaries {
		Boundaries {
			min_x: f64::MAX,
			max_x: f64::MIN,
			min_y: f64::MAX,
			max_y: f64::MIN,
		}
	}

	#[must_use]
	pub fn is_valid(&self) -> bool {
		self.min_x <= self.max_x && self.min_y <= self.max_y
	}

	pub fn include_point(&mut self, x: f64, y: f64) {
		self.min_x = self.min_x.min(x);
		self.max_x = self.max_x.max(x);
		self.min_y = self.min_y.min(y);
		self.max_y = self.max_y.max(y);
	}

	pub fn include(&mut self, other: &Boundaries) {
		self.min_x = self.min_x.min(other.min_x);
		self.max_x = self.max_x.max(other.max_x);
		self.min_y = self.min_y.min(other.min_y);
		self.max_y = self.max_y.max(other.max_y);
	}

	#[must_use]
	pub fn contains_point(&self, x: f64, y: f64) -> bool {
		x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
	}

	/// True if `other` lies completely inside `self`.
	#[must_use]
	pub fn contains(&self, other: &Boundaries) -> bool {
		other.min_x >= self.min_x && other.max_x <= self.max_x && other.min_y >= self.min_y && other.max_y <= self.max_y
	}

	#[must_use]
	pub fn as_array(&self) -> [f64; 4] {
		[self.min_x, self.max_x, self.min_y, self.max_y]
	}
}

impl Default for Boundaries {
	fn default() -> Self {
		Boundaries::empty()
	}
}

impl TryFrom<[f64; 4]> for Boundaries {
	type Error = anyhow::Error;

	/// Order is `[min_x, max_x, min_y, max_y]`.
	fn try_from(value: [f64; 4]) -> Result<Self> {
		Boundaries::new(value[0], value[1], value[2], value[3])
	}
}

impl Debug for Boundaries {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Boundaries{self}")
	}
}

impl Display for Boundaries {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"[x: {} .. {}, y: {} .. {}]",
			self.min_x, self.max_x, self.min_y, self.max_y
		)
	}
}

/// Boundaries that many workers fold coordinates into concurrently.
#[derive(Default)]
pub struct BoundaryAccumulator {
	inner: Mutex<Boundaries>,
}

impl BoundaryAccumulator {
	#[must_use]
	pub fn new() -> BoundaryAccumulator {
		BoundaryAccumulator::default()
	}

	/// Starts from existing boundaries instead of the empty box.
	#[must_use]
	pub fn from_boundaries(bounds: Boundaries) -> BoundaryAccumulator {
		BoundaryAccumulator {
			inner: Mutex::new(bounds),
		}
	}

	pub fn fold(&self, bounds: &Boundaries) -> Result<()> {
		self
			.inner
			.lock()
			.map_err(|_| anyhow!("boundary accumulator lock is poisoned"))?
			.include(bounds);
		Ok(())
	}

	/// Returns the accumulated boundaries, failing if nothing was folded in.
	pub fn finish(self) -> Result<Boundaries> {
		let bounds = self
			.inner
			.into_inner()
			.map_err(|_| anyhow!("boundary accumulator lock is poisoned"))?;
		ensure!(bounds.is_valid(), "no coordinates found to compute boundaries from");
		Ok(bounds)
	}
}
