use anyhow::{Result, anyhow, ensure};
use geopixel_core::{Color, remap};

/// Colors keyed by numeric thresholds, sorted ascending by key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorTable {
	entries: Vec<(f64, Color)>,
}

impl ColorTable {
	/// Builds a table from unordered entries. Keys must be finite and unique.
	pub fn new(entries: impl IntoIterator<Item = (f64, Color)>) -> Result<ColorTable> {
		let mut entries = entries.into_iter().collect::<Vec<_>>();
		for (key, _) in &entries {
			ensure!(key.is_finite(), "color table key {key} is not a finite number");
		}
		entries.sort_by(|a, b| a.0.total_cmp(&b.0));
		for pair in entries.windows(2) {
			ensure!(pair[0].0 != pair[1].0, "color table contains the key {} twice", pair[0].0);
		}
		Ok(ColorTable { entries })
	}

	pub fn entries(&self) -> &[(f64, Color)] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The color of exactly `value`; a value without an entry is an error.
	pub fn exact(&self, value: f64) -> Result<Color> {
		self
			.entries
			.binary_search_by(|(key, _)| key.total_cmp(&value))
			.map(|index| self.entries[index].1)
			.map_err(|_| anyhow!("value {value} has no entry in the color table"))
	}

	/// The color of the range `value` falls into.
	///
	/// The entry with the smallest key `>= value` is chosen; values above the last key are
	/// transparent. With `gradient`, values between two keys blend the colors of both
	/// entries channel by channel.
	pub fn range(&self, value: f64, gradient: bool) -> Color {
		let index = self.entries.partition_point(|(key, _)| *key < value);
		let Some(&(key, color)) = self.entries.get(index) else {
			return Color::TRANSPARENT;
		};
		if !gradient || key == value || index == 0 {
			return color;
		}
		let (previous_key, previous_color) = self.entries[index - 1];
		Color(std::array::from_fn(|channel| {
			remap(
				value,
				previous_key,
				key,
				f64::from(previous_color.0[channel]),
				f64::from(color.0[channel]),
			)
			.round()
			.clamp(0.0, 255.0) as u8
		}))
	}
}
