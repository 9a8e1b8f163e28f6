//! RGBA colors and their textual form `"r,g,b"` / `"r,g,b,a"`.

use anyhow::{Context, Result, ensure};
use std::{
	fmt::{Debug, Display},
	str::FromStr,
};

/// A color with four independent byte channels: red, green, blue, alpha.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 4]);

impl Color {
	pub const TRANSPARENT: Color = Color([0, 0, 0, 0]);
	pub const WHITE: Color = Color([255, 255, 255, 255]);
	pub const BLACK: Color = Color([0, 0, 0, 255]);

	#[must_use]
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Color {
		Color([r, g, b, a])
	}

	#[must_use]
	pub fn r(&self) -> u8 {
		self.0[0]
	}
	#[must_use]
	pub fn g(&self) -> u8 {
		self.0[1]
	}
	#[must_use]
	pub fn b(&self) -> u8 {
		self.0[2]
	}
	#[must_use]
	pub fn a(&self) -> u8 {
		self.0[3]
	}

	/// A pixel counts as empty only if all four channels are zero.
	#[must_use]
	pub fn is_transparent(&self) -> bool {
		self.0 == [0, 0, 0, 0]
	}
}

impl From<[u8; 4]> for Color {
	fn from(value: [u8; 4]) -> Self {
		Color(value)
	}
}

impl From<Color> for [u8; 4] {
	fn from(value: Color) -> Self {
		value.0
	}
}

impl FromStr for Color {
	type Err = anyhow::Error;

	/// Parses `"r,g,b"` or `"r,g,b,a"`; alpha defaults to 255.
	fn from_str(text: &str) -> Result<Self> {
		let parts = text.split(',').map(str::trim).collect::<Vec<_>>();
		ensure!(
			parts.len() == 3 || parts.len() == 4,
			"invalid color '{text}': expected 'r,g,b' or 'r,g,b,a'"
		);
		let mut channels = [255u8; 4];
		for (channel, part) in channels.iter_mut().zip(&parts) {
			*channel = part
				.parse::<u8>()
				.with_context(|| format!("invalid color '{text}': channel '{part}' is not a number between 0 and 255"))?;
		}
		Ok(Color(channels))
	}
}

impl Display for Color {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{},{},{},{}", self.0[0], self.0[1], self.0[2], self.0[3])
	}
}

impl Debug for Color {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Color({self})")
	}
}
