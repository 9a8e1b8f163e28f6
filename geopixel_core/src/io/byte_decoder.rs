//! Endianness-aware decoding of integers and IEEE doubles from byte buffers.
//!
//! Binary geometry blobs switch their byte order per header and per nested geometry, so the
//! order is a runtime value ([`Endian`]) instead of a type parameter. Two access styles are
//! provided:
//!
//! - free functions ([`decode_uint`], [`decode_f64`]) that read at an absolute offset,
//! - a [`ByteCursor`] that keeps track of the read position.
//!
//! # Examples
//!
//! ```rust
//! use geopixel_core::io::{ByteCursor, ByteWidth, Endian, decode_uint};
//!
//! let data = [0x01, 0x00, 0x00, 0x00, 0x02];
//! assert_eq!(decode_uint(&data, 0, ByteWidth::Four, Endian::Little).unwrap(), 1);
//!
//! let mut cursor = ByteCursor::new(&data);
//! cursor.skip(1).unwrap();
//! assert_eq!(cursor.read_u32(Endian::Big).unwrap(), 2);
//! ```

use anyhow::{Result, bail, ensure};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fmt::Debug;

/// Byte order of a value inside a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
	Big,
	Little,
}

impl Endian {
	/// WKB and GeoPackage headers store a flag that is non-zero for little endian.
	#[must_use]
	pub fn from_flag(little_endian: bool) -> Endian {
		if little_endian { Endian::Little } else { Endian::Big }
	}
}

/// Width of a fixed size number. Only 4 and 8 byte numbers occur in the decoded formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteWidth {
	Four,
	Eight,
}

impl ByteWidth {
	#[must_use]
	pub fn byte_count(self) -> usize {
		match self {
			ByteWidth::Four => 4,
			ByteWidth::Eight => 8,
		}
	}
}

impl TryFrom<usize> for ByteWidth {
	type Error = anyhow::Error;

	fn try_from(value: usize) -> Result<Self> {
		match value {
			4 => Ok(ByteWidth::Four),
			8 => Ok(ByteWidth::Eight),
			_ => bail!("unsupported number width of {value} bytes, only 4 and 8 are supported"),
		}
	}
}

fn slice_at(buffer: &[u8], offset: usize, width: usize) -> Result<&[u8]> {
	let end = offset.checked_add(width).unwrap_or(usize::MAX);
	ensure!(
		end <= buffer.len(),
		"reading {width} bytes at offset {offset} exceeds buffer of {} bytes",
		buffer.len()
	);
	Ok(&buffer[offset..end])
}

/// Decodes an unsigned integer of the given width at `offset`.
pub fn decode_uint(buffer: &[u8], offset: usize, width: ByteWidth, endian: Endian) -> Result<u64> {
	let bytes = slice_at(buffer, offset, width.byte_count())?;
	Ok(match (width, endian) {
		(ByteWidth::Four, Endian::Little) => u64::from(LittleEndian::read_u32(bytes)),
		(ByteWidth::Four, Endian::Big) => u64::from(BigEndian::read_u32(bytes)),
		(ByteWidth::Eight, Endian::Little) => LittleEndian::read_u64(bytes),
		(ByteWidth::Eight, Endian::Big) => BigEndian::read_u64(bytes),
	})
}

/// Decodes an IEEE 754 double at `offset`.
pub fn decode_f64(buffer: &[u8], offset: usize, endian: Endian) -> Result<f64> {
	let bytes = slice_at(buffer, offset, 8)?;
	Ok(match endian {
		Endian::Little => LittleEndian::read_f64(bytes),
		Endian::Big => BigEndian::read_f64(bytes),
	})
}

/// A read position inside a borrowed byte buffer.
pub struct ByteCursor<'a> {
	buffer: &'a [u8],
	position: usize,
}

impl<'a> ByteCursor<'a> {
	#[must_use]
	pub fn new(buffer: &'a [u8]) -> ByteCursor<'a> {
		ByteCursor { buffer, position: 0 }
	}

	#[must_use]
	pub fn position(&self) -> usize {
		self.position
	}

	pub fn set_position(&mut self, position: usize) -> Result<()> {
		ensure!(
			position <= self.buffer.len(),
			"position {position} is beyond the end of the buffer ({} bytes)",
			self.buffer.len()
		);
		self.position = position;
		Ok(())
	}

	#[must_use]
	pub fn remaining(&self) -> usize {
		self.buffer.len() - self.position
	}

	pub fn skip(&mut self, count: usize) -> Result<()> {
		self.set_position(self.position.saturating_add(count))
	}

	pub fn read_u8(&mut self) -> Result<u8> {
		let byte = slice_at(self.buffer, self.position, 1)?[0];
		self.position += 1;
		Ok(byte)
	}

	pub fn read_u32(&mut self, endian: Endian) -> Result<u32> {
		let value = decode_uint(self.buffer, self.position, ByteWidth::Four, endian)?;
		self.position += 4;
		Ok(value as u32)
	}

	pub fn read_f64(&mut self, endian: Endian) -> Result<f64> {
		let value = decode_f64(self.buffer, self.position, endian)?;
		self.position += 8;
		Ok(value)
	}
}

impl Debug for ByteCursor<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ByteCursor")
			.field("len", &self.buffer.len())
			.field("position", &self.position)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(ByteWidth::Four, Endian::Little, 0x0403_0201)]
	#[case(ByteWidth::Four, Endian::Big, 0x0102_0304)]
	#[case(ByteWidth::Eight, Endian::Little, 0x0807_0605_0403_0201)]
	#[case(ByteWidth::Eight, Endian::Big, 0x0102_0304_0506_0708)]
	fn decode_uint_respects_width_and_order(#[case] width: ByteWidth, #[case] endian: Endian, #[case] expected: u64) {
		let data = [1, 2, 3, 4, 5, 6, 7, 8];
		assert_eq!(decode_uint(&data, 0, width, endian).unwrap(), expected);
	}

	#[test]
	fn decode_uint_at_offset() {
		let data = [0xFF, 0x2A, 0, 0, 0];
		assert_eq!(decode_uint(&data, 1, ByteWidth::Four, Endian::Little).unwrap(), 42);
	}

	#[test]
	fn decode_f64_both_orders() {
		let value = -123.456_f64;
		let mut le = [0u8; 9];
		LittleEndian::write_f64(&mut le[1..], value);
		let mut be = [0u8; 8];
		BigEndian::write_f64(&mut be, value);

		assert_eq!(decode_f64(&le, 1, Endian::Little).unwrap(), value);
		assert_eq!(decode_f64(&be, 0, Endian::Big).unwrap(), value);
	}

	#[test]
	fn reading_past_the_end_fails() {
		let data = [1, 2, 3];
		assert!(decode_uint(&data, 0, ByteWidth::Four, Endian::Little).is_err());
		assert!(decode_f64(&data, 0, Endian::Big).is_err());
		assert!(decode_uint(&data, usize::MAX, ByteWidth::Four, Endian::Big).is_err());
	}

	#[rstest]
	#[case(4, Some(ByteWidth::Four))]
	#[case(8, Some(ByteWidth::Eight))]
	#[case(2, None)]
	#[case(16, None)]
	fn byte_width_from_usize(#[case] raw: usize, #[case] expected: Option<ByteWidth>) {
		assert_eq!(ByteWidth::try_from(raw).ok(), expected);
	}

	#[test]
	fn cursor_reads_sequentially() {
		let mut data = vec![1u8];
		data.extend_from_slice(&7u32.to_be_bytes());
		data.extend_from_slice(&2.5f64.to_le_bytes());

		let mut cursor = ByteCursor::new(&data);
		assert_eq!(cursor.read_u8().unwrap(), 1);
		assert_eq!(cursor.read_u32(Endian::Big).unwrap(), 7);
		assert_eq!(cursor.read_f64(Endian::Little).unwrap(), 2.5);
		assert_eq!(cursor.remaining(), 0);
		assert!(cursor.read_u8().is_err());
	}

	#[test]
	fn cursor_skip_and_set_position() {
		let data = [0u8; 10];
		let mut cursor = ByteCursor::new(&data);
		cursor.skip(4).unwrap();
		assert_eq!(cursor.position(), 4);
		assert!(cursor.skip(7).is_err());
		cursor.set_position(10).unwrap();
		assert_eq!(cursor.remaining(), 0);
		assert!(cursor.set_position(11).is_err());
	}
}
