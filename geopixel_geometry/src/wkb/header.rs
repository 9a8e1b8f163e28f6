use anyhow::{Result, bail, ensure};
use geopixel_core::{
	Boundaries,
	io::{ByteCursor, Endian},
};

const FLAG_EMPTY: u8 = 0b1_0000;
const FLAG_ENVELOPE: u8 = 0b1110;
const FLAG_LITTLE_ENDIAN: u8 = 0b1;

/// Size of the envelope stored in a GeoPackage header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeKind {
	None,
	/// minX, maxX, minY, maxY
	Xy,
	/// plus minZ, maxZ
	Xyz,
	/// plus minM, maxM
	Xym,
	/// plus minZ, maxZ, minM, maxM
	Xyzm,
}

impl EnvelopeKind {
	pub fn from_flags(flags: u8) -> Result<EnvelopeKind> {
		Ok(match flags & FLAG_ENVELOPE {
			0b0000 => EnvelopeKind::None,
			0b0010 => EnvelopeKind::Xy,
			0b0100 => EnvelopeKind::Xyz,
			0b0110 => EnvelopeKind::Xym,
			0b1000 => EnvelopeKind::Xyzm,
			code => bail!("invalid envelope code {} in GeoPackage header", code >> 1),
		})
	}

	#[must_use]
	pub fn byte_count(&self) -> usize {
		match self {
			EnvelopeKind::None => 0,
			EnvelopeKind::Xy => 32,
			EnvelopeKind::Xyz | EnvelopeKind::Xym => 48,
			EnvelopeKind::Xyzm => 64,
		}
	}
}

/// The fixed part of a GeoPackage geometry blob in front of the WKB payload.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoPackageHeader {
	pub version: u8,
	pub empty: bool,
	pub endian: Endian,
	pub envelope_kind: EnvelopeKind,
	pub srs_id: u32,
	/// The x/y part of the envelope, if the header carries one.
	pub envelope: Option<Boundaries>,
	/// Offset of the WKB geometry inside the blob.
	pub wkb_offset: usize,
}

impl GeoPackageHeader {
	pub fn parse(blob: &[u8]) -> Result<GeoPackageHeader> {
		ensure!(
			blob.len() >= 8,
			"geometry blob is too short for a GeoPackage header ({} bytes)",
			blob.len()
		);
		ensure!(
			blob[0] == b'G' && blob[1] == b'P',
			"invalid GeoPackage geometry magic bytes 0x{:02x}{:02x}",
			blob[0],
			blob[1]
		);

		let mut cursor = ByteCursor::new(blob);
		cursor.skip(2)?;
		let version = cursor.read_u8()?;
		let flags = cursor.read_u8()?;
		let endian = Endian::from_flag(flags & FLAG_LITTLE_ENDIAN != 0);
		let empty = flags & FLAG_EMPTY != 0;
		// empty geometries are skipped before their envelope code is looked at
		let envelope_kind = if empty {
			EnvelopeKind::from_flags(flags).unwrap_or(EnvelopeKind::None)
		} else {
			EnvelopeKind::from_flags(flags)?
		};
		let srs_id = cursor.read_u32(endian)?;

		let envelope = if empty || envelope_kind == EnvelopeKind::None {
			None
		} else {
			let min_x = cursor.read_f64(endian)?;
			let max_x = cursor.read_f64(endian)?;
			let min_y = cursor.read_f64(endian)?;
			let max_y = cursor.read_f64(endian)?;
			Some(Boundaries {
				min_x,
				max_x,
				min_y,
				max_y,
			})
		};

		Ok(GeoPackageHeader {
			version,
			empty,
			endian,
			envelope_kind,
			srs_id,
			envelope,
			wkb_offset: 8 + envelope_kind.byte_count(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn header(flags: u8, envelope: &[f64]) -> Vec<u8> {
		let little = flags & 1 == 1;
		let mut blob = vec![b'G', b'P', 0, flags];
		let srs: u32 = 4326;
		blob.extend(if little { srs.to_le_bytes() } else { srs.to_be_bytes() });
		for v in envelope {
			blob.extend(if little { v.to_le_bytes() } else { v.to_be_bytes() });
		}
		blob
	}

	#[rstest]
	#[case(0b0000, EnvelopeKind::None, 0)]
	#[case(0b0010, EnvelopeKind::Xy, 32)]
	#[case(0b0100, EnvelopeKind::Xyz, 48)]
	#[case(0b0110, EnvelopeKind::Xym, 48)]
	#[case(0b1000, EnvelopeKind::Xyzm, 64)]
	fn envelope_codes(#[case] flags: u8, #[case] kind: EnvelopeKind, #[case] size: usize) {
		assert_eq!(EnvelopeKind::from_flags(flags | 0b1_0001).unwrap(), kind);
		assert_eq!(kind.byte_count(), size);
	}

	#[rstest]
	#[case(0b1010)]
	#[case(0b1100)]
	#[case(0b1110)]
	fn invalid_envelope_codes(#[case] flags: u8) {
		assert!(EnvelopeKind::from_flags(flags).is_err());
	}

	#[rstest]
	#[case(0b0000_0011)]
	#[case(0b0000_0010)]
	fn parse_with_envelope(#[case] flags: u8) {
		let blob = header(flags, &[1.0, 2.0, 3.0, 4.0]);
		let header = GeoPackageHeader::parse(&blob).unwrap();
		assert_eq!(header.srs_id, 4326);
		assert!(!header.empty);
		assert_eq!(header.wkb_offset, 40);
		assert_eq!(header.envelope.unwrap().as_array(), [1.0, 2.0, 3.0, 4.0]);
	}

	#[test]
	fn parse_empty_flag() {
		let header = GeoPackageHeader::parse(&header(0b1_0001, &[])).unwrap();
		assert!(header.empty);
		assert_eq!(header.envelope, None);
		assert_eq!(header.wkb_offset, 8);
	}

	#[test]
	fn empty_flag_wins_over_invalid_envelope_code() {
		let header = GeoPackageHeader::parse(&header(0b1_1111, &[])).unwrap();
		assert!(header.empty);
		assert_eq!(header.envelope_kind, EnvelopeKind::None);
	}

	#[test]
	fn wrong_magic() {
		let mut blob = header(1, &[]);
		blob[1] = b'X';
		let error = GeoPackageHeader::parse(&blob).unwrap_err();
		assert_eq!(error.to_string(), "invalid GeoPackage geometry magic bytes 0x4758");
	}

	#[test]
	fn truncated() {
		assert!(GeoPackageHeader::parse(b"GP\0").is_err());
		assert!(GeoPackageHeader::parse(&header(0b0011, &[1.0])).is_err());
	}
}
