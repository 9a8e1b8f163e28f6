use super::{GeoPackageHeader, read_wkb};
use crate::{Geometry, Shape};
use anyhow::{Context, Result};
use geopixel_core::{Boundaries, BoundaryAccumulator};

/// A decoded GeoPackage geometry blob.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureBlob {
	pub header: GeoPackageHeader,
	/// Empty for blobs flagged as empty geometry, several for geometry collections.
	pub geometries: Vec<Geometry>,
}

impl FeatureBlob {
	pub fn parse(blob: &[u8]) -> Result<FeatureBlob> {
		let header = GeoPackageHeader::parse(blob)?;
		let geometries = if header.empty {
			Vec::new()
		} else {
			let wkb = blob.get(header.wkb_offset..).unwrap_or_default();
			read_wkb(wkb)?
		};
		Ok(FeatureBlob { header, geometries })
	}

	/// The header envelope, or the bounds of the decoded geometries if there is none.
	#[must_use]
	pub fn bounds(&self) -> Boundaries {
		if let Some(envelope) = self.header.envelope {
			return envelope;
		}
		let mut bounds = Boundaries::empty();
		for geometry in &self.geometries {
			bounds.include(&geometry.compute_bounds());
		}
		bounds
	}
}

/// Decodes the geometry blob of table row `row` and appends its shapes to `shapes`.
///
/// If `accumulator` is given, the row's bounds are folded into it. Returns the number of
/// shapes appended; empty geometries yield 0.
pub fn decode_feature_row(
	blob: &[u8],
	row: usize,
	accumulator: Option<&BoundaryAccumulator>,
	shapes: &mut Vec<Shape>,
) -> Result<usize> {
	let feature = FeatureBlob::parse(blob).with_context(|| format!("invalid geometry at row {row}"))?;
	if feature.header.empty {
		log::trace!("row {row} has an empty geometry");
		return Ok(0);
	}
	if let Some(accumulator) = accumulator {
		accumulator.fold(&feature.bounds())?;
	}
	let count = feature.geometries.len();
	shapes.extend(feature.geometries.into_iter().map(|g| Shape::new(g, row)));
	Ok(count)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::wkb::reader::tests::WkbWriter;

	fn gpkg_blob(flags: u8, envelope: &[f64], wkb: &[u8]) -> Vec<u8> {
		let mut blob = vec![b'G', b'P', 0, flags];
		blob.extend(0u32.to_le_bytes());
		for v in envelope {
			blob.extend(v.to_le_bytes());
		}
		blob.extend(wkb);
		blob
	}

	fn point_wkb(x: f64, y: f64) -> Vec<u8> {
		let mut writer = WkbWriter::new(true);
		writer.point(1, &[x, y]);
		writer.buffer
	}

	#[test]
	fn envelope_is_folded() {
		let accumulator = BoundaryAccumulator::new();
		let mut shapes = Vec::new();
		let blob = gpkg_blob(0b0011, &[-1.0, 5.0, -2.0, 6.0], &point_wkb(1.0, 2.0));
		assert_eq!(decode_feature_row(&blob, 7, Some(&accumulator), &mut shapes).unwrap(), 1);
		assert_eq!(shapes, vec![Shape::new(Geometry::new_point([1.0, 2.0]), 7)]);
		assert_eq!(accumulator.finish().unwrap().as_array(), [-1.0, 5.0, -2.0, 6.0]);
	}

	#[test]
	fn missing_envelope_uses_geometry_bounds() {
		let accumulator = BoundaryAccumulator::new();
		let mut shapes = Vec::new();
		let blob = gpkg_blob(0b0001, &[], &point_wkb(3.0, 4.0));
		decode_feature_row(&blob, 0, Some(&accumulator), &mut shapes).unwrap();
		assert_eq!(accumulator.finish().unwrap().as_array(), [3.0, 3.0, 4.0, 4.0]);
	}

	#[test]
	fn empty_geometry_yields_nothing() {
		let accumulator = BoundaryAccumulator::new();
		let mut shapes = Vec::new();
		let blob = gpkg_blob(0b1_0011, &[], &[]);
		assert_eq!(decode_feature_row(&blob, 0, Some(&accumulator), &mut shapes).unwrap(), 0);
		assert!(shapes.is_empty());
		assert!(accumulator.finish().is_err());
	}

	#[test]
	fn collection_shares_row() {
		let mut writer = WkbWriter::new(true);
		writer.header(7).u32(2);
		writer.point(1, &[1.0, 1.0]);
		writer.point(1, &[2.0, 2.0]);
		let blob = gpkg_blob(0b0011, &[1.0, 2.0, 1.0, 2.0], &writer.buffer);

		let mut shapes = vec![Shape::without_properties(Geometry::new_point([0.0, 0.0]))];
		assert_eq!(decode_feature_row(&blob, 3, None, &mut shapes).unwrap(), 2);
		assert_eq!(shapes.len(), 3);
		assert!(shapes[1..].iter().all(|s| s.property_id == Some(3)));
	}

	#[test]
	fn bad_magic_names_row() {
		let mut blob = gpkg_blob(0b0011, &[0.0; 4], &point_wkb(1.0, 2.0));
		blob[0] = b'X';
		let error = decode_feature_row(&blob, 12, None, &mut Vec::new()).unwrap_err();
		assert_eq!(error.to_string(), "invalid geometry at row 12");
		assert!(format!("{error:#}").contains("magic bytes"));
	}

	#[test]
	fn invalid_envelope_code() {
		let blob = gpkg_blob(0b1010, &[], &point_wkb(1.0, 2.0));
		assert!(FeatureBlob::parse(&blob).is_err());
	}
}
