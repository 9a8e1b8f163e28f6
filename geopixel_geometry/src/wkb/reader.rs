use crate::{
	Coordinates, Geometry, LineStringGeometry, MultiLineStringGeometry, MultiPointGeometry, MultiPolygonGeometry,
	PointGeometry, PolygonGeometry, RingGeometry,
};
use anyhow::{Context, Result, bail, ensure};
use geopixel_core::io::{ByteCursor, Endian};

/// Base kind of a WKB geometry type code (the code modulo 1000).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WkbKind {
	Point,
	LineString,
	Polygon,
	MultiPoint,
	MultiLineString,
	MultiPolygon,
	GeometryCollection,
}

/// A decoded WKB type code: base kind plus the number of ordinates per position
/// (2 for XY, 3 for XYZ and XYM, 4 for XYZM).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WkbType {
	pub kind: WkbKind,
	pub ordinates: usize,
}

impl WkbType {
	/// Accepts the codes 1–7 with the ISO offsets 1000 (Z), 2000 (M) and 3000 (ZM).
	pub fn from_code(code: u32) -> Result<WkbType> {
		let kind = match code % 1000 {
			1 => WkbKind::Point,
			2 => WkbKind::LineString,
			3 => WkbKind::Polygon,
			4 => WkbKind::MultiPoint,
			5 => WkbKind::MultiLineString,
			6 => WkbKind::MultiPolygon,
			7 => WkbKind::GeometryCollection,
			_ => bail!("unknown WKB geometry type {code}"),
		};
		let ordinates = match code / 1000 {
			0 => 2,
			1 | 2 => 3,
			3 => 4,
			_ => bail!("unknown WKB geometry type {code}"),
		};
		Ok(WkbType { kind, ordinates })
	}

	/// Bytes per stored position.
	#[must_use]
	pub fn stride(&self) -> usize {
		self.ordinates * 8
	}
}

struct WkbReader<'a, 'b> {
	cursor: &'b mut ByteCursor<'a>,
	endian: Endian,
	wkb_type: WkbType,
}

impl WkbReader<'_, '_> {
	fn read_count(&mut self) -> Result<usize> {
		let count = self.cursor.read_u32(self.endian)? as usize;
		// every element needs at least one position or count
		ensure!(
			count <= self.cursor.remaining() / 4,
			"WKB element count {count} exceeds the remaining {} bytes",
			self.cursor.remaining()
		);
		Ok(count)
	}

	fn read_position(&mut self) -> Result<Coordinates> {
		let x = self.cursor.read_f64(self.endian)?;
		let y = self.cursor.read_f64(self.endian)?;
		self.cursor.skip(self.wkb_type.stride() - 16)?;
		Ok(Coordinates::new(x, y))
	}

	fn read_positions(&mut self) -> Result<Vec<Coordinates>> {
		let count = self.read_count()?;
		(0..count).map(|_| self.read_position()).collect()
	}

	fn read_rings(&mut self) -> Result<Vec<RingGeometry>> {
		let count = self.read_count()?;
		(0..count).map(|_| Ok(RingGeometry(self.read_positions()?))).collect()
	}

	fn read_members(&mut self, expected: WkbKind) -> Result<Vec<Geometry>> {
		let count = self.read_count()?;
		let mut members = Vec::with_capacity(count);
		for index in 0..count {
			let (member_type, mut geometries) =
				read_geometry(self.cursor).with_context(|| format!("failed to read member {index}"))?;
			ensure!(
				member_type.kind == expected,
				"member {index} is a {:?}, expected {expected:?}",
				member_type.kind
			);
			members.append(&mut geometries);
		}
		Ok(members)
	}
}

/// Reads one WKB geometry at the cursor position.
///
/// Returns the type code of the geometry and the decoded geometries: one for simple and
/// multi types, one per member (recursively flattened) for geometry collections.
pub fn read_geometry(cursor: &mut ByteCursor) -> Result<(WkbType, Vec<Geometry>)> {
	let endian = Endian::from_flag(cursor.read_u8()? != 0);
	let code = cursor.read_u32(endian)?;
	let wkb_type = WkbType::from_code(code)?;
	let mut reader = WkbReader {
		cursor,
		endian,
		wkb_type,
	};

	let geometry = match wkb_type.kind {
		WkbKind::Point => Geometry::Point(PointGeometry(reader.read_position()?)),
		WkbKind::LineString => Geometry::LineString(LineStringGeometry(reader.read_positions()?)),
		WkbKind::Polygon => Geometry::Polygon(PolygonGeometry(reader.read_rings()?)),
		WkbKind::MultiPoint => {
			let points = reader.read_members(WkbKind::Point)?;
			Geometry::MultiPoint(MultiPointGeometry(
				points
					.into_iter()
					.filter_map(|g| match g {
						Geometry::Point(p) => Some(p),
						_ => None,
					})
					.collect(),
			))
		}
		WkbKind::MultiLineString => {
			let lines = reader.read_members(WkbKind::LineString)?;
			Geometry::MultiLineString(MultiLineStringGeometry(
				lines
					.into_iter()
					.filter_map(|g| match g {
						Geometry::LineString(l) => Some(l),
						_ => None,
					})
					.collect(),
			))
		}
		WkbKind::MultiPolygon => {
			let polygons = reader.read_members(WkbKind::Polygon)?;
			Geometry::MultiPolygon(MultiPolygonGeometry(
				polygons
					.into_iter()
					.filter_map(|g| match g {
						Geometry::Polygon(p) => Some(p),
						_ => None,
					})
					.collect(),
			))
		}
		WkbKind::GeometryCollection => {
			let count = reader.read_count()?;
			let mut geometries = Vec::with_capacity(count);
			for index in 0..count {
				let (_, mut members) = read_geometry(reader.cursor)
					.with_context(|| format!("failed to read collection member {index}"))?;
				geometries.append(&mut members);
			}
			return Ok((wkb_type, geometries));
		}
	};
	Ok((wkb_type, vec![geometry]))
}

/// Decodes a complete WKB buffer.
pub fn read_wkb(buffer: &[u8]) -> Result<Vec<Geometry>> {
	let mut cursor = ByteCursor::new(buffer);
	Ok(read_geometry(&mut cursor)?.1)
}
