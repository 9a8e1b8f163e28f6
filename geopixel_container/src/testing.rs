//! Fixture writers shared by the tests of this crate and of downstream crates.
//!
//! Stripped TIFFs are written with `tiff::encoder`. The encoder cannot write tiles, so
//! tiled TIFFs are assembled byte by byte. GeoPackages are plain SQLite files with the two
//! metadata tables the reader looks at.

use anyhow::{Result, bail};
use r2d2_sqlite::rusqlite::{Connection, params_from_iter, types::Value};
use std::{fs::File, path::Path};
use tiff::encoder::{TiffEncoder, TiffValue, colortype::ColorType};

/// Writes a single-image TIFF with `rows_per_strip` rows in each strip.
pub fn write_stripped_tiff<C: ColorType>(
	path: &Path,
	width: u32,
	height: u32,
	rows_per_strip: u32,
	data: &[C::Inner],
) -> Result<()>
where
	[C::Inner]: TiffValue,
{
	let mut encoder = TiffEncoder::new(File::create(path)?)?;
	let mut image = encoder.new_image::<C>(width, height)?;
	image.rows_per_strip(rows_per_strip)?;
	image.write_data(data)?;
	Ok(())
}

fn push_sample(buffer: &mut Vec<u8>, value: f64, bits: u16, sample_format: u16) -> Result<()> {
	match (bits, sample_format) {
		(8, 2) => buffer.extend((value as i8).to_le_bytes()),
		(16, 2) => buffer.extend((value as i16).to_le_bytes()),
		(32, 2) => buffer.extend((value as i32).to_le_bytes()),
		(32, 3) => buffer.extend((value as f32).to_le_bytes()),
		(64, 3) => buffer.extend(value.to_le_bytes()),
		(8, _) => buffer.push(value as u8),
		(16, _) => buffer.extend((value as u16).to_le_bytes()),
		(32, _) => buffer.extend((value as u32).to_le_bytes()),
		_ => bail!("cannot write {bits} bit samples of format {sample_format}"),
	}
	Ok(())
}

fn push_entry(ifd: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: u32) {
	ifd.extend(tag.to_le_bytes());
	ifd.extend(field_type.to_le_bytes());
	ifd.extend(count.to_le_bytes());
	ifd.extend(value.to_le_bytes());
}

/// Writes an uncompressed, little endian, single-sample tiled TIFF. Cells outside the
/// image are zero padding.
pub fn write_tiled_tiff(
	path: &Path,
	width: u32,
	height: u32,
	tile_size: u32,
	bits: u16,
	sample_format: u16,
	cell: impl Fn(u32, u32) -> f64,
) -> Result<()> {
	const SHORT: u16 = 3;
	const LONG: u16 = 4;

	let mut data = vec![b'I', b'I', 42, 0, 0, 0, 0, 0];
	let mut offsets = Vec::new();
	let mut byte_counts = Vec::new();
	for tile_y in 0..height.div_ceil(tile_size) {
		for tile_x in 0..width.div_ceil(tile_size) {
			let start = data.len() as u32;
			for y in tile_y * tile_size..(tile_y + 1) * tile_size {
				for x in tile_x * tile_size..(tile_x + 1) * tile_size {
					let value = if x < width && y < height { cell(x, y) } else { 0.0 };
					push_sample(&mut data, value, bits, sample_format)?;
				}
			}
			if data.len() % 2 == 1 {
				data.push(0);
			}
			offsets.push(start);
			byte_counts.push(data.len() as u32 - start);
		}
	}

	// arrays with a single value are stored inline
	let mut store_array = |values: &[u32]| -> u32 {
		if let [single] = values {
			return *single;
		}
		let position = data.len() as u32;
		for value in values {
			data.extend(value.to_le_bytes());
		}
		position
	};
	let tile_count = offsets.len() as u32;
	let offsets_value = store_array(&offsets);
	let byte_counts_value = store_array(&byte_counts);

	let ifd_position = data.len() as u32;
	data[4..8].copy_from_slice(&ifd_position.to_le_bytes());

	let mut ifd = Vec::new();
	push_entry(&mut ifd, 256, LONG, 1, width);
	push_entry(&mut ifd, 257, LONG, 1, height);
	push_entry(&mut ifd, 258, SHORT, 1, u32::from(bits));
	push_entry(&mut ifd, 259, SHORT, 1, 1);
	push_entry(&mut ifd, 262, SHORT, 1, 1);
	push_entry(&mut ifd, 277, SHORT, 1, 1);
	push_entry(&mut ifd, 322, LONG, 1, tile_size);
	push_entry(&mut ifd, 323, LONG, 1, tile_size);
	push_entry(&mut ifd, 324, LONG, tile_count, offsets_value);
	push_entry(&mut ifd, 325, LONG, tile_count, byte_counts_value);
	push_entry(&mut ifd, 339, SHORT, 1, u32::from(sample_format));

	data.extend(((ifd.len() / 12) as u16).to_le_bytes());
	data.extend(ifd);
	data.extend(0u32.to_le_bytes());

	std::fs::write(path, data)?;
	Ok(())
}

/// A GeoPackage layer fixture: `columns` are the attribute columns, the geometry column
/// `geom` is inserted at `geometry_position`.
pub struct LayerFixture<'a> {
	pub name: &'a str,
	pub data_type: &'a str,
	pub columns: &'a [&'a str],
	pub geometry_position: usize,
	pub rows: Vec<(Vec<Value>, Option<Vec<u8>>)>,
}

/// Creates a GeoPackage containing the given layers.
pub fn write_geopackage(path: &Path, layers: &[LayerFixture]) -> Result<()> {
	let connection = Connection::open(path)?;
	connection.execute_batch(
		"CREATE TABLE gpkg_contents (table_name TEXT NOT NULL PRIMARY KEY, data_type TEXT NOT NULL, identifier TEXT);
		CREATE TABLE gpkg_geometry_columns (table_name TEXT NOT NULL, column_name TEXT NOT NULL, geometry_type_name TEXT NOT NULL);",
	)?;

	for layer in layers {
		connection.execute(
			"INSERT INTO gpkg_contents (table_name, data_type, identifier) VALUES (?1, ?2, ?3)",
			[layer.name, layer.data_type, format!("{} layer", layer.name).as_str()],
		)?;
		if layer.data_type != "features" {
			continue;
		}
		connection.execute(
			"INSERT INTO gpkg_geometry_columns (table_name, column_name, geometry_type_name) VALUES (?1, 'geom', 'GEOMETRY')",
			[layer.name],
		)?;

		let mut definitions: Vec<String> = layer.columns.iter().map(|c| format!("\"{c}\"")).collect();
		definitions.insert(layer.geometry_position, String::from("geom BLOB"));
		connection.execute(&format!("CREATE TABLE \"{}\" ({})", layer.name, definitions.join(", ")), [])?;

		let placeholders = vec!["?"; definitions.len()].join(", ");
		let sql = format!("INSERT INTO \"{}\" VALUES ({placeholders})", layer.name);
		for (attributes, blob) in &layer.rows {
			let mut values = attributes.clone();
			values.insert(layer.geometry_position, blob.clone().map_or(Value::Null, Value::Blob));
			connection.execute(&sql, params_from_iter(values))?;
		}
	}
	Ok(())
}

/// Little endian WKB of a point.
pub fn wkb_point(x: f64, y: f64) -> Vec<u8> {
	let mut wkb = vec![1];
	wkb.extend(1u32.to_le_bytes());
	wkb.extend(x.to_le_bytes());
	wkb.extend(y.to_le_bytes());
	wkb
}

/// Little endian WKB of a polygon.
pub fn wkb_polygon(rings: &[&[[f64; 2]]]) -> Vec<u8> {
	let mut wkb = vec![1];
	wkb.extend(3u32.to_le_bytes());
	wkb.extend((rings.len() as u32).to_le_bytes());
	for ring in rings {
		wkb.extend((ring.len() as u32).to_le_bytes());
		for [x, y] in *ring {
			wkb.extend(x.to_le_bytes());
			wkb.extend(y.to_le_bytes());
		}
	}
	wkb
}

/// Wraps WKB into a GeoPackage geometry blob with an optional XY envelope.
pub fn gpkg_blob(wkb: &[u8], envelope: Option<[f64; 4]>) -> Vec<u8> {
	let flags = if envelope.is_some() { 0b0000_0011 } else { 0b0000_0001 };
	let mut blob = vec![b'G', b'P', 0, flags];
	blob.extend(4326u32.to_le_bytes());
	for value in envelope.iter().flatten() {
		blob.extend(value.to_le_bytes());
	}
	blob.extend(wkb);
	blob
}
