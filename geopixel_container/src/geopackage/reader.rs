use super::{FeatureRow, LayerInfo, LayerKind, LayerShapes, StyledShape};
use anyhow::{Result, anyhow, bail, ensure};
use geopixel_core::{
	BoundaryAccumulator, Color,
	progress::{ProgressSink, SliceProgress},
	run_partitioned,
};
use geopixel_derive::context;
use geopixel_geometry::{Geometry, wkb::decode_feature_row};
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OpenFlags, OptionalExtension, types::ValueRef},
};
use std::path::{Path, PathBuf};

/// Reader for the feature layers of a GeoPackage (SQLite) file.
pub struct GeoPackageReader {
	path: PathBuf,
	pool: Pool<SqliteConnectionManager>,
}

/// A table row split into its attribute cells and its geometry blob.
struct RawRow {
	values: Vec<String>,
	blob: Option<Vec<u8>>,
}

fn quote_identifier(name: &str) -> String {
	format!("\"{}\"", name.replace('"', "\"\""))
}

/// Attribute cells as text: numbers in their natural form, NULL and blobs as "".
fn cell_to_string(value: ValueRef) -> String {
	match value {
		ValueRef::Null | ValueRef::Blob(_) => String::new(),
		ValueRef::Integer(v) => v.to_string(),
		ValueRef::Real(v) => v.to_string(),
		ValueRef::Text(v) => String::from_utf8_lossy(v).into_owned(),
	}
}

impl GeoPackageReader {
	#[context("failed to open GeoPackage {path:?}")]
	pub fn open(path: &Path) -> Result<GeoPackageReader> {
		log::debug!("open GeoPackage {path:?}");
		ensure!(path.exists(), "file {path:?} does not exist");

		let manager = SqliteConnectionManager::file(path).with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY);
		let pool = Pool::builder().max_size(4).build(manager)?;
		Ok(GeoPackageReader {
			path: path.to_path_buf(),
			pool,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// All entries of `gpkg_contents`, ordered by table name.
	#[context("failed to list the layers of {:?}", self.path)]
	pub fn layers(&self) -> Result<Vec<LayerInfo>> {
		let connection = self.pool.get()?;
		let mut statement =
			connection.prepare("SELECT table_name, data_type, identifier FROM gpkg_contents ORDER BY table_name")?;
		let layers = statement
			.query_map([], |row| {
				Ok(LayerInfo {
					name: row.get(0)?,
					kind: LayerKind::from_data_type(&row.get::<_, String>(1)?),
					identifier: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
				})
			})?
			.collect::<Result<Vec<_>, _>>()?;
		Ok(layers)
	}

	/// Names of the layers that contain features.
	pub fn feature_layers(&self) -> Result<Vec<String>> {
		Ok(self
			.layers()?
			.into_iter()
			.filter(|layer| layer.kind == LayerKind::Features)
			.map(|layer| layer.name)
			.collect())
	}

	/// Column names of `layer` and the position of its geometry column.
	fn layer_columns(&self, layer: &str) -> Result<(Vec<String>, usize)> {
		let connection = self.pool.get()?;
		let geometry_column: String = connection
			.query_row(
				"SELECT column_name FROM gpkg_geometry_columns WHERE table_name = ?1",
				[layer],
				|row| row.get(0),
			)
			.optional()?
			.ok_or_else(|| anyhow!("layer '{layer}' has no geometry column"))?;

		let mut statement = connection.prepare("SELECT name FROM pragma_table_info(?1)")?;
		let columns = statement
			.query_map([layer], |row| row.get::<_, String>(0))?
			.collect::<Result<Vec<_>, _>>()?;
		let position = columns
			.iter()
			.position(|c| *c == geometry_column)
			.ok_or_else(|| anyhow!("invalid GeoPackage file: column '{geometry_column}' is missing in layer '{layer}'"))?;
		Ok((columns, position))
	}

	/// Reads every row of `layer` once, separating the geometry blob from the attributes.
	fn read_rows(&self, layer: &str, column_count: usize, geometry_position: usize) -> Result<Vec<RawRow>> {
		let connection = self.pool.get()?;
		let table = quote_identifier(layer);
		let count: i64 = connection.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
		let count = usize::try_from(count)?;
		log::debug!("layer '{layer}' has {count} rows");
		if count == 0 {
			return Ok(Vec::new());
		}

		let mut statement = connection.prepare(&format!("SELECT * FROM {table}"))?;
		let mut rows = statement.query([])?;
		let mut result = Vec::with_capacity(count);
		while let Some(row) = rows.next()? {
			let mut values = Vec::with_capacity(column_count - 1);
			let mut blob = None;
			for column in 0..column_count {
				let value = row.get_ref(column)?;
				if column == geometry_position {
					blob = match value {
						ValueRef::Blob(bytes) => Some(bytes.to_vec()),
						ValueRef::Null => None,
						_ => bail!("geometry at row {} is not a blob", result.len()),
					};
				} else {
					values.push(cell_to_string(value));
				}
			}
			result.push(RawRow { values, blob });
		}
		Ok(result)
	}

	/// Decodes all shapes of `layer` on `threads` workers and colors them with `styler`.
	///
	/// Shapes are returned in row order; the `property_id` of every shape is its row index.
	/// If `accumulator` is given, the bounds of every row are folded into it. Rows with an
	/// empty or NULL geometry yield no shapes. A malformed geometry fails the whole layer.
	#[context("failed to read layer '{layer}'")]
	pub fn read_layer<S>(
		&self,
		layer: &str,
		accumulator: Option<&BoundaryAccumulator>,
		threads: usize,
		progress: &dyn ProgressSink,
		styler: S,
	) -> Result<LayerShapes>
	where
		S: Fn(&FeatureRow, &Geometry) -> Result<Color> + Sync,
	{
		ensure!(
			self.layers()?.iter().any(|l| l.name == layer),
			"unknown layer '{layer}' in {:?}",
			self.path
		);

		let (mut columns, geometry_position) = self.layer_columns(layer)?;
		let rows = self.read_rows(layer, columns.len(), geometry_position)?;
		columns.remove(geometry_position);

		let slices = run_partitioned(0..rows.len(), threads, |slice, range| {
			let slice_progress = SliceProgress::new(progress, slice);
			let total = range.len();
			let mut shapes = Vec::new();
			let mut decoded = Vec::new();

			for (done, index) in range.enumerate() {
				let row = &rows[index];
				if let Some(blob) = &row.blob {
					decoded.clear();
					decode_feature_row(blob, index, accumulator, &mut decoded)?;
					let feature = FeatureRow {
						layer,
						index,
						columns: &columns,
						values: &row.values,
					};
					for shape in decoded.drain(..) {
						let color = styler(&feature, &shape.geometry)?;
						shapes.push(StyledShape { shape, color });
					}
				} else {
					log::trace!("row {index} of layer '{layer}' has no geometry");
				}
				slice_progress.update(done + 1, total);
			}
			Ok(shapes)
		})?;

		let shapes: Vec<StyledShape> = slices.into_iter().flatten().collect();
		log::debug!("layer '{layer}': {} shapes from {} rows", shapes.len(), rows.len());
		Ok(LayerShapes {
			name: layer.to_string(),
			row_count: rows.len(),
			shapes,
		})
	}
}

impl std::fmt::Debug for GeoPackageReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GeoPackageReader").field("path", &self.path).finish()
	}
}
