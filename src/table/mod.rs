//! Abstractions for Arrow tables with geometries and attributes.
//!
//! A [`GeoTable`] is the base container every frame type is built on. It stores a single Arrow
//! [`RecordBatch`] in which geometry columns are `geoarrow.wkb` binary columns, remembers which
//! of those columns is the active geometry, and carries the coordinate reference system.

use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch, RecordBatchOptions};
use arrow_schema::{Field, FieldRef, Schema, SchemaRef};
use geo::Geometry;
use indexmap::IndexMap;

use crate::array::{
    from_wkb_array, geometry_field, is_geometry_field, to_wkb_array, ArrayMetadata, Column,
};
use crate::crs::Crs;
use crate::error::{EcoError, Result};

/// Conventional name of the active geometry column.
pub const DEFAULT_GEOMETRY_COLUMN: &str = "geometry";

#[derive(Debug, Clone)]
pub struct GeoTable {
    batch: RecordBatch,
    geometry_column_index: Option<usize>,
    crs: Option<Crs>,
}

impl GeoTable {
    pub fn try_new(
        batch: RecordBatch,
        geometry_column_index: Option<usize>,
        crs: Option<Crs>,
    ) -> Result<Self> {
        if let Some(index) = geometry_column_index {
            let schema = batch.schema();
            let field = schema.fields().get(index).ok_or_else(|| {
                EcoError::ColumnNotFound(format!("column index {index} is out of bounds"))
            })?;
            if !is_geometry_field(field) {
                return Err(EcoError::IncorrectType(
                    format!("column '{}' does not hold geometries", field.name()).into(),
                ));
            }
        }
        Ok(Self {
            batch,
            geometry_column_index,
            crs,
        })
    }

    /// Build a table from an ordered mapping of column name to values.
    ///
    /// A geometry column named `geometry` becomes the active geometry. All columns must have the
    /// same length.
    pub fn from_columns(columns: IndexMap<String, Column>) -> Result<Self> {
        let num_rows = columns.values().next().map(Column::len).unwrap_or(0);
        let mut fields = Vec::with_capacity(columns.len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());

        for (name, column) in columns.iter() {
            if column.len() != num_rows {
                return Err(EcoError::General(format!(
                    "column '{name}' has {} values, expected {num_rows}",
                    column.len()
                )));
            }
            match column {
                Column::Values(array) => {
                    fields.push(Arc::new(Field::new(name, array.data_type().clone(), true)));
                    arrays.push(array.clone());
                }
                Column::Geometry(geometries) => {
                    fields.push(Arc::new(geometry_field(name, &ArrayMetadata::default())?));
                    arrays.push(Arc::new(to_wkb_array(geometries.iter().map(Option::as_ref))?));
                }
            }
        }

        let geometry_column_index = columns
            .get_full(DEFAULT_GEOMETRY_COLUMN)
            .filter(|(_, _, column)| column.is_geometry())
            .map(|(index, _, _)| index);

        let batch = build_batch(Arc::new(Schema::new(fields)), arrays, num_rows)?;
        Self::try_new(batch, geometry_column_index, None)
    }

    /// Rebuild a table from derived fields and arrays, re-resolving the active geometry by name.
    ///
    /// The active geometry is dropped when `geometry_column` is no longer among the fields.
    pub(crate) fn from_parts(
        fields: Vec<FieldRef>,
        arrays: Vec<ArrayRef>,
        num_rows: usize,
        geometry_column: Option<&str>,
        crs: Option<Crs>,
    ) -> Result<Self> {
        let geometry_column_index = geometry_column
            .and_then(|name| fields.iter().position(|field| field.name() == name));
        let batch = build_batch(Arc::new(Schema::new(fields)), arrays, num_rows)?;
        Self::try_new(batch, geometry_column_index, crs)
    }

    /// Export to a [RecordBatch], writing the CRS into the extension metadata of every geometry
    /// field.
    pub fn into_record_batch(self) -> Result<RecordBatch> {
        let metadata = ArrayMetadata::from_crs(self.crs.as_ref());
        let fields = self
            .batch
            .schema()
            .fields()
            .iter()
            .map(|field| {
                if is_geometry_field(field) {
                    Ok(Arc::new(geometry_field(field.name(), &metadata)?))
                } else {
                    Ok(field.clone())
                }
            })
            .collect::<Result<Vec<_>>>()?;
        let num_rows = self.batch.num_rows();
        build_batch(
            Arc::new(Schema::new(fields)),
            self.batch.columns().to_vec(),
            num_rows,
        )
    }

    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.batch
            .schema()
            .index_of(name)
            .map_err(|_| EcoError::ColumnNotFound(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        Ok(self.batch.column(self.column_index(name)?))
    }

    pub fn is_geometry_column(&self, index: usize) -> bool {
        is_geometry_field(self.batch.schema().field(index))
    }

    /// Indices of every geometry column, active or not.
    pub fn geometry_column_indices(&self) -> Vec<usize> {
        self.batch
            .schema()
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, field)| is_geometry_field(field))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn geometry_column_index(&self) -> Option<usize> {
        self.geometry_column_index
    }

    pub fn geometry_column_name(&self) -> Option<String> {
        self.geometry_column_index
            .map(|index| self.batch.schema().field(index).name().clone())
    }

    /// Decode the active geometry column.
    pub fn geometry(&self) -> Result<Vec<Option<Geometry>>> {
        let index = self
            .geometry_column_index
            .ok_or(EcoError::NoGeometryColumn)?;
        from_wkb_array(self.batch.column(index).as_ref())
    }

    /// Decode any geometry column by name.
    pub fn geometry_column(&self, name: &str) -> Result<Vec<Option<Geometry>>> {
        let index = self.column_index(name)?;
        if !self.is_geometry_column(index) {
            return Err(EcoError::IncorrectType(
                format!("column '{name}' does not hold geometries").into(),
            ));
        }
        from_wkb_array(self.batch.column(index).as_ref())
    }

    pub fn set_geometry(&self, name: &str) -> Result<Self> {
        let index = self.column_index(name)?;
        Self::try_new(self.batch.clone(), Some(index), self.crs.clone())
    }

    pub(crate) fn with_crs(self, crs: Option<Crs>) -> Self {
        Self { crs, ..self }
    }

    /// Replace the values of a column, keeping its field.
    pub(crate) fn replace_column(&self, index: usize, array: ArrayRef) -> Result<Self> {
        let mut columns = self.batch.columns().to_vec();
        columns[index] = array;
        let batch = build_batch(self.batch.schema(), columns, self.len())?;
        Self::try_new(batch, self.geometry_column_index, self.crs.clone())
    }

    pub(crate) fn append_column(&self, field: FieldRef, array: ArrayRef) -> Result<Self> {
        let schema = self.batch.schema();
        let mut fields = schema.fields().to_vec();
        fields.push(field);
        let mut columns = self.batch.columns().to_vec();
        columns.push(array);
        let batch = build_batch(Arc::new(Schema::new(fields)), columns, self.len())?;
        Self::try_new(batch, self.geometry_column_index, self.crs.clone())
    }
}

impl TryFrom<RecordBatch> for GeoTable {
    type Error = EcoError;

    /// Import a [RecordBatch]. The active geometry is the `geometry` column if it holds
    /// geometries, otherwise the first geometry column; the CRS is read from its field metadata.
    fn try_from(batch: RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let geometry_column_index = schema
            .index_of(DEFAULT_GEOMETRY_COLUMN)
            .ok()
            .filter(|index| is_geometry_field(schema.field(*index)))
            .or_else(|| schema.fields().iter().position(|f| is_geometry_field(f)));
        let crs = match geometry_column_index {
            Some(index) => ArrayMetadata::try_from(schema.field(index))?.crs(),
            None => None,
        };
        Self::try_new(batch, geometry_column_index, crs)
    }
}

/// Build a batch with an explicit row count so that frames without columns keep their length.
pub(crate) fn build_batch(
    schema: SchemaRef,
    columns: Vec<ArrayRef>,
    num_rows: usize,
) -> Result<RecordBatch> {
    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
    Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::fixtures;

    #[test]
    fn from_columns_picks_geometry_column() {
        let table = fixtures::point_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.geometry_column_name().as_deref(), Some("geometry"));
        assert!(table.crs().is_none());
    }

    #[test]
    fn from_columns_without_geometry() {
        let table = fixtures::merge_left();
        assert_eq!(table.geometry_column_index(), None);
        assert!(matches!(table.geometry(), Err(EcoError::NoGeometryColumn)));
    }

    #[test]
    fn from_columns_length_mismatch() {
        let mut columns = IndexMap::new();
        columns.insert("a".to_string(), Column::from(vec![1_i64, 2]));
        columns.insert("b".to_string(), Column::from(vec![1_i64]));
        assert!(GeoTable::from_columns(columns).is_err());
    }

    #[test]
    fn set_geometry_missing_column() {
        let table = fixtures::box_table();
        assert!(matches!(
            table.set_geometry("nope"),
            Err(EcoError::ColumnNotFound(name)) if name == "nope"
        ));
        assert!(matches!(
            table.set_geometry("id"),
            Err(EcoError::IncorrectType(_))
        ));
    }

    #[test]
    fn record_batch_round_trip_keeps_crs() {
        let table = fixtures::box_table();
        let batch = table.into_record_batch().unwrap();
        let table = GeoTable::try_from(batch).unwrap();
        assert_eq!(table.crs(), Some(&Crs::Epsg(4326)));
        // `my_geometry` is the first geometry column once `geometry` is absent.
        assert_eq!(table.geometry_column_name().as_deref(), Some("my_geometry"));
    }
}
