use std::sync::Arc;

use arrow::array::new_null_array;
use arrow::compute::concat;
use arrow_array::{Array, ArrayRef};
use arrow_cast::cast;
use itertools::Itertools;

use crate::crs::describe_crs;
use crate::error::{EcoError, Result};
use crate::table::GeoTable;

pub trait Concatenate: Sized {
    type Output;

    fn concatenate(&self) -> Self::Output;
}

/// Stack tables vertically.
///
/// Columns are aligned by name in order of first appearance; a column missing from a table is
/// filled with nulls, and values are cast to the type the column has where it first appears.
/// All tables must share a CRS. The active geometry is taken from the first table.
impl Concatenate for &[GeoTable] {
    type Output = Result<GeoTable>;

    fn concatenate(&self) -> Self::Output {
        let first = self
            .first()
            .ok_or_else(|| EcoError::General("no tables to concatenate".to_string()))?;
        for table in self.iter().skip(1) {
            if table.crs() != first.crs() {
                return Err(EcoError::CrsMismatch {
                    left: describe_crs(first.crs()),
                    right: describe_crs(table.crs()),
                });
            }
        }

        let names = self
            .iter()
            .flat_map(|table| table.column_names())
            .unique()
            .collect::<Vec<_>>();
        let num_rows = self.iter().map(GeoTable::len).sum();

        let mut fields = Vec::with_capacity(names.len());
        let mut arrays = Vec::with_capacity(names.len());
        for name in names.iter() {
            let Some(field) = self.iter().find_map(|table| {
                let index = table.column_index(name).ok()?;
                Some(table.schema().field(index).clone())
            }) else {
                continue;
            };
            let mut chunks: Vec<ArrayRef> = Vec::with_capacity(self.len());
            for table in self.iter() {
                let chunk = match table.column_index(name) {
                    Ok(index) => {
                        let column = table.batch().column(index);
                        if column.data_type() == field.data_type() {
                            column.clone()
                        } else {
                            cast(column, field.data_type())?
                        }
                    }
                    Err(_) => new_null_array(field.data_type(), table.len()),
                };
                chunks.push(chunk);
            }
            let chunk_refs = chunks.iter().map(|c| c.as_ref()).collect::<Vec<&dyn Array>>();
            arrays.push(concat(&chunk_refs)?);
            fields.push(Arc::new(field.with_nullable(true)));
        }

        GeoTable::from_parts(
            fields,
            arrays,
            num_rows,
            first.geometry_column_name().as_deref(),
            first.crs().cloned(),
        )
    }
}

#[cfg(test)]
mod test {
    use arrow_array::cast::AsArray;
    use arrow_array::types::Int64Type;
    use geo::point;

    use super::*;
    use crate::crs::Crs;
    use crate::test::fixtures;

    fn single(a: i64, x: f64) -> GeoTable {
        GeoTable::from_columns(fixtures::columns(vec![
            ("a", vec![a].into()),
            ("geometry", vec![point!(x: x, y: x)].into()),
        ]))
        .unwrap()
    }

    #[test]
    fn concatenate_two_tables() {
        let tables = vec![single(1, 0.), single(2, 1.)];
        let out = tables.as_slice().concatenate().unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.geometry_column_name().as_deref(), Some("geometry"));
        let a = out.column("a").unwrap().as_primitive::<Int64Type>();
        assert_eq!(a.values().to_vec(), vec![1, 2]);
    }

    #[test]
    fn concatenate_aligns_columns() {
        let other = GeoTable::from_columns(fixtures::columns(vec![(
            "b",
            vec!["x"].into(),
        )]))
        .unwrap();
        let tables = vec![single(1, 0.), other];
        let out = tables.as_slice().concatenate().unwrap();
        assert_eq!(out.column_names(), vec!["a", "geometry", "b"]);
        assert!(out.column("a").unwrap().is_null(1));
        assert!(out.column("b").unwrap().is_null(0));
    }

    #[test]
    fn concatenate_crs_mismatch() {
        let tables = vec![single(1, 0.).with_crs(Some(Crs::Epsg(4326))), single(2, 1.)];
        assert!(matches!(
            tables.as_slice().concatenate(),
            Err(EcoError::CrsMismatch { .. })
        ));
        let empty: &[GeoTable] = &[];
        assert!(empty.concatenate().is_err());
    }
}
