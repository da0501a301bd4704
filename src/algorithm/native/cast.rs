use std::sync::Arc;

use arrow_cast::cast;
use arrow_schema::{DataType, Field};

use crate::error::{EcoError, Result};
use crate::table::GeoTable;

/// Coerce column types with Arrow's cast kernels.
///
/// Geometry columns are never cast.
pub trait AsType {
    type Output;

    /// Cast every attribute column to `data_type`.
    fn astype(&self, data_type: &DataType) -> Self::Output;

    /// Cast the named columns. Naming a geometry column is an error.
    fn astype_columns(&self, types: &[(&str, DataType)]) -> Self::Output;
}

impl GeoTable {
    fn cast_columns(&self, target: impl Fn(usize) -> Option<DataType>) -> Result<GeoTable> {
        let schema = self.schema();
        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut arrays = Vec::with_capacity(schema.fields().len());
        for (index, field) in schema.fields().iter().enumerate() {
            let array = self.batch().column(index);
            match target(index) {
                Some(data_type) if &data_type != field.data_type() => {
                    arrays.push(cast(array, &data_type)?);
                    fields.push(Arc::new(Field::clone(field).with_data_type(data_type)));
                }
                _ => {
                    arrays.push(array.clone());
                    fields.push(field.clone());
                }
            }
        }
        GeoTable::from_parts(
            fields,
            arrays,
            self.len(),
            self.geometry_column_name().as_deref(),
            self.crs().cloned(),
        )
    }
}

impl AsType for GeoTable {
    type Output = Result<GeoTable>;

    fn astype(&self, data_type: &DataType) -> Self::Output {
        self.cast_columns(|index| {
            (!self.is_geometry_column(index)).then(|| data_type.clone())
        })
    }

    fn astype_columns(&self, types: &[(&str, DataType)]) -> Self::Output {
        let mut targets = Vec::with_capacity(types.len());
        for (name, data_type) in types {
            let index = self.column_index(name)?;
            if self.is_geometry_column(index) {
                return Err(EcoError::IncorrectType(
                    format!("cannot cast geometry column '{name}'").into(),
                ));
            }
            targets.push((index, data_type.clone()));
        }
        self.cast_columns(|index| {
            targets
                .iter()
                .find(|(target, _)| *target == index)
                .map(|(_, data_type)| data_type.clone())
        })
    }
}

#[cfg(test)]
mod test {
    use arrow_array::cast::AsArray;

    use super::*;
    use crate::test::fixtures;

    #[test]
    fn astype_all_attribute_columns() {
        let table = fixtures::point_table();
        let out = table.astype(&DataType::Utf8).unwrap();
        assert_eq!(out.column("a").unwrap().data_type(), &DataType::Utf8);
        assert_eq!(out.column("a").unwrap().as_string::<i32>().value(0), "1");
        assert_eq!(out.geometry().unwrap(), table.geometry().unwrap());
    }

    #[test]
    fn astype_named_columns() {
        let table = fixtures::box_table();
        let out = table
            .astype_columns(&[("id", DataType::Float64)])
            .unwrap();
        assert_eq!(out.column("id").unwrap().data_type(), &DataType::Float64);

        assert!(matches!(
            table.astype_columns(&[("my_geometry", DataType::Utf8)]),
            Err(EcoError::IncorrectType(_))
        ));
    }
}
