use crate::error::Result;
use crate::table::GeoTable;

/// Select a list of columns by name, in the given order.
///
/// The active geometry survives only if its column is part of the projection.
pub trait Project {
    type Output;

    fn project(&self, columns: &[&str]) -> Self::Output;
}

impl Project for GeoTable {
    type Output = Result<GeoTable>;

    fn project(&self, columns: &[&str]) -> Self::Output {
        let schema = self.schema();
        let mut fields = Vec::with_capacity(columns.len());
        let mut arrays = Vec::with_capacity(columns.len());
        for name in columns {
            let index = self.column_index(name)?;
            fields.push(schema.fields()[index].clone());
            arrays.push(self.batch().column(index).clone());
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::EcoError;
    use crate::test::fixtures;

    #[test]
    fn project_attribute_only() {
        let table = fixtures::box_table();
        let out = table.project(&["id"]).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.column_names(), vec!["id"]);
        assert_eq!(out.geometry_column_index(), None);
    }

    #[test]
    fn project_keeps_active_geometry() {
        let table = fixtures::box_table();
        let out = table.project(&["my_geometry", "id"]).unwrap();
        assert_eq!(out.geometry_column_index(), Some(0));
    }

    #[test]
    fn project_missing_column() {
        let table = fixtures::box_table();
        assert!(matches!(
            table.project(&["id", "missing"]),
            Err(EcoError::ColumnNotFound(_))
        ));
    }
}
