use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arrow::compute::take;
use arrow::row::{RowConverter, SortField};
use arrow_array::{Array, ArrayRef, UInt32Array};
use arrow_cast::cast;
use arrow_schema::Field;

use crate::crs::describe_crs;
use crate::error::{EcoError, Result};
use crate::table::GeoTable;

/// Which rows of the left table appear in a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// Only rows with a match on both sides.
    #[default]
    Inner,
    /// Every left row; unmatched rows get nulls in the right columns.
    Left,
}

#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub left_on: Vec<String>,
    pub right_on: Vec<String>,
    pub how: JoinType,
    /// Appended to column names present on both sides.
    pub suffixes: (String, String),
}

impl MergeOptions {
    /// Join on key columns that have the same name on both sides.
    pub fn on(columns: &[&str]) -> Self {
        Self::left_right(columns, columns)
    }

    /// Join on differently named key columns.
    pub fn left_right(left_on: &[&str], right_on: &[&str]) -> Self {
        Self {
            left_on: left_on.iter().map(|name| name.to_string()).collect(),
            right_on: right_on.iter().map(|name| name.to_string()).collect(),
            how: JoinType::default(),
            suffixes: ("_x".to_string(), "_y".to_string()),
        }
    }

    pub fn with_how(self, how: JoinType) -> Self {
        Self { how, ..self }
    }

    pub fn with_suffixes(self, left: &str, right: &str) -> Self {
        Self {
            suffixes: (left.to_string(), right.to_string()),
            ..self
        }
    }
}

/// Database-style join of two tables on key columns.
///
/// Rows come out in left-table order. The result keeps the left table's active geometry and CRS.
/// A right table carrying geometry columns must share the left table's CRS.
pub trait Merge {
    type Output;

    fn merge(&self, right: &GeoTable, options: &MergeOptions) -> Self::Output;
}

impl Merge for GeoTable {
    type Output = Result<GeoTable>;

    fn merge(&self, right: &GeoTable, options: &MergeOptions) -> Self::Output {
        if options.left_on.is_empty() || options.left_on.len() != options.right_on.len() {
            return Err(EcoError::General(
                "left_on and right_on must name the same, non-zero number of columns".to_string(),
            ));
        }
        if !right.geometry_column_indices().is_empty() && right.crs() != self.crs() {
            return Err(EcoError::CrsMismatch {
                left: describe_crs(self.crs()),
                right: describe_crs(right.crs()),
            });
        }

        let left_keys = options
            .left_on
            .iter()
            .map(|name| Ok(self.column(name)?.clone()))
            .collect::<Result<Vec<ArrayRef>>>()?;
        let right_keys = options
            .right_on
            .iter()
            .zip(left_keys.iter())
            .map(|(name, left_key)| {
                let right_key = right.column(name)?;
                if right_key.data_type() == left_key.data_type() {
                    Ok(right_key.clone())
                } else {
                    Ok(cast(right_key, left_key.data_type())?)
                }
            })
            .collect::<Result<Vec<ArrayRef>>>()?;

        let converter = RowConverter::new(
            left_keys
                .iter()
                .map(|key| SortField::new(key.data_type().clone()))
                .collect(),
        )?;
        let left_rows = converter.convert_columns(&left_keys)?;
        let right_rows = converter.convert_columns(&right_keys)?;

        let has_null_key = |keys: &[ArrayRef], row: usize| keys.iter().any(|key| key.is_null(row));

        let mut lookup: HashMap<_, Vec<u32>> = HashMap::new();
        for row in 0..right.len() {
            if !has_null_key(&right_keys, row) {
                lookup
                    .entry(right_rows.row(row))
                    .or_default()
                    .push(row as u32);
            }
        }

        let mut left_indices = Vec::new();
        let mut right_indices = Vec::new();
        for row in 0..self.len() {
            let matches = if has_null_key(&left_keys, row) {
                None
            } else {
                lookup.get(&left_rows.row(row))
            };
            match matches {
                Some(matches) => {
                    for right_row in matches {
                        left_indices.push(row as u32);
                        right_indices.push(Some(*right_row));
                    }
                }
                None if options.how == JoinType::Left => {
                    left_indices.push(row as u32);
                    right_indices.push(None);
                }
                None => {}
            }
        }
        let left_indices = UInt32Array::from(left_indices);
        let right_indices = UInt32Array::from(right_indices);

        // Keys joined under the same name appear once, from the left side.
        let shared_keys: HashSet<&str> = options
            .left_on
            .iter()
            .zip(options.right_on.iter())
            .filter(|(left, right)| left == right)
            .map(|(left, _)| left.as_str())
            .collect();

        let left_schema = self.schema();
        let right_schema = right.schema();
        let right_kept: Vec<usize> = (0..right_schema.fields().len())
            .filter(|index| !shared_keys.contains(right_schema.field(*index).name().as_str()))
            .collect();
        let left_names: HashSet<&str> = left_schema
            .fields()
            .iter()
            .map(|field| field.name().as_str())
            .collect();
        let right_names: HashSet<&str> = right_kept
            .iter()
            .map(|index| right_schema.field(*index).name().as_str())
            .collect();

        let mut fields = Vec::new();
        let mut arrays = Vec::new();
        let mut geometry_column = self.geometry_column_name();

        for (index, field) in left_schema.fields().iter().enumerate() {
            let mut name = field.name().clone();
            if right_names.contains(name.as_str()) && !shared_keys.contains(name.as_str()) {
                name = format!("{name}{}", options.suffixes.0);
                if geometry_column.as_deref() == Some(field.name().as_str()) {
                    geometry_column = Some(name.clone());
                }
            }
            fields.push(Arc::new(Field::clone(field).with_name(name)));
            arrays.push(take(self.batch().column(index).as_ref(), &left_indices, None)?);
        }

        for index in right_kept {
            let field = right_schema.field(index);
            let mut name = field.name().clone();
            if left_names.contains(name.as_str()) {
                name = format!("{name}{}", options.suffixes.1);
            }
            fields.push(Arc::new(field.clone().with_name(name).with_nullable(true)));
            arrays.push(take(
                right.batch().column(index).as_ref(),
                &right_indices,
                None,
            )?);
        }

        GeoTable::from_parts(
            fields,
            arrays,
            left_indices.len(),
            geometry_column.as_deref(),
            self.crs().cloned(),
        )
    }
}
