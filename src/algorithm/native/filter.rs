use arrow::compute::filter_record_batch;
use arrow_array::BooleanArray;

use crate::error::{EcoError, Result};
use crate::table::GeoTable;

/// Keep the rows where a boolean mask is `true`. Null mask slots drop the row.
pub trait Filter {
    type Output;

    fn filter(&self, mask: &BooleanArray) -> Self::Output;
}

impl Filter for GeoTable {
    type Output = Result<GeoTable>;

    fn filter(&self, mask: &BooleanArray) -> Self::Output {
        if mask.len() != self.len() {
            return Err(EcoError::General(format!(
                "mask has {} values but the table has {} rows",
                mask.len(),
                self.len()
            )));
        }
        let batch = filter_record_batch(self.batch(), mask)?;
        GeoTable::try_new(batch, self.geometry_column_index(), self.crs().cloned())
    }
}
