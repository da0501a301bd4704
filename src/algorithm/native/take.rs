use std::ops::Range;

use arrow::compute::take;
use arrow_array::UInt32Array;

use crate::error::Result;
use crate::table::GeoTable;

/// Take rows by index, creating a new table from those rows.
pub trait Take {
    type Output;

    fn take(&self, indices: &UInt32Array) -> Self::Output;

    /// Take a contiguous range of rows. Bounds past the end of the table are clamped, the way a
    /// Python slice would be.
    fn take_range(&self, range: &Range<usize>) -> Self::Output;
}

impl Take for GeoTable {
    type Output = Result<GeoTable>;

    fn take(&self, indices: &UInt32Array) -> Self::Output {
        let columns = self
            .batch()
            .columns()
            .iter()
            .map(|values| Ok(take(values.as_ref(), indices, None)?))
            .collect::<Result<Vec<_>>>()?;
        GeoTable::from_parts(
            self.schema().fields().to_vec(),
            columns,
            indices.len(),
            self.geometry_column_name().as_deref(),
            self.crs().cloned(),
        )
    }

    fn take_range(&self, range: &Range<usize>) -> Self::Output {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        GeoTable::try_new(
            self.batch().slice(start, end - start),
            self.geometry_column_index(),
            self.crs().cloned(),
        )
    }
}
