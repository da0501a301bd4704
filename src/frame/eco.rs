use crate::frame::{FrameSource, GeoFrame};
use crate::table::GeoTable;

/// The frame type of the ecoscope toolkit.
///
/// Every operation inherited from [`GeoFrame`] returns an `EcoDataFrame`.
#[derive(Debug, Clone)]
pub struct EcoDataFrame(GeoTable);

impl GeoFrame for EcoDataFrame {
    fn from_table(table: GeoTable) -> Self {
        Self(table)
    }

    fn as_table(&self) -> &GeoTable {
        &self.0
    }

    fn into_table(self) -> GeoTable {
        self.0
    }
}

impl From<EcoDataFrame> for FrameSource {
    fn from(value: EcoDataFrame) -> Self {
        FrameSource::Table(value.0)
    }
}

impl From<EcoDataFrame> for GeoTable {
    fn from(value: EcoDataFrame) -> Self {
        value.0
    }
}
