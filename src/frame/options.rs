use std::path::{Path, PathBuf};

use arrow_array::RecordBatch;
use geojson::{Feature, FeatureCollection};
use indexmap::IndexMap;

use crate::array::Column;
use crate::crs::Crs;
use crate::error::Result;
use crate::io;
use crate::table::GeoTable;

/// Construction-time overrides for a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOptions {
    /// Name of the column to use as the active geometry.
    pub geometry: Option<String>,
    /// CRS that replaces the one carried by the source.
    pub crs: Option<Crs>,
}

impl FrameOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geometry(self, name: impl Into<String>) -> Self {
        Self {
            geometry: Some(name.into()),
            ..self
        }
    }

    pub fn with_crs(self, crs: Crs) -> Self {
        Self {
            crs: Some(crs),
            ..self
        }
    }

    pub(crate) fn apply(&self, table: GeoTable) -> Result<GeoTable> {
        let table = match self.geometry.as_deref() {
            Some(name) => table.set_geometry(name)?,
            None => table,
        };
        Ok(match &self.crs {
            Some(crs) => table.with_crs(Some(crs.clone())),
            None => table,
        })
    }
}

/// Everything a frame can be built from.
#[derive(Debug, Clone)]
pub enum FrameSource {
    /// An existing table, with its geometry column and CRS.
    Table(GeoTable),
    /// Column name to values. A geometry column named `geometry` becomes active.
    Columns(IndexMap<String, Column>),
    /// A file, read with the reader matching its extension.
    Path(PathBuf),
    /// GeoJSON features, read without a CRS.
    Features(Vec<Feature>),
    /// An Arrow batch with `geoarrow.wkb` geometry fields.
    RecordBatch(RecordBatch),
}

impl FrameSource {
    pub fn into_table(self) -> Result<GeoTable> {
        match self {
            FrameSource::Table(table) => Ok(table),
            FrameSource::Columns(columns) => GeoTable::from_columns(columns),
            FrameSource::Path(path) => io::read_file(path),
            FrameSource::Features(features) => io::geojson::features_to_table(features),
            FrameSource::RecordBatch(batch) => GeoTable::try_from(batch),
        }
    }
}

impl From<GeoTable> for FrameSource {
    fn from(value: GeoTable) -> Self {
        FrameSource::Table(value)
    }
}

impl From<IndexMap<String, Column>> for FrameSource {
    fn from(value: IndexMap<String, Column>) -> Self {
        FrameSource::Columns(value)
    }
}

impl From<Vec<(&str, Column)>> for FrameSource {
    fn from(value: Vec<(&str, Column)>) -> Self {
        FrameSource::Columns(
            value
                .into_iter()
                .map(|(name, column)| (name.to_string(), column))
                .collect(),
        )
    }
}

impl From<&Path> for FrameSource {
    fn from(value: &Path) -> Self {
        FrameSource::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for FrameSource {
    fn from(value: PathBuf) -> Self {
        FrameSource::Path(value)
    }
}

impl From<Vec<Feature>> for FrameSource {
    fn from(value: Vec<Feature>) -> Self {
        FrameSource::Features(value)
    }
}

impl From<FeatureCollection> for FrameSource {
    fn from(value: FeatureCollection) -> Self {
        FrameSource::Features(value.features)
    }
}

impl From<RecordBatch> for FrameSource {
    fn from(value: RecordBatch) -> Self {
        FrameSource::RecordBatch(value)
    }
}
