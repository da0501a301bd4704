//! Reading and writing frames, dispatched on the file extension.

pub mod geojson;
pub mod geojson_lines;
pub mod utils;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::debug;

use crate::error::{EcoError, Result};
use crate::table::GeoTable;

/// File formats with a registered reader and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    GeoJson,
    GeoJsonLines,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("geojson" | "json") => Ok(FileFormat::GeoJson),
            Some("geojsonl" | "geojsonseq" | "ndjson") => Ok(FileFormat::GeoJsonLines),
            _ => Err(EcoError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read a file into a table, choosing the reader from the file extension.
pub fn read_file(path: impl AsRef<Path>) -> Result<GeoTable> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, "reading file");
    let reader = BufReader::new(File::open(path)?);
    match format {
        FileFormat::GeoJson => geojson::read_geojson(reader),
        FileFormat::GeoJsonLines => geojson_lines::read_geojson_lines(reader),
    }
}

/// Write a table to a file, choosing the writer from the file extension.
pub fn write_file(table: &GeoTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, rows = table.len(), "writing file");
    let writer = BufWriter::new(File::create(path)?);
    match format {
        FileFormat::GeoJson => geojson::write_geojson(table, writer),
        FileFormat::GeoJsonLines => geojson_lines::write_geojson_lines(table, writer),
    }
}
