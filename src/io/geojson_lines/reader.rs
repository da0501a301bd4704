use std::io::BufRead;

use geojson::{Feature, GeoJson};

use crate::crs::WGS84;
use crate::error::{EcoError, Result};
use crate::io::geojson::features_to_table;
use crate::table::GeoTable;

/// Read a GeoJSON Lines file
///
/// This expects a GeoJSON Feature on each line of a text file, with a newline character separating
/// each Feature. Blank lines are skipped. The table is tagged EPSG:4326.
pub fn read_geojson_lines<R: BufRead>(reader: R) -> Result<GeoTable> {
    let mut features = Vec::new();
    for line in reader.lines() {
        let line = line?;
        // RFC 8142 sequences prefix each record with a record separator.
        let line = line.trim().trim_start_matches('\u{1e}');
        if line.is_empty() {
            continue;
        }
        let feature = match line.parse::<GeoJson>()? {
            GeoJson::Feature(feature) => feature,
            GeoJson::Geometry(geometry) => Feature {
                geometry: Some(geometry),
                ..Default::default()
            },
            GeoJson::FeatureCollection(_) => {
                return Err(EcoError::General(
                    "expected one feature per line, found a FeatureCollection".to_string(),
                ))
            }
        };
        features.push(feature);
    }
    Ok(features_to_table(features)?.with_crs(Some(WGS84)))
}
