use std::io::Write;

use arrow_json::ArrayWriter;
use geojson::{Feature, FeatureCollection, JsonObject};
use tracing::warn;

use crate::array::from_wkb_array;
use crate::crs::{describe_crs, WGS84};
use crate::error::Result;
use crate::table::GeoTable;

/// Convert each row to a feature.
///
/// The active geometry becomes the feature geometry. Attribute columns become properties, as do
/// inactive geometry columns, encoded as GeoJSON geometry objects. Null attributes are omitted.
pub fn table_to_features(table: &GeoTable) -> Result<Vec<Feature>> {
    let geometry_columns = table.geometry_column_indices();
    let attribute_columns = (0..table.num_columns())
        .filter(|index| !geometry_columns.contains(index))
        .collect::<Vec<_>>();

    let mut properties: Vec<JsonObject> = if attribute_columns.is_empty() || table.is_empty() {
        vec![JsonObject::new(); table.len()]
    } else {
        let batch = table.batch().project(&attribute_columns)?;
        let mut writer = ArrayWriter::new(Vec::new());
        writer.write(&batch)?;
        writer.finish()?;
        serde_json::from_slice(&writer.into_inner())?
    };

    let active = table.geometry_column_index();
    let mut geometry = vec![None; table.len()];
    for index in geometry_columns {
        let name = table.schema().field(index).name().clone();
        let decoded = from_wkb_array(table.batch().column(index).as_ref())?;
        for (row, maybe_geom) in decoded.iter().enumerate() {
            let value = maybe_geom
                .as_ref()
                .map(|geom| geojson::Geometry::new(geojson::Value::from(geom)));
            if Some(index) == active {
                geometry[row] = value;
            } else if let Some(value) = value {
                properties[row].insert(name.clone(), serde_json::to_value(value)?);
            }
        }
    }

    Ok(properties
        .into_iter()
        .zip(geometry)
        .map(|(properties, geometry)| Feature {
            geometry,
            properties: Some(properties),
            ..Default::default()
        })
        .collect())
}

/// Write a table as a GeoJSON FeatureCollection.
///
/// Coordinates are written as stored; a table in another CRS is not reprojected.
pub fn write_geojson<W: Write>(table: &GeoTable, writer: W) -> Result<()> {
    if table.crs().is_some_and(|crs| *crs != WGS84) {
        warn!(crs = %describe_crs(table.crs()), "writing GeoJSON outside EPSG:4326");
    }
    let collection = FeatureCollection {
        bbox: None,
        features: table_to_features(table)?,
        foreign_members: None,
    };
    serde_json::to_writer(writer, &collection)?;
    Ok(())
}
