use std::io::Read;
use std::sync::Arc;

use arrow_array::ArrayRef;
use arrow_json::reader::{infer_json_schema_from_iterator, ReaderBuilder};
use arrow_schema::{FieldRef, Schema};
use geo::Geometry;
use geojson::{Feature, GeoJson};
use serde_json::{Map, Value};
use tracing::debug;

use crate::array::{geometry_field, to_wkb_array, ArrayMetadata};
use crate::crs::WGS84;
use crate::error::Result;
use crate::table::{GeoTable, DEFAULT_GEOMETRY_COLUMN};

/// Read a GeoJSON FeatureCollection, Feature or bare Geometry.
///
/// GeoJSON coordinates are always WGS 84, so the table is tagged EPSG:4326.
pub fn read_geojson<R: Read>(mut reader: R) -> Result<GeoTable> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    let features = match buffer.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature {
            geometry: Some(geometry),
            ..Default::default()
        }],
    };
    Ok(features_to_table(features)?.with_crs(Some(WGS84)))
}

/// Convert features to a table with one column per property and a trailing `geometry` column.
///
/// Property types are inferred across all features. The table has no CRS.
pub fn features_to_table(features: Vec<Feature>) -> Result<GeoTable> {
    let num_rows = features.len();
    let mut properties = Vec::with_capacity(num_rows);
    let mut geometries = Vec::with_capacity(num_rows);
    for feature in features {
        properties.push(Value::Object(feature.properties.unwrap_or_else(Map::new)));
        geometries.push(feature.geometry.map(Geometry::<f64>::try_from).transpose()?);
    }

    let schema = infer_json_schema_from_iterator(properties.iter().map(Ok))?;
    let mut fields: Vec<FieldRef> = schema
        .fields()
        .iter()
        .filter(|field| field.name() != DEFAULT_GEOMETRY_COLUMN)
        .cloned()
        .collect();
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(fields.len() + 1);
    if !fields.is_empty() && num_rows > 0 {
        let schema = Arc::new(Schema::new(fields.clone()));
        let mut decoder = ReaderBuilder::new(schema)
            .with_batch_size(num_rows)
            .with_coerce_primitive(true)
            .build_decoder()?;
        decoder.serialize(properties.as_slice())?;
        if let Some(batch) = decoder.flush()? {
            arrays.extend(batch.columns().iter().cloned());
        }
    } else {
        fields.clear();
    }
    debug!(rows = num_rows, columns = fields.len(), "decoded feature properties");

    fields.push(Arc::new(geometry_field(
        DEFAULT_GEOMETRY_COLUMN,
        &ArrayMetadata::default(),
    )?));
    arrays.push(Arc::new(to_wkb_array(geometries.iter().map(Option::as_ref))?));
    GeoTable::from_parts(
        fields,
        arrays,
        num_rows,
        Some(DEFAULT_GEOMETRY_COLUMN),
        None,
    )
}

#[cfg(test)]
mod test {
    use arrow_array::cast::AsArray;
    use arrow_array::types::Int64Type;
    use arrow_array::Array;
    use geo::point;

    use super::*;
    use crate::crs::Crs;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}, "properties": {"name": "a", "count": 1}},
            {"type": "Feature", "geometry": null, "properties": {"name": "b"}}
        ]
    }"#;

    #[test]
    fn read_feature_collection() {
        let table = read_geojson(COLLECTION.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.crs(), Some(&Crs::Epsg(4326)));
        assert_eq!(table.geometry_column_name().as_deref(), Some("geometry"));

        let count = table.column("count").unwrap().as_primitive::<Int64Type>();
        assert_eq!(count.value(0), 1);
        assert!(count.is_null(1));
        assert_eq!(table.column("name").unwrap().as_string::<i32>().value(1), "b");

        let geometry = table.geometry().unwrap();
        assert_eq!(geometry[0], Some(point!(x: 1., y: 2.).into()));
        assert_eq!(geometry[1], None);
    }

    #[test]
    fn read_bare_geometry() {
        let table = read_geojson(r#"{"type": "Point", "coordinates": [3, 4]}"#.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.column_names(), vec!["geometry"]);
    }

    #[test]
    fn features_without_properties() {
        let table = features_to_table(vec![]).unwrap();
        assert!(table.is_empty());
        assert!(table.crs().is_none());
    }

    #[test]
    fn invalid_json() {
        assert!(read_geojson("{not json".as_bytes()).is_err());
    }
}
