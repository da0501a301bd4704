//! Small helpers for preparing frames for export.

use std::sync::Arc;

use arrow_array::{ArrayRef, StringArray};
use arrow_json::ArrayWriter;
use arrow_schema::{DataType, Field};
use geojson::JsonObject;

use crate::algorithm::native::Project;
use crate::error::Result;
use crate::frame::GeoFrame;

/// Name of the column holding packed attributes.
pub const ADDITIONAL_COLUMN: &str = "additional";

/// Convert an `"r,g,b"` string to `#RRGGBB`.
///
/// Malformed input is not an error: `default` is returned when `value` is absent or empty, or
/// when it is not exactly three integer components in `0..=255` (so `"300,0,0"` and `"1.5,0,0"`
/// both fall back).
pub fn to_hex(value: Option<&str>, default: &str) -> String {
    let components = value
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            value
                .split(',')
                .map(|part| part.trim().parse::<u8>())
                .collect::<std::result::Result<Vec<_>, _>>()
        });
    match components {
        Some(Ok(rgb)) if rgb.len() == 3 => format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2]),
        _ => default.to_string(),
    }
}

/// Fold every attribute column not listed in `keep` into a single JSON string column named
/// `additional`.
///
/// Geometry columns are never packed. Null values are left out of the packed objects. A frame
/// with nothing to pack is returned unchanged.
pub fn pack_columns<F: GeoFrame>(frame: &F, keep: &[&str]) -> Result<F> {
    let table = frame.as_table();
    let geometry_columns = table.geometry_column_indices();
    let names = table.column_names();
    let (packed, kept): (Vec<usize>, Vec<usize>) = (0..names.len()).partition(|index| {
        !geometry_columns.contains(index) && !keep.contains(&names[*index].as_str())
    });
    if packed.is_empty() {
        return Ok(F::from_table(table.clone()));
    }

    let objects: Vec<JsonObject> = if table.is_empty() {
        vec![]
    } else {
        let mut writer = ArrayWriter::new(Vec::new());
        writer.write(&table.batch().project(&packed)?)?;
        writer.finish()?;
        serde_json::from_slice(&writer.into_inner())?
    };
    let additional = objects
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let kept_names = kept.iter().map(|index| names[*index].as_str()).collect::<Vec<_>>();
    let out = Project::project(table, &kept_names)?.append_column(
        Arc::new(Field::new(ADDITIONAL_COLUMN, DataType::Utf8, true)),
        Arc::new(StringArray::from(additional)) as ArrayRef,
    )?;
    Ok(F::from_table(out))
}

#[cfg(test)]
mod test {
    use arrow_array::cast::AsArray;
    use serde_json::Value;

    use super::*;
    use crate::frame::{Column, EcoDataFrame, FrameOptions};

    #[test]
    fn hex_from_rgb() {
        assert_eq!(to_hex(Some("255,0,16"), "#ff0000"), "#FF0010");
        assert_eq!(to_hex(Some(" 1, 2, 3 "), "#ff0000"), "#010203");
        assert_eq!(to_hex(None, "#ff0000"), "#ff0000");
        assert_eq!(to_hex(Some(""), "#ff0000"), "#ff0000");
        assert_eq!(to_hex(Some("300,0,0"), "#000000"), "#000000");
        assert_eq!(to_hex(Some("1,2"), "#000000"), "#000000");
        assert_eq!(to_hex(Some("1.5,0,0"), "#000000"), "#000000");
    }

    #[test]
    fn pack_extra_columns() {
        let frame = EcoDataFrame::from_source(
            vec![
                ("id", Column::from(vec![1_i64, 2])),
                ("name", Column::from(vec![Some("a"), None])),
                ("weight", Column::from(vec![1.5, 2.5])),
                ("geometry", vec![geo::point!(x: 0., y: 0.), geo::point!(x: 1., y: 1.)].into()),
            ],
            FrameOptions::new(),
        )
        .unwrap();

        let packed = pack_columns(&frame, &["id"]).unwrap();
        assert_eq!(packed.column_names(), vec!["id", "geometry", "additional"]);
        assert_eq!(packed.geometry_column_name().as_deref(), Some("geometry"));

        let additional = packed.column("additional").unwrap().as_string::<i32>();
        let first: Value = serde_json::from_str(additional.value(0)).unwrap();
        assert_eq!(first, serde_json::json!({"name": "a", "weight": 1.5}));
        let second: Value = serde_json::from_str(additional.value(1)).unwrap();
        assert_eq!(second, serde_json::json!({"weight": 2.5}));
    }

    #[test]
    fn pack_nothing() {
        let frame = EcoDataFrame::from_table(crate::test::fixtures::point_table());
        let packed = pack_columns(&frame, &["a"]).unwrap();
        assert_eq!(packed.column_names(), frame.column_names());
    }
}
