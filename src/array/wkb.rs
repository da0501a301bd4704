//! Geometry columns stored as `geoarrow.wkb` extension arrays.

use std::collections::HashMap;

use arrow_array::cast::AsArray;
use arrow_array::{Array, BinaryArray};
use arrow_schema::{DataType, Field};
use geo::Geometry;
use geozero::wkb::Wkb;
use geozero::{CoordDimensions, ToGeo, ToWkb};

use crate::array::metadata::{ArrayMetadata, EXTENSION_METADATA_KEY, EXTENSION_NAME_KEY};
use crate::error::{EcoError, Result};

pub const WKB_EXTENSION_NAME: &str = "geoarrow.wkb";

/// Build the Arrow field of a geometry column.
pub fn geometry_field(name: &str, metadata: &ArrayMetadata) -> Result<Field> {
    let mut field_metadata = HashMap::new();
    field_metadata.insert(
        EXTENSION_NAME_KEY.to_string(),
        WKB_EXTENSION_NAME.to_string(),
    );
    if metadata.should_serialize() {
        field_metadata.insert(
            EXTENSION_METADATA_KEY.to_string(),
            serde_json::to_string(metadata)?,
        );
    }
    Ok(Field::new(name, DataType::Binary, true).with_metadata(field_metadata))
}

/// Returns `true` if this field describes a geometry column.
pub fn is_geometry_field(field: &Field) -> bool {
    field
        .metadata()
        .get(EXTENSION_NAME_KEY)
        .is_some_and(|name| name == WKB_EXTENSION_NAME)
}

/// Encode geometries to a WKB [BinaryArray]. `None` becomes a null slot.
pub fn to_wkb_array<'a>(
    geometries: impl IntoIterator<Item = Option<&'a Geometry>>,
) -> Result<BinaryArray> {
    let encoded = geometries
        .into_iter()
        .map(|maybe_geom| {
            maybe_geom
                .map(|geom| geom.to_wkb(CoordDimensions::xy()))
                .transpose()
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(BinaryArray::from_iter(encoded))
}

/// Decode a WKB [BinaryArray] back into geometries.
pub fn from_wkb_array(array: &dyn Array) -> Result<Vec<Option<Geometry>>> {
    let binary = array
        .as_binary_opt::<i32>()
        .ok_or_else(|| EcoError::IncorrectType("geometry column is not a binary array".into()))?;
    binary
        .iter()
        .map(|maybe_wkb| {
            maybe_wkb
                .map(|wkb| -> Result<Geometry> { Ok(Wkb(wkb.to_vec()).to_geo()?) })
                .transpose()
        })
        .collect()
}
