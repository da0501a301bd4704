//! Metadata carried on the Arrow field of a geometry column.
//!
//! This follows the extension metadata [defined by GeoArrow](https://geoarrow.org/extension-types):
//! the CRS is serialized to JSON under `ARROW:extension:metadata` when a frame is exported to a
//! [`RecordBatch`][arrow_array::RecordBatch] and read back on import.

use arrow_schema::Field;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crs::Crs;
use crate::error::EcoError;

pub const EXTENSION_NAME_KEY: &str = "ARROW:extension:name";
pub const EXTENSION_METADATA_KEY: &str = "ARROW:extension:metadata";

#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArrayMetadata {
    /// Either a string (authority code, PROJ string, WKT) or a PROJJSON object. Omitted if the
    /// producer does not have any information about the CRS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Value>,
}

impl ArrayMetadata {
    pub fn from_crs(crs: Option<&Crs>) -> Self {
        Self {
            crs: crs.map(|crs| Value::String(crs.to_string())),
        }
    }

    /// Decide whether this [ArrayMetadata] should be written to Arrow metadata (aka if it is
    /// non-empty)
    pub fn should_serialize(&self) -> bool {
        self.crs.is_some()
    }

    /// Resolve the stored value into a [Crs].
    ///
    /// PROJJSON objects resolve to their `id` when it names an EPSG code and are otherwise kept
    /// as their serialized JSON text.
    pub fn crs(&self) -> Option<Crs> {
        match self.crs.as_ref()? {
            Value::String(definition) => definition.parse().ok(),
            Value::Number(code) => code.as_u64().and_then(|c| u32::try_from(c).ok()).map(Crs::Epsg),
            value @ Value::Object(object) => {
                let id = object.get("id");
                let authority = id.and_then(|id| id.get("authority")).and_then(Value::as_str);
                let code = id.and_then(|id| id.get("code")).and_then(Value::as_u64);
                match (authority, code) {
                    (Some(authority), Some(code)) if authority.eq_ignore_ascii_case("epsg") => {
                        u32::try_from(code).ok().map(Crs::Epsg)
                    }
                    _ => Some(Crs::Other(value.to_string())),
                }
            }
            _ => None,
        }
    }
}

impl TryFrom<&Field> for ArrayMetadata {
    type Error = EcoError;

    fn try_from(value: &Field) -> Result<Self, Self::Error> {
        if let Some(ext_meta) = value.metadata().get(EXTENSION_METADATA_KEY) {
            Ok(serde_json::from_str(ext_meta)?)
        } else {
            Ok(Default::default())
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn crs_from_authority_string() {
        let metadata: ArrayMetadata = serde_json::from_str(r#"{"crs": "EPSG:3857"}"#).unwrap();
        assert_eq!(metadata.crs(), Some(Crs::Epsg(3857)));
    }

    #[test]
    fn crs_from_projjson() {
        let metadata = ArrayMetadata {
            crs: Some(json!({"type": "GeographicCRS", "id": {"authority": "EPSG", "code": 4326}})),
        };
        assert_eq!(metadata.crs(), Some(Crs::Epsg(4326)));

        let metadata = ArrayMetadata {
            crs: Some(json!({"type": "ProjectedCRS", "name": "custom"})),
        };
        assert!(matches!(metadata.crs(), Some(Crs::Other(_))));
    }

    #[test]
    fn empty_metadata_is_not_serialized() {
        let metadata = ArrayMetadata::from_crs(None);
        assert!(!metadata.should_serialize());
        assert_eq!(serde_json::to_string(&metadata).unwrap(), "{}");
    }
}
