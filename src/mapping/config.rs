use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Canvas settings for an [`EcoMap`](crate::mapping::EcoMap).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use ecoframe::mapping::MapConfig;
///
/// let config = MapConfig::from_json(r#"{"width": 400}"#).unwrap();
/// assert_eq!(config.width, 400);
/// assert_eq!(config.height, 600);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Margin kept free around the data, in pixels.
    pub padding: u32,
    /// Background color, with or without a leading `#`.
    pub background: String,
    /// A static map has no neatline around the data extent.
    #[serde(rename = "static")]
    pub static_map: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            padding: 20,
            background: "#FFFFFF".to_string(),
            static_map: false,
        }
    }
}

impl MapConfig {
    pub fn from_json(value: &str) -> Result<Self> {
        Ok(serde_json::from_str(value)?)
    }

    pub fn static_map(self) -> Self {
        Self {
            static_map: true,
            ..self
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = MapConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert!(!config.static_map);
        assert_eq!(MapConfig::from_json("{}").unwrap(), config);
    }

    #[test]
    fn static_flag() {
        let config = MapConfig::from_json(r#"{"static": true, "background": "000000"}"#).unwrap();
        assert!(config.static_map);
        assert_eq!(config.background, "000000");
        assert!(MapConfig::from_json(r#"{"width": "wide"}"#).is_err());
    }
}
