//! Coordinate reference system identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EcoError, Result};

/// WGS 84 geographic coordinates, the CRS of every GeoJSON file.
pub const WGS84: Crs = Crs::Epsg(4326);

/// Spherical ("web") mercator.
pub const WEB_MERCATOR: Crs = Crs::Epsg(3857);

/// A coordinate reference system attached to a frame.
///
/// Authority codes are parsed case-insensitively, so `"epsg:4326"`, `"EPSG:4326"`,
/// `"4326"` and `"urn:ogc:def:crs:EPSG::4326"` all describe the same CRS. Anything
/// that is not recognized as an EPSG code is kept verbatim as an opaque definition
/// (for example a PROJ string or WKT) and only compared textually.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Crs {
    /// A code in the EPSG registry.
    Epsg(u32),
    /// Any other user-supplied definition.
    Other(String),
}

impl Crs {
    /// The EPSG code of this CRS, if it has one.
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Crs::Epsg(code) => Some(*code),
            Crs::Other(_) => None,
        }
    }
}

/// Render an optional CRS for messages.
pub(crate) fn describe_crs(crs: Option<&Crs>) -> String {
    crs.map(Crs::to_string).unwrap_or_else(|| "None".to_string())
}

fn parse_epsg(value: &str) -> Option<u32> {
    let lower = value.to_ascii_lowercase();
    if lower == "ogc:crs84" || lower == "urn:ogc:def:crs:ogc:1.3:crs84" {
        return Some(4326);
    }
    let code = lower
        .strip_prefix("epsg:")
        .or_else(|| lower.strip_prefix("urn:ogc:def:crs:epsg::"))
        .unwrap_or(&lower);
    code.parse().ok()
}

impl FromStr for Crs {
    type Err = EcoError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        if value.is_empty() {
            return Err(EcoError::IncorrectType("empty CRS definition".into()));
        }
        Ok(parse_epsg(value)
            .map(Crs::Epsg)
            .unwrap_or_else(|| Crs::Other(value.to_string())))
    }
}

impl TryFrom<String> for Crs {
    type Error = EcoError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl TryFrom<&str> for Crs {
    type Error = EcoError;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl From<u32> for Crs {
    fn from(value: u32) -> Self {
        Crs::Epsg(value)
    }
}

impl From<Crs> for String {
    fn from(value: Crs) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Epsg(code) => write!(f, "EPSG:{code}"),
            Crs::Other(definition) => f.write_str(definition),
        }
    }
}

impl PartialEq<str> for Crs {
    fn eq(&self, other: &str) -> bool {
        other.parse::<Crs>().is_ok_and(|other| *self == other)
    }
}

impl PartialEq<&str> for Crs {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
