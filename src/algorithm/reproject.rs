//! Reproject geometry columns between coordinate reference systems.
//!
//! Conversions between WGS 84 (EPSG:4326) and web mercator (EPSG:3857) are computed directly.
//! With the `proj` feature enabled, every other pair is handed to PROJ.

use std::sync::Arc;

use geo::{Coord, Geometry, MapCoords};
#[cfg(feature = "proj")]
use proj::{Proj, Transform};
use tracing::debug;

use crate::array::{from_wkb_array, to_wkb_array};
use crate::crs::{Crs, WEB_MERCATOR, WGS84};
use crate::error::{EcoError, Result};
use crate::table::GeoTable;

/// Semi-major axis of the WGS 84 ellipsoid, in metres.
const EARTH_RADIUS: f64 = 6_378_137.0;

fn lon_lat_to_mercator(coord: Coord) -> Coord {
    Coord {
        x: EARTH_RADIUS * coord.x.to_radians(),
        y: EARTH_RADIUS * (std::f64::consts::FRAC_PI_4 + coord.y.to_radians() / 2.0).tan().ln(),
    }
}

fn mercator_to_lon_lat(coord: Coord) -> Coord {
    Coord {
        x: (coord.x / EARTH_RADIUS).to_degrees(),
        y: (2.0 * (coord.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees(),
    }
}

/// A resolved transformation between two CRS.
pub enum Transformer {
    Identity,
    ToWebMercator,
    FromWebMercator,
    #[cfg(feature = "proj")]
    Proj(Proj),
}

impl Transformer {
    pub fn new(from: &Crs, to: &Crs) -> Result<Self> {
        if from == to {
            return Ok(Transformer::Identity);
        }
        if *from == WGS84 && *to == WEB_MERCATOR {
            return Ok(Transformer::ToWebMercator);
        }
        if *from == WEB_MERCATOR && *to == WGS84 {
            return Ok(Transformer::FromWebMercator);
        }
        Self::external(from, to)
    }

    #[cfg(feature = "proj")]
    fn external(from: &Crs, to: &Crs) -> Result<Self> {
        let proj = Proj::new_known_crs(&from.to_string(), &to.to_string(), None)?;
        Ok(Transformer::Proj(proj))
    }

    #[cfg(not(feature = "proj"))]
    fn external(from: &Crs, to: &Crs) -> Result<Self> {
        Err(EcoError::UnsupportedTransform {
            from: from.clone(),
            to: to.clone(),
        })
    }

    pub fn transform(&self, geometry: &Geometry) -> Result<Geometry> {
        match self {
            Transformer::Identity => Ok(geometry.clone()),
            Transformer::ToWebMercator => Ok(geometry.map_coords(lon_lat_to_mercator)),
            Transformer::FromWebMercator => Ok(geometry.map_coords(mercator_to_lon_lat)),
            #[cfg(feature = "proj")]
            Transformer::Proj(proj) => {
                let mut geometry = geometry.clone();
                geometry.transform(proj)?;
                Ok(geometry)
            }
        }
    }
}

pub trait Reproject {
    type Output;

    /// Transform every geometry column to `target` and tag the result with it.
    fn to_crs(&self, target: &Crs) -> Self::Output;
}

impl Reproject for GeoTable {
    type Output = Result<GeoTable>;

    fn to_crs(&self, target: &Crs) -> Self::Output {
        if self.geometry_column_index().is_none() {
            return Err(EcoError::NoGeometryColumn);
        }
        let source = self.crs().ok_or(EcoError::UndefinedCrs)?;
        let transformer = Transformer::new(source, target)?;
        debug!(%source, %target, rows = self.len(), "reprojecting frame");

        let mut table = self.clone();
        for index in self.geometry_column_indices() {
            let geometries = from_wkb_array(self.batch().column(index).as_ref())?
                .iter()
                .map(|maybe_geom| {
                    maybe_geom
                        .as_ref()
                        .map(|geom| transformer.transform(geom))
                        .transpose()
                })
                .collect::<Result<Vec<_>>>()?;
            let array = to_wkb_array(geometries.iter().map(Option::as_ref))?;
            table = table.replace_column(index, Arc::new(array))?;
        }
        Ok(table.with_crs(Some(target.clone())))
    }
}
