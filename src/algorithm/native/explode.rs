use std::sync::Arc;

use arrow_array::UInt32Array;
use geo::Geometry;

use crate::algorithm::native::Take;
use crate::array::to_wkb_array;
use crate::error::{EcoError, Result};
use crate::table::GeoTable;

pub trait Explode {
    type Output;

    /// Split multi-part geometries of the active geometry column into one row per part,
    /// repeating the attribute values of the source row.
    fn explode(&self) -> Self::Output;
}

/// The single-part pieces of a geometry. Null and single-part geometries map to themselves, as
/// do multi-part geometries without any parts.
fn geometry_parts(geometry: Option<Geometry>) -> Vec<Option<Geometry>> {
    let parts: Vec<Geometry> = match geometry {
        None => return vec![None],
        Some(Geometry::MultiPoint(geom)) if !geom.0.is_empty() => {
            geom.0.into_iter().map(Geometry::Point).collect()
        }
        Some(Geometry::MultiLineString(geom)) if !geom.0.is_empty() => {
            geom.0.into_iter().map(Geometry::LineString).collect()
        }
        Some(Geometry::MultiPolygon(geom)) if !geom.0.is_empty() => {
            geom.0.into_iter().map(Geometry::Polygon).collect()
        }
        Some(Geometry::GeometryCollection(geom)) if !geom.0.is_empty() => geom.0,
        Some(geom) => vec![geom],
    };
    parts.into_iter().map(Some).collect()
}

impl Explode for GeoTable {
    type Output = Result<GeoTable>;

    fn explode(&self) -> Self::Output {
        let geometry_column_index = self
            .geometry_column_index()
            .ok_or(EcoError::NoGeometryColumn)?;

        let mut take_indices = Vec::with_capacity(self.len());
        let mut exploded = Vec::with_capacity(self.len());
        for (row, geometry) in self.geometry()?.into_iter().enumerate() {
            for part in geometry_parts(geometry) {
                take_indices.push(row as u32);
                exploded.push(part);
            }
        }

        let table = self.take(&UInt32Array::from(take_indices))?;
        let geometry_array = to_wkb_array(exploded.iter().map(Option::as_ref))?;
        table.replace_column(geometry_column_index, Arc::new(geometry_array))
    }
}

#[cfg(test)]
mod test {
    use arrow_array::cast::AsArray;
    use arrow_array::types::Int64Type;
    use geo::Point;

    use super::*;
    use crate::test::fixtures;

    #[test]
    fn explode_multi_point() {
        let table = fixtures::multipoint_table();
        let out = table.explode().unwrap();
        assert_eq!(out.len(), 3);

        let geometry = out.geometry().unwrap();
        assert_eq!(geometry[0], Some(Point::new(0., 0.).into()));
        assert_eq!(geometry[1], Some(Point::new(1., 1.).into()));
        assert_eq!(geometry[2], Some(Point::new(5., 5.).into()));

        let a = out.column("a").unwrap().as_primitive::<Int64Type>();
        assert_eq!(a.values().to_vec(), vec![1, 1, 2]);
    }

    #[test]
    fn explode_single_parts_is_identity() {
        let table = fixtures::point_table();
        let out = table.explode().unwrap();
        assert_eq!(out.len(), table.len());
        assert_eq!(out.geometry().unwrap(), table.geometry().unwrap());
    }

    #[test]
    fn explode_requires_geometry() {
        let table = fixtures::merge_left();
        assert!(matches!(table.explode(), Err(EcoError::NoGeometryColumn)));
    }
}
