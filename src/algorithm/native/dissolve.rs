use std::collections::BTreeMap;
use std::sync::Arc;

use arrow::row::{OwnedRow, RowConverter, SortField};
use arrow_array::{Array, ArrayRef, UInt32Array};
use geo::{
    BooleanOps, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

use crate::algorithm::native::{Project, Take};
use crate::array::to_wkb_array;
use crate::error::{EcoError, Result};
use crate::table::GeoTable;

pub trait Dissolve {
    type Output;

    /// Group rows by the values of `by` and merge the geometries of each group.
    ///
    /// Groups are emitted in ascending key order and rows with a null key are dropped. The
    /// output holds the `by` columns, then the merged geometry, then the first value of every
    /// other column in the group. With an empty `by`, every row forms a single group.
    fn dissolve(&self, by: &[&str]) -> Self::Output;
}

/// Merge the geometries of one group.
///
/// Polygonal groups are unioned. Points are deduplicated and lines are collected, without any
/// noding. Mixed groups become a collection of their parts.
fn union_geometries(geometries: Vec<Geometry>) -> Option<Geometry> {
    let mut polygons: Vec<Polygon> = Vec::new();
    let mut points: Vec<Point> = Vec::new();
    let mut lines: Vec<LineString> = Vec::new();
    let mut others: Vec<Geometry> = Vec::new();

    for geometry in geometries {
        match geometry {
            Geometry::Polygon(geom) => polygons.push(geom),
            Geometry::MultiPolygon(geom) => polygons.extend(geom.0),
            Geometry::Rect(geom) => polygons.push(geom.to_polygon()),
            Geometry::Triangle(geom) => polygons.push(geom.to_polygon()),
            Geometry::Point(geom) => points.push(geom),
            Geometry::MultiPoint(geom) => points.extend(geom.0),
            Geometry::Line(geom) => lines.push(geom.into()),
            Geometry::LineString(geom) => lines.push(geom),
            Geometry::MultiLineString(geom) => lines.extend(geom.0),
            Geometry::GeometryCollection(geom) => others.extend(geom.0),
        }
    }

    let mut parts: Vec<Geometry> = Vec::new();
    if !polygons.is_empty() {
        let unioned = polygons
            .into_iter()
            .fold(MultiPolygon::new(vec![]), |acc, polygon| {
                acc.union(&MultiPolygon::new(vec![polygon]))
            });
        parts.push(match unioned.0.len() {
            1 => Geometry::Polygon(unioned.0.into_iter().next()?),
            _ => Geometry::MultiPolygon(unioned),
        });
    }
    if !lines.is_empty() {
        parts.push(match lines.len() {
            1 => Geometry::LineString(lines.into_iter().next()?),
            _ => Geometry::MultiLineString(MultiLineString::new(lines)),
        });
    }
    if !points.is_empty() {
        let mut unique: Vec<Point> = Vec::with_capacity(points.len());
        for point in points {
            if !unique.contains(&point) {
                unique.push(point);
            }
        }
        parts.push(match unique.len() {
            1 => Geometry::Point(unique[0]),
            _ => Geometry::MultiPoint(MultiPoint::new(unique)),
        });
    }
    parts.extend(others);

    match parts.len() {
        0 => None,
        1 => parts.into_iter().next(),
        _ => Some(Geometry::GeometryCollection(GeometryCollection::new_from(
            parts,
        ))),
    }
}

impl Dissolve for GeoTable {
    type Output = Result<GeoTable>;

    fn dissolve(&self, by: &[&str]) -> Self::Output {
        let geometry_column_index = self
            .geometry_column_index()
            .ok_or(EcoError::NoGeometryColumn)?;
        let geometry = self.geometry()?;

        let mut groups: BTreeMap<Option<OwnedRow>, Vec<u32>> = BTreeMap::new();
        if by.is_empty() {
            if !self.is_empty() {
                groups.insert(None, (0..self.len() as u32).collect());
            }
        } else {
            let keys = by
                .iter()
                .map(|name| Ok(self.column(name)?.clone()))
                .collect::<Result<Vec<ArrayRef>>>()?;
            let converter = RowConverter::new(
                keys.iter()
                    .map(|key| SortField::new(key.data_type().clone()))
                    .collect(),
            )?;
            let rows = converter.convert_columns(&keys)?;
            for row in 0..self.len() {
                if keys.iter().any(|key| key.is_null(row)) {
                    continue;
                }
                groups
                    .entry(Some(rows.row(row).owned()))
                    .or_default()
                    .push(row as u32);
            }
        }

        let first_rows = groups
            .values()
            .map(|rows| rows[0])
            .collect::<Vec<_>>();
        let merged = groups
            .values()
            .map(|rows| {
                let members = rows
                    .iter()
                    .filter_map(|row| geometry[*row as usize].clone())
                    .collect();
                union_geometries(members)
            })
            .collect::<Vec<_>>();

        let firsts = self.take(&UInt32Array::from(first_rows))?;
        let firsts = firsts.replace_column(
            geometry_column_index,
            Arc::new(to_wkb_array(merged.iter().map(Option::as_ref))?),
        )?;

        // Reorder: grouping keys, geometry, everything else.
        let geometry_name = self.geometry_column_name();
        let mut order: Vec<&str> = by.to_vec();
        if let Some(name) = geometry_name.as_deref() {
            order.push(name);
        }
        let names = self.column_names();
        for name in names.iter() {
            if !order.contains(&name.as_str()) {
                order.push(name);
            }
        }
        firsts.project(&order)
    }
}
