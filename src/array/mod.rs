//! Column values used to build frames, and the WKB storage of geometry columns.

pub use metadata::ArrayMetadata;
pub use wkb::{from_wkb_array, geometry_field, is_geometry_field, to_wkb_array};

pub mod metadata;
pub mod wkb;

use std::sync::Arc;

use arrow_array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use geo::{Geometry, LineString, MultiPolygon, Point, Polygon};

/// The values of one column of a frame under construction.
///
/// Attribute columns are plain Arrow arrays. Geometry columns are held as `geo` geometries and
/// encoded to WKB when the frame is built.
#[derive(Debug, Clone)]
pub enum Column {
    Values(ArrayRef),
    Geometry(Vec<Option<Geometry>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Values(array) => array.len(),
            Column::Geometry(geometries) => geometries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_geometry(&self) -> bool {
        matches!(self, Column::Geometry(_))
    }
}

impl From<ArrayRef> for Column {
    fn from(value: ArrayRef) -> Self {
        Column::Values(value)
    }
}

macro_rules! impl_from_values {
    ($native:ty, $array:ty) => {
        impl From<Vec<$native>> for Column {
            fn from(value: Vec<$native>) -> Self {
                Column::Values(Arc::new(<$array>::from(value)))
            }
        }

        impl From<Vec<Option<$native>>> for Column {
            fn from(value: Vec<Option<$native>>) -> Self {
                Column::Values(Arc::new(<$array>::from(value)))
            }
        }
    };
}

impl_from_values!(i64, Int64Array);
impl_from_values!(f64, Float64Array);
impl_from_values!(bool, BooleanArray);
impl_from_values!(&str, StringArray);
impl_from_values!(String, StringArray);

macro_rules! impl_from_geometries {
    ($geom:ty) => {
        impl From<Vec<$geom>> for Column {
            fn from(value: Vec<$geom>) -> Self {
                Column::Geometry(value.into_iter().map(|geom| Some(geom.into())).collect())
            }
        }
    };
}

impl_from_geometries!(Geometry);
impl_from_geometries!(Point);
impl_from_geometries!(LineString);
impl_from_geometries!(Polygon);
impl_from_geometries!(MultiPolygon);

impl From<Vec<Option<Geometry>>> for Column {
    fn from(value: Vec<Option<Geometry>>) -> Self {
        Column::Geometry(value)
    }
}
