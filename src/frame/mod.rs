//! Geo data frames that keep their concrete type through every derivation.
//!
//! [`GeoFrame`] is implemented by the base [`GeoTable`] and by every frame type layered on top
//! of it, such as [`EcoDataFrame`]. Implementors only provide the conversions to and from a
//! [`GeoTable`]; each derivation computes a new table and rebuilds the *implementing* type
//! through [`GeoFrame::from_table`], so an `EcoDataFrame` that is filtered, merged, dissolved or
//! reprojected is still an `EcoDataFrame`.
//!
//! ```
//! use arrow::compute::kernels::cmp::gt;
//! use arrow_array::Int64Array;
//! use ecoframe::frame::{Column, FrameOptions};
//! use ecoframe::{EcoDataFrame, GeoFrame};
//! use geo::point;
//!
//! let frame = EcoDataFrame::from_source(
//!     vec![
//!         ("id", Column::from(vec![1_i64, 2])),
//!         ("geometry", vec![point!(x: 0., y: 0.), point!(x: 1., y: 1.)].into()),
//!     ],
//!     FrameOptions::new().with_crs("epsg:4326".parse().unwrap()),
//! )
//! .unwrap();
//!
//! let mask = gt(frame.column("id").unwrap(), &Int64Array::new_scalar(1)).unwrap();
//! let filtered: EcoDataFrame = frame.filter(&mask).unwrap();
//! assert_eq!(filtered.len(), 1);
//! ```

mod eco;
mod options;
mod selection;

use std::ops::Range;
use std::path::Path;

use arrow_array::{ArrayRef, BooleanArray, RecordBatch, UInt32Array};
use arrow_schema::DataType;
use geo::Geometry;
use geojson::Feature;

pub use crate::array::Column;
pub use eco::EcoDataFrame;
pub use options::{FrameOptions, FrameSource};
pub use selection::{GeoSeries, PlotOptions, Plotter, Selection, Series};

use crate::algorithm::native::{
    AsType, Concatenate, Dissolve, Explode, Filter, Merge, MergeOptions, Project, Take,
};
use crate::algorithm::reproject::Reproject;
use crate::crs::{describe_crs, Crs};
use crate::error::{EcoError, Result};
use crate::io;
use crate::table::GeoTable;

pub trait GeoFrame: Sized {
    /// Rebuild a frame of this type around a derived table.
    fn from_table(table: GeoTable) -> Self;

    fn as_table(&self) -> &GeoTable;

    fn into_table(self) -> GeoTable;

    /// Build a frame from a table, column mapping, file path, feature list or record batch.
    ///
    /// `options.geometry` picks the active geometry column and `options.crs` replaces whatever
    /// CRS the source carried.
    fn from_source(source: impl Into<FrameSource>, options: FrameOptions) -> Result<Self> {
        let table = source.into().into_table()?;
        Ok(Self::from_table(options.apply(table)?))
    }

    /// Read a file, choosing the reader from the file extension.
    fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_table(io::read_file(path)?))
    }

    /// Build a frame from GeoJSON features. The result has no CRS.
    fn from_features(features: Vec<Feature>) -> Result<Self> {
        Ok(Self::from_table(io::geojson::features_to_table(features)?))
    }

    fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        io::write_file(self.as_table(), path)
    }

    fn to_record_batch(&self) -> Result<RecordBatch> {
        self.as_table().clone().into_record_batch()
    }

    fn len(&self) -> usize {
        self.as_table().len()
    }

    fn is_empty(&self) -> bool {
        self.as_table().is_empty()
    }

    fn crs(&self) -> Option<&Crs> {
        self.as_table().crs()
    }

    fn geometry_column_name(&self) -> Option<String> {
        self.as_table().geometry_column_name()
    }

    fn column_names(&self) -> Vec<String> {
        self.as_table().column_names()
    }

    fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.as_table().column(name)
    }

    fn geometry(&self) -> Result<Vec<Option<Geometry>>> {
        self.as_table().geometry()
    }

    /// Rows where `mask` is `true`.
    fn filter(&self, mask: &BooleanArray) -> Result<Self> {
        Ok(Self::from_table(Filter::filter(self.as_table(), mask)?))
    }

    /// A contiguous range of rows, clamped to the frame.
    fn slice(&self, range: Range<usize>) -> Result<Self> {
        Ok(Self::from_table(self.as_table().take_range(&range)?))
    }

    fn take(&self, indices: &UInt32Array) -> Result<Self> {
        Ok(Self::from_table(Take::take(self.as_table(), indices)?))
    }

    /// The named columns, in the given order.
    fn project(&self, columns: &[&str]) -> Result<Self> {
        Ok(Self::from_table(Project::project(self.as_table(), columns)?))
    }

    /// Join with another frame of any type. The result has the type of `self`.
    fn merge<R: GeoFrame>(&self, right: &R, options: &MergeOptions) -> Result<Self> {
        Ok(Self::from_table(Merge::merge(
            self.as_table(),
            right.as_table(),
            options,
        )?))
    }

    fn dissolve(&self, by: &[&str]) -> Result<Self> {
        Ok(Self::from_table(Dissolve::dissolve(self.as_table(), by)?))
    }

    fn explode(&self) -> Result<Self> {
        Ok(Self::from_table(Explode::explode(self.as_table())?))
    }

    fn astype(&self, data_type: &DataType) -> Result<Self> {
        Ok(Self::from_table(AsType::astype(self.as_table(), data_type)?))
    }

    fn astype_columns(&self, types: &[(&str, DataType)]) -> Result<Self> {
        Ok(Self::from_table(AsType::astype_columns(
            self.as_table(),
            types,
        )?))
    }

    /// Stack frames vertically.
    fn concat(frames: &[Self]) -> Result<Self> {
        let tables = frames
            .iter()
            .map(|frame| frame.as_table().clone())
            .collect::<Vec<_>>();
        Ok(Self::from_table(tables.as_slice().concatenate()?))
    }

    fn set_geometry(&self, name: &str) -> Result<Self> {
        Ok(Self::from_table(self.as_table().set_geometry(name)?))
    }

    /// Assign a CRS without transforming coordinates.
    ///
    /// Replacing a different, already-set CRS requires `allow_override`.
    fn set_crs(&self, crs: Crs, allow_override: bool) -> Result<Self> {
        let table = self.as_table();
        if let Some(current) = table.crs() {
            if *current != crs && !allow_override {
                return Err(EcoError::CrsMismatch {
                    left: describe_crs(Some(current)),
                    right: describe_crs(Some(&crs)),
                });
            }
        }
        Ok(Self::from_table(table.clone().with_crs(Some(crs))))
    }

    /// Transform the geometries to `target`. The frame must have a CRS.
    fn to_crs(&self, target: &Crs) -> Result<Self> {
        Ok(Self::from_table(Reproject::to_crs(self.as_table(), target)?))
    }

    /// Select a single column, tagged by whether it holds geometries.
    fn get(&self, name: &str) -> Result<Selection<Self>> {
        let table = self.as_table();
        let index = table.column_index(name)?;
        if table.is_geometry_column(index) {
            Ok(Selection::GeoSeries(GeoSeries::new(
                name,
                table.geometry_column(name)?,
                table.crs().cloned(),
            )))
        } else {
            Ok(Selection::Series(Series::new(
                name,
                table.batch().column(index).clone(),
            )))
        }
    }

    /// Select several columns. A selection containing a geometry column stays a frame of this
    /// type; one without geometries becomes a plain record batch.
    fn select(&self, columns: &[&str]) -> Result<Selection<Self>> {
        let table = self.as_table();
        let projected = Project::project(table, columns)?;
        let geometry_columns = projected.geometry_column_indices();
        if geometry_columns.is_empty() {
            return Ok(Selection::Frame(projected.batch().clone()));
        }
        let projected = match projected.geometry_column_index() {
            Some(_) => projected,
            None => {
                let name = projected.schema().field(geometry_columns[0]).name().clone();
                projected.set_geometry(&name)?
            }
        };
        Ok(Selection::GeoFrame(Self::from_table(projected)))
    }
}

impl GeoFrame for GeoTable {
    fn from_table(table: GeoTable) -> Self {
        table
    }

    fn as_table(&self) -> &GeoTable {
        self
    }

    fn into_table(self) -> GeoTable {
        self
    }
}
