//! Geospatial data frames backed by Arrow that keep their concrete type through every table
//! operation.
//!
//! The [`GeoFrame`] trait carries all derivations (filtering, slicing, projection, merge,
//! dissolve, explode, cast, concat, reprojection) and rebuilds the implementing type from each
//! result, so an [`EcoDataFrame`] stays an [`EcoDataFrame`]. Frames are read from and written to
//! GeoJSON by [`io`] and drawn to PNG by [`mapping`].

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub use crs::Crs;
pub use error::{EcoError, Result};
pub use frame::{EcoDataFrame, GeoFrame};
pub use table::GeoTable;

pub mod algorithm;
pub mod analysis;
pub mod array;
pub mod crs;
pub mod error;
pub mod frame;
pub mod io;
pub mod mapping;
pub mod table;
