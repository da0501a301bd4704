//! Algorithms implemented on and returning [`GeoTable`][crate::table::GeoTable]s.

pub mod native;
pub mod reproject;
