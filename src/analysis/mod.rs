//! Analysis inputs built on top of [`EcoDataFrame`](crate::EcoDataFrame).

pub mod geofence;

pub use geofence::{GeoCrossingProfile, GeoFence, Region};
