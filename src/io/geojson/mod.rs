//! Read from and write to [GeoJSON](https://geojson.org/) files.

pub use reader::{features_to_table, read_geojson};
pub use writer::{table_to_features, write_geojson};

mod reader;
mod writer;
