//! Static maps of frames, rendered to PNG.
//!
//! Frames are drawn in web mercator after being brought to EPSG:4326, the same way a slippy map
//! would show them. Each [`EcoMap`] holds a stack of layers and an optional legend.

mod config;
mod map;
mod style;

pub use config::MapConfig;
pub use map::{Corner, EcoMap};
pub use style::{LayerStyle, Rgba};
