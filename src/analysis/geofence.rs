//! Virtual fences and the regions they separate.

use geo::Geometry;
use indexmap::IndexMap;

use crate::array::Column;
use crate::crs::WGS84;
use crate::error::Result;
use crate::frame::{EcoDataFrame, FrameOptions, GeoFrame};

/// An area used to tell which side of a fence a subject is on.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub geometry: Geometry,
    pub unique_id: Option<String>,
    pub region_name: Option<String>,
}

impl Region {
    pub fn new(geometry: impl Into<Geometry>) -> Self {
        Self {
            geometry: geometry.into(),
            unique_id: None,
            region_name: None,
        }
    }

    pub fn with_unique_id(self, unique_id: impl Into<String>) -> Self {
        Self {
            unique_id: Some(unique_id.into()),
            ..self
        }
    }

    pub fn with_region_name(self, region_name: impl Into<String>) -> Self {
        Self {
            region_name: Some(region_name.into()),
            ..self
        }
    }
}

/// A virtual fence boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFence {
    pub geometry: Geometry,
    pub unique_id: Option<String>,
    pub fence_name: Option<String>,
    pub warn_level: Option<String>,
}

impl GeoFence {
    pub fn new(geometry: impl Into<Geometry>) -> Self {
        Self {
            geometry: geometry.into(),
            unique_id: None,
            fence_name: None,
            warn_level: None,
        }
    }

    pub fn with_unique_id(self, unique_id: impl Into<String>) -> Self {
        Self {
            unique_id: Some(unique_id.into()),
            ..self
        }
    }

    pub fn with_fence_name(self, fence_name: impl Into<String>) -> Self {
        Self {
            fence_name: Some(fence_name.into()),
            ..self
        }
    }

    pub fn with_warn_level(self, warn_level: impl Into<String>) -> Self {
        Self {
            warn_level: Some(warn_level.into()),
            ..self
        }
    }
}

/// The fences and regions of one crossing analysis. Geometries are in EPSG:4326.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoCrossingProfile {
    pub geofences: Vec<GeoFence>,
    pub regions: Vec<Region>,
}

fn text_column<'a>(values: impl Iterator<Item = &'a Option<String>>) -> Column {
    values.cloned().collect::<Vec<_>>().into()
}

impl GeoCrossingProfile {
    pub fn new(geofences: Vec<GeoFence>, regions: Vec<Region>) -> Self {
        Self { geofences, regions }
    }

    /// One row per fence: `geometry`, `unique_id`, `fence_name`, `warn_level`.
    pub fn geofence_frame(&self) -> Result<EcoDataFrame> {
        let mut columns: IndexMap<String, Column> = IndexMap::new();
        columns.insert(
            "geometry".to_string(),
            self.geofences
                .iter()
                .map(|fence| fence.geometry.clone())
                .collect::<Vec<_>>()
                .into(),
        );
        columns.insert(
            "unique_id".to_string(),
            text_column(self.geofences.iter().map(|fence| &fence.unique_id)),
        );
        columns.insert(
            "fence_name".to_string(),
            text_column(self.geofences.iter().map(|fence| &fence.fence_name)),
        );
        columns.insert(
            "warn_level".to_string(),
            text_column(self.geofences.iter().map(|fence| &fence.warn_level)),
        );
        EcoDataFrame::from_source(columns, FrameOptions::new().with_crs(WGS84))
    }

    /// One row per region: `geometry`, `unique_id`, `region_name`.
    pub fn region_frame(&self) -> Result<EcoDataFrame> {
        let mut columns: IndexMap<String, Column> = IndexMap::new();
        columns.insert(
            "geometry".to_string(),
            self.regions
                .iter()
                .map(|region| region.geometry.clone())
                .collect::<Vec<_>>()
                .into(),
        );
        columns.insert(
            "unique_id".to_string(),
            text_column(self.regions.iter().map(|region| &region.unique_id)),
        );
        columns.insert(
            "region_name".to_string(),
            text_column(self.regions.iter().map(|region| &region.region_name)),
        );
        EcoDataFrame::from_source(columns, FrameOptions::new().with_crs(WGS84))
    }
}

#[cfg(test)]
mod test {
    use arrow_array::cast::AsArray;
    use arrow_array::Array;
    use geo::line_string;

    use super::*;
    use crate::test::fixtures;

    fn profile() -> GeoCrossingProfile {
        GeoCrossingProfile::new(
            vec![
                GeoFence::new(line_string![(x: 0., y: -1.), (x: 0., y: 1.)])
                    .with_unique_id("f1")
                    .with_fence_name("river")
                    .with_warn_level("high"),
                GeoFence::new(line_string![(x: 1., y: -1.), (x: 1., y: 1.)]).with_unique_id("f2"),
            ],
            vec![
                Region::new(fixtures::bbox(-1., -1., 0., 1.))
                    .with_unique_id("west")
                    .with_region_name("West bank"),
                Region::new(fixtures::bbox(0., -1., 1., 1.)).with_unique_id("east"),
            ],
        )
    }

    #[test]
    fn geofence_frame() {
        let frame = profile().geofence_frame().unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.crs(), Some(&WGS84));
        assert_eq!(
            frame.column_names(),
            vec!["geometry", "unique_id", "fence_name", "warn_level"]
        );
        let warn = frame.column("warn_level").unwrap().as_string::<i32>();
        assert_eq!(warn.value(0), "high");
        assert!(warn.is_null(1));
    }

    #[test]
    fn region_frame() {
        let frame = profile().region_frame().unwrap();
        assert_eq!(frame.geometry_column_name().as_deref(), Some("geometry"));
        let names = frame.column("region_name").unwrap().as_string::<i32>();
        assert_eq!(names.value(0), "West bank");

        // Frames built from a profile keep working as EcoDataFrames.
        let east = frame.slice(1..2).unwrap();
        assert_eq!(east.len(), 1);
    }

    #[test]
    fn empty_profile() {
        let frame = GeoCrossingProfile::default().region_frame().unwrap();
        assert!(frame.is_empty());
    }
}
