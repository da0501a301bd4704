use std::collections::BTreeMap;

use arrow_array::{ArrayRef, RecordBatch};
use geo::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crs::Crs;
use crate::error::Result;
use crate::frame::GeoFrame;

/// A single attribute column taken out of a frame.
#[derive(Debug, Clone)]
pub struct Series {
    name: String,
    values: ArrayRef,
}

impl Series {
    pub fn new(name: impl Into<String>, values: ArrayRef) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &ArrayRef {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A geometry column taken out of a frame, together with the frame's CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoSeries {
    name: String,
    geometries: Vec<Option<Geometry>>,
    crs: Option<Crs>,
}

impl GeoSeries {
    pub fn new(name: impl Into<String>, geometries: Vec<Option<Geometry>>, crs: Option<Crs>) -> Self {
        Self {
            name: name.into(),
            geometries,
            crs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometries(&self) -> &[Option<Geometry>] {
        &self.geometries
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}

/// The result of selecting columns from a frame of type `F`.
#[derive(Debug, Clone)]
pub enum Selection<F> {
    Series(Series),
    GeoSeries(GeoSeries),
    /// Several columns, none of them geometries.
    Frame(RecordBatch),
    /// Several columns including at least one geometry column.
    GeoFrame(F),
}

impl<F: GeoFrame> Selection<F> {
    /// Route the selection to the plotting routine for its kind.
    pub fn plot<P: Plotter>(&self, plotter: &mut P, options: &PlotOptions) -> Result<P::Output> {
        match self {
            Selection::Series(series) => plotter.plot_series(series, options),
            Selection::GeoSeries(series) => plotter.plot_geoseries(series, options),
            Selection::Frame(batch) => plotter.plot_frame(batch, options),
            Selection::GeoFrame(frame) => plotter.plot_geoframe(frame, options),
        }
    }

    pub fn is_geo(&self) -> bool {
        matches!(self, Selection::GeoSeries(_) | Selection::GeoFrame(_))
    }
}

/// A backend that can draw each kind of selection.
pub trait Plotter {
    type Output;

    fn plot_series(&mut self, series: &Series, options: &PlotOptions) -> Result<Self::Output>;

    fn plot_geoseries(&mut self, series: &GeoSeries, options: &PlotOptions) -> Result<Self::Output>;

    fn plot_frame(&mut self, batch: &RecordBatch, options: &PlotOptions) -> Result<Self::Output>;

    fn plot_geoframe<F: GeoFrame>(
        &mut self,
        frame: &F,
        options: &PlotOptions,
    ) -> Result<Self::Output>;
}

/// Free-form keyword options passed through to a [`Plotter`] unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotOptions(BTreeMap<String, Value>);

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod test {
    use arrow_array::cast::AsArray;
    use arrow_array::types::Int64Type;

    use super::*;
    use crate::frame::EcoDataFrame;
    use crate::test::fixtures;

    #[derive(Debug, PartialEq)]
    enum Call {
        Series(String),
        GeoSeries(String),
        Frame(usize),
        GeoFrame(usize),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Call, PlotOptions)>,
        receiver: Option<usize>,
    }

    impl Plotter for Recorder {
        type Output = ();

        fn plot_series(&mut self, series: &Series, options: &PlotOptions) -> Result<()> {
            self.calls
                .push((Call::Series(series.name().to_string()), options.clone()));
            Ok(())
        }

        fn plot_geoseries(&mut self, series: &GeoSeries, options: &PlotOptions) -> Result<()> {
            self.calls
                .push((Call::GeoSeries(series.name().to_string()), options.clone()));
            Ok(())
        }

        fn plot_frame(&mut self, batch: &RecordBatch, options: &PlotOptions) -> Result<()> {
            self.calls
                .push((Call::Frame(batch.num_columns()), options.clone()));
            Ok(())
        }

        fn plot_geoframe<F: GeoFrame>(&mut self, frame: &F, options: &PlotOptions) -> Result<()> {
            self.receiver = Some(frame as *const F as usize);
            self.calls
                .push((Call::GeoFrame(frame.len()), options.clone()));
            Ok(())
        }
    }

    fn frame() -> EcoDataFrame {
        EcoDataFrame::from_table(fixtures::box_table())
    }

    #[test]
    fn get_attribute_column() {
        let selection = frame().get("id").unwrap();
        let Selection::Series(series) = &selection else {
            panic!("expected a series");
        };
        assert_eq!(
            series.values().as_primitive::<Int64Type>().values().to_vec(),
            vec![1, 2]
        );
        assert!(!selection.is_geo());
    }

    #[test]
    fn get_geometry_column() {
        let selection = frame().get("other_geometry").unwrap();
        let Selection::GeoSeries(series) = selection else {
            panic!("expected a geo series");
        };
        assert_eq!(series.len(), 2);
        assert_eq!(series.crs(), Some(&Crs::Epsg(4326)));
    }

    #[test]
    fn select_without_geometry_is_plain() {
        let selection = frame().select(&["id"]).unwrap();
        assert!(matches!(selection, Selection::Frame(ref batch) if batch.num_columns() == 1));
    }

    #[test]
    fn select_with_inactive_geometry() {
        let selection = frame().select(&["id", "other_geometry"]).unwrap();
        let Selection::GeoFrame(selected) = selection else {
            panic!("expected a geo frame");
        };
        assert_eq!(
            selected.geometry_column_name().as_deref(),
            Some("other_geometry")
        );
    }

    #[test]
    fn plot_dispatch() {
        let frame = frame();
        let options = PlotOptions::new().with("column", "id").with("alpha", 0.5);
        let mut recorder = Recorder::default();

        frame.get("id").unwrap().plot(&mut recorder, &options).unwrap();
        frame
            .get("my_geometry")
            .unwrap()
            .plot(&mut recorder, &options)
            .unwrap();
        frame
            .select(&["id"])
            .unwrap()
            .plot(&mut recorder, &options)
            .unwrap();

        let selection = frame.select(&["id", "my_geometry"]).unwrap();
        selection.plot(&mut recorder, &options).unwrap();
        let Selection::GeoFrame(selected) = &selection else {
            panic!("expected a geo frame");
        };
        assert_eq!(
            recorder.receiver,
            Some(selected as *const EcoDataFrame as usize)
        );

        let calls = recorder
            .calls
            .iter()
            .map(|(call, _)| call)
            .collect::<Vec<_>>();
        assert_eq!(
            calls,
            vec![
                &Call::Series("id".to_string()),
                &Call::GeoSeries("my_geometry".to_string()),
                &Call::Frame(1),
                &Call::GeoFrame(2),
            ]
        );
        assert!(recorder.calls.iter().all(|(_, passed)| passed == &options));
        assert_eq!(options.get_str("column"), Some("id"));
        assert_eq!(options.get_f64("alpha"), Some(0.5));
    }
}
