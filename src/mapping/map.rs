use std::path::Path;
use std::str::FromStr;

use arrow_array::RecordBatch;
use geo::{
    BoundingRect, Coord, Geometry, HasDimensions, LineString, Polygon, Rect, Simplify,
};
use tiny_skia::{FillRule, Path as SkPath, PathBuilder, Pixmap, Stroke, Transform};
use tracing::{debug, trace};

use crate::algorithm::reproject::Transformer;
use crate::array::Column;
use crate::crs::{WEB_MERCATOR, WGS84};
use crate::error::{EcoError, Result};
use crate::frame::{GeoFrame, GeoSeries, PlotOptions, Plotter, Series};
use crate::mapping::{LayerStyle, MapConfig, Rgba};
use crate::table::{GeoTable, DEFAULT_GEOMETRY_COLUMN};

const LEGEND_SWATCH: f32 = 12.0;
const LEGEND_GAP: f32 = 6.0;
const NORTH_ARROW_SIZE: f32 = 100.0;
const NORTH_ARROW_MARGIN: f32 = 10.0;
/// Arrow outline in a unit box, y pointing down: tip, right barb, notch, left barb.
const NORTH_ARROW_SHAPE: [(f32, f32); 4] = [(0.5, 0.05), (0.8, 0.9), (0.5, 0.7), (0.2, 0.9)];

#[derive(Debug, Clone)]
struct Layer {
    /// Geometries in web mercator.
    geometries: Vec<Geometry>,
    style: LayerStyle,
}

/// Map corner an overlay is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Corner {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl FromStr for Corner {
    type Err = EcoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "topleft" => Ok(Corner::TopLeft),
            "topright" => Ok(Corner::TopRight),
            "bottomleft" => Ok(Corner::BottomLeft),
            "bottomright" => Ok(Corner::BottomRight),
            _ => Err(EcoError::IncorrectType(
                format!("unknown map corner '{s}'").into(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct NorthArrow {
    corner: Corner,
    scale: f32,
}

/// A static map made of frame layers and a legend.
#[derive(Debug, Clone)]
pub struct EcoMap {
    config: MapConfig,
    background: Rgba,
    layers: Vec<Layer>,
    legend: Vec<(String, Rgba)>,
    /// Viewport override in EPSG:4326.
    bounds: Option<Rect>,
    north_arrow: Option<NorthArrow>,
}

impl Default for EcoMap {
    fn default() -> Self {
        Self {
            config: MapConfig::default(),
            background: Rgba::new(255, 255, 255, 255),
            layers: vec![],
            legend: vec![],
            bounds: None,
            north_arrow: None,
        }
    }
}

impl EcoMap {
    pub fn new(config: MapConfig) -> Result<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(EcoError::Render(format!(
                "invalid map size {}x{}",
                config.width, config.height
            )));
        }
        let background = config.background.parse()?;
        Ok(Self {
            config,
            background,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn legend(&self) -> &[(String, Rgba)] {
        &self.legend
    }

    /// Add the active geometries of a frame as a new layer.
    ///
    /// The frame is reprojected to EPSG:4326 first, so it must have a CRS. Null and empty
    /// geometries are skipped. A `simplify_tolerance`, in degrees, simplifies lines and polygons
    /// before drawing.
    pub fn add_frame<F: GeoFrame>(
        &mut self,
        frame: &F,
        style: LayerStyle,
        simplify_tolerance: Option<f64>,
    ) -> Result<()> {
        let frame = frame.to_crs(&WGS84)?;
        let to_mercator = Transformer::new(&WGS84, &WEB_MERCATOR)?;
        let geometries = frame
            .geometry()?
            .into_iter()
            .flatten()
            .filter(|geom| !geom.is_empty())
            .map(|geom| match simplify_tolerance {
                Some(tolerance) => simplify(geom, tolerance),
                None => geom,
            })
            .map(|geom| to_mercator.transform(&geom))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            rows = frame.len(),
            drawn = geometries.len(),
            "added map layer"
        );
        self.layers.push(Layer { geometries, style });
        Ok(())
    }

    /// Add a geometry series as a new layer.
    pub fn add_geoseries(
        &mut self,
        series: &GeoSeries,
        style: LayerStyle,
        simplify_tolerance: Option<f64>,
    ) -> Result<()> {
        let mut columns = indexmap::IndexMap::new();
        columns.insert(
            DEFAULT_GEOMETRY_COLUMN.to_string(),
            Column::Geometry(series.geometries().to_vec()),
        );
        let table = GeoTable::from_columns(columns)?.with_crs(series.crs().cloned());
        self.add_frame(&table, style, simplify_tolerance)
    }

    /// Add legend entries. Colors may be written with or without a leading `#`.
    pub fn add_legend<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        for (label, color) in entries {
            let color = color.as_ref().parse()?;
            self.legend.push((label.into(), color));
        }
        Ok(())
    }

    /// The viewport override set by [`EcoMap::zoom_to_bounds`], in EPSG:4326.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Show `[min_x, min_y, max_x, max_y]`, in EPSG:4326 degrees, instead of the extent of the
    /// layers.
    ///
    /// Longitudes must satisfy `-180 < min_x <= max_x < 180` and latitudes
    /// `-90 < min_y <= max_y < 90`.
    pub fn zoom_to_bounds(&mut self, bounds: [f64; 4]) -> Result<()> {
        let [min_x, min_y, max_x, max_y] = bounds;
        let valid = -180.0 < min_x
            && min_x <= max_x
            && max_x < 180.0
            && -90.0 < min_y
            && min_y <= max_y
            && max_y < 90.0;
        if !valid {
            return Err(EcoError::General(format!(
                "map bounds {bounds:?} are outside of EPSG:4326 or not ordered"
            )));
        }
        self.bounds = Some(Rect::new((min_x, min_y), (max_x, max_y)));
        Ok(())
    }

    /// Zoom to the total bounds of the frame's active geometries, reprojected to EPSG:4326.
    pub fn zoom_to_frame<F: GeoFrame>(&mut self, frame: &F) -> Result<()> {
        let bounds = frame
            .to_crs(&WGS84)?
            .geometry()?
            .iter()
            .flatten()
            .filter_map(|geom| geom.bounding_rect())
            .reduce(union_rects)
            .ok_or_else(|| EcoError::General("frame has no geometries to zoom to".to_string()))?;
        self.zoom_to_bounds([
            bounds.min().x,
            bounds.min().y,
            bounds.max().x,
            bounds.max().y,
        ])
    }

    /// Draw a north arrow in `corner`, `100 * scale` pixels tall.
    pub fn add_north_arrow(&mut self, corner: Corner, scale: f32) -> Result<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(EcoError::Render(format!("invalid north arrow scale {scale}")));
        }
        self.north_arrow = Some(NorthArrow { corner, scale });
        Ok(())
    }

    /// Extent of every layer in web mercator.
    fn extent(&self) -> Option<Rect> {
        self.layers
            .iter()
            .flat_map(|layer| layer.geometries.iter())
            .filter_map(|geom| geom.bounding_rect())
            .reduce(union_rects)
    }

    /// The area to show in web mercator: the zoom bounds if set, else the layer extent.
    fn viewport_extent(&self) -> Result<Option<Rect>> {
        match self.bounds {
            Some(bounds) => {
                let projected = Transformer::new(&WGS84, &WEB_MERCATOR)?
                    .transform(&Geometry::Rect(bounds))?;
                Ok(projected.bounding_rect())
            }
            None => Ok(self.extent()),
        }
    }

    pub fn render(&self) -> Result<Pixmap> {
        let (width, height) = (self.config.width, self.config.height);
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| EcoError::Render(format!("invalid map size {width}x{height}")))?;
        pixmap.fill(self.background.to_color());

        if let Some(extent) = self.viewport_extent()? {
            let viewport = Viewport::fit(
                extent,
                width as f32,
                height as f32,
                self.config.padding as f32,
            );
            trace!(?extent, scale = viewport.scale, "rendering map");
            for layer in self.layers.iter() {
                for geom in layer.geometries.iter() {
                    draw_geometry(&mut pixmap, &viewport, geom, &layer.style);
                }
            }
            if !self.config.static_map {
                draw_neatline(&mut pixmap, &viewport, extent);
            }
        }
        if let Some(arrow) = self.north_arrow {
            draw_north_arrow(&mut pixmap, arrow);
        }
        self.draw_legend(&mut pixmap);
        Ok(pixmap)
    }

    /// Color swatches stacked in the bottom-right corner, in insertion order.
    fn draw_legend(&self, pixmap: &mut Pixmap) {
        if self.legend.is_empty() {
            return;
        }
        let count = self.legend.len() as f32;
        let box_size = LEGEND_SWATCH + 2.0 * LEGEND_GAP;
        let box_height = count * (LEGEND_SWATCH + LEGEND_GAP) + LEGEND_GAP;
        let left = pixmap.width() as f32 - box_size - LEGEND_GAP;
        let top = pixmap.height() as f32 - box_height - LEGEND_GAP;

        if let Some(panel) = tiny_skia::Rect::from_xywh(left, top, box_size, box_height) {
            pixmap.fill_rect(
                panel,
                &Rgba::new(255, 255, 255, 0x99).paint(),
                Transform::identity(),
                None,
            );
        }
        for (i, (_, color)) in self.legend.iter().enumerate() {
            let y = top + LEGEND_GAP + i as f32 * (LEGEND_SWATCH + LEGEND_GAP);
            if let Some(swatch) =
                tiny_skia::Rect::from_xywh(left + LEGEND_GAP, y, LEGEND_SWATCH, LEGEND_SWATCH)
            {
                pixmap.fill_rect(swatch, &color.paint(), Transform::identity(), None);
            }
        }
    }

    /// Render and write the map as a PNG file.
    pub fn to_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = self
            .render()?
            .encode_png()
            .map_err(|err| EcoError::Render(err.to_string()))?;
        std::fs::write(path, data)?;
        debug!(path = %path.display(), layers = self.layers.len(), "wrote map");
        Ok(())
    }
}

impl Plotter for EcoMap {
    type Output = ();

    fn plot_series(&mut self, series: &Series, _options: &PlotOptions) -> Result<()> {
        Err(EcoError::IncorrectType(
            format!("column '{}' has no geometries to draw", series.name()).into(),
        ))
    }

    fn plot_geoseries(&mut self, series: &GeoSeries, options: &PlotOptions) -> Result<()> {
        let style = LayerStyle::from_options(options)?;
        self.add_geoseries(series, style, options.get_f64("simplify_tolerance"))
    }

    fn plot_frame(&mut self, _batch: &RecordBatch, _options: &PlotOptions) -> Result<()> {
        Err(EcoError::IncorrectType(
            "selection has no geometry column to draw".into(),
        ))
    }

    fn plot_geoframe<F: GeoFrame>(&mut self, frame: &F, options: &PlotOptions) -> Result<()> {
        let style = LayerStyle::from_options(options)?;
        self.add_frame(frame, style, options.get_f64("simplify_tolerance"))
    }
}

/// Maps web mercator coordinates to pixels, keeping the aspect ratio.
struct Viewport {
    scale: f32,
    origin_x: f64,
    origin_y: f64,
    offset_x: f32,
    offset_y: f32,
    height: f32,
}

impl Viewport {
    fn fit(extent: Rect, width: f32, height: f32, padding: f32) -> Self {
        let inner_w = (width - 2.0 * padding).max(1.0);
        let inner_h = (height - 2.0 * padding).max(1.0);
        let (dx, dy) = (extent.width() as f32, extent.height() as f32);
        let scale = match (dx > 0.0, dy > 0.0) {
            (true, true) => (inner_w / dx).min(inner_h / dy),
            (true, false) => inner_w / dx,
            (false, true) => inner_h / dy,
            (false, false) => 1.0,
        };
        Self {
            scale,
            origin_x: extent.min().x,
            origin_y: extent.min().y,
            offset_x: padding + (inner_w - dx * scale) / 2.0,
            offset_y: padding + (inner_h - dy * scale) / 2.0,
            height,
        }
    }

    fn project(&self, coord: Coord) -> (f32, f32) {
        let x = (coord.x - self.origin_x) as f32 * self.scale + self.offset_x;
        let y = (coord.y - self.origin_y) as f32 * self.scale + self.offset_y;
        (x, self.height - y)
    }
}

fn union_rects(a: Rect, b: Rect) -> Rect {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

fn simplify(geom: Geometry, tolerance: f64) -> Geometry {
    match geom {
        Geometry::LineString(g) => g.simplify(&tolerance).into(),
        Geometry::MultiLineString(g) => g.simplify(&tolerance).into(),
        Geometry::Polygon(g) => g.simplify(&tolerance).into(),
        Geometry::MultiPolygon(g) => g.simplify(&tolerance).into(),
        other => other,
    }
}

fn ring_path(builder: &mut PathBuilder, viewport: &Viewport, ring: &LineString, close: bool) {
    let mut coords = ring.coords().map(|c| viewport.project(*c));
    if let Some((x, y)) = coords.next() {
        builder.move_to(x, y);
        for (x, y) in coords {
            builder.line_to(x, y);
        }
        if close {
            builder.close();
        }
    }
}

fn polygon_path(builder: &mut PathBuilder, viewport: &Viewport, polygon: &Polygon) {
    ring_path(builder, viewport, polygon.exterior(), true);
    for interior in polygon.interiors() {
        ring_path(builder, viewport, interior, true);
    }
}

fn fill_and_stroke(pixmap: &mut Pixmap, path: &SkPath, style: &LayerStyle) {
    if let Some(fill) = style.fill {
        pixmap.fill_path(path, &fill.paint(), FillRule::EvenOdd, Transform::identity(), None);
    }
    stroke(pixmap, path, style);
}

fn stroke(pixmap: &mut Pixmap, path: &SkPath, style: &LayerStyle) {
    if style.stroke_width > 0.0 {
        pixmap.stroke_path(
            path,
            &style.stroke.paint(),
            &Stroke {
                width: style.stroke_width,
                ..Default::default()
            },
            Transform::identity(),
            None,
        );
    }
}

fn draw_point(pixmap: &mut Pixmap, viewport: &Viewport, coord: Coord, style: &LayerStyle) {
    let (x, y) = viewport.project(coord);
    if let Some(path) = PathBuilder::from_circle(x, y, style.point_radius) {
        fill_and_stroke(pixmap, &path, style);
    }
}

fn draw_geometry(pixmap: &mut Pixmap, viewport: &Viewport, geom: &Geometry, style: &LayerStyle) {
    match geom {
        Geometry::Point(g) => draw_point(pixmap, viewport, g.0, style),
        Geometry::MultiPoint(g) => {
            for point in g.iter() {
                draw_point(pixmap, viewport, point.0, style);
            }
        }
        Geometry::Line(g) => {
            draw_geometry(pixmap, viewport, &LineString::from(*g).into(), style)
        }
        Geometry::LineString(g) => {
            let mut builder = PathBuilder::new();
            ring_path(&mut builder, viewport, g, false);
            if let Some(path) = builder.finish() {
                stroke(pixmap, &path, style);
            }
        }
        Geometry::MultiLineString(g) => {
            let mut builder = PathBuilder::new();
            for line in g.iter() {
                ring_path(&mut builder, viewport, line, false);
            }
            if let Some(path) = builder.finish() {
                stroke(pixmap, &path, style);
            }
        }
        Geometry::Polygon(g) => {
            let mut builder = PathBuilder::new();
            polygon_path(&mut builder, viewport, g);
            if let Some(path) = builder.finish() {
                fill_and_stroke(pixmap, &path, style);
            }
        }
        Geometry::MultiPolygon(g) => {
            let mut builder = PathBuilder::new();
            for polygon in g.iter() {
                polygon_path(&mut builder, viewport, polygon);
            }
            if let Some(path) = builder.finish() {
                fill_and_stroke(pixmap, &path, style);
            }
        }
        Geometry::Rect(g) => draw_geometry(pixmap, viewport, &g.to_polygon().into(), style),
        Geometry::Triangle(g) => draw_geometry(pixmap, viewport, &g.to_polygon().into(), style),
        Geometry::GeometryCollection(g) => {
            for child in g.iter() {
                draw_geometry(pixmap, viewport, child, style);
            }
        }
    }
}

fn draw_neatline(pixmap: &mut Pixmap, viewport: &Viewport, extent: Rect) {
    let mut builder = PathBuilder::new();
    ring_path(&mut builder, viewport, extent.to_polygon().exterior(), true);
    if let Some(path) = builder.finish() {
        let style = LayerStyle::new()
            .with_stroke(Rgba::new(0, 0, 0, 0x80))
            .with_stroke_width(1.0);
        stroke(pixmap, &path, &style);
    }
}

fn draw_north_arrow(pixmap: &mut Pixmap, arrow: NorthArrow) {
    let size = NORTH_ARROW_SIZE * arrow.scale;
    let left = match arrow.corner {
        Corner::TopLeft | Corner::BottomLeft => NORTH_ARROW_MARGIN,
        Corner::TopRight | Corner::BottomRight => {
            pixmap.width() as f32 - size - NORTH_ARROW_MARGIN
        }
    };
    let top = match arrow.corner {
        Corner::TopLeft | Corner::TopRight => NORTH_ARROW_MARGIN,
        Corner::BottomLeft | Corner::BottomRight => {
            pixmap.height() as f32 - size - NORTH_ARROW_MARGIN
        }
    };

    let mut builder = PathBuilder::new();
    let mut corners = NORTH_ARROW_SHAPE
        .iter()
        .map(|(x, y)| (left + x * size, top + y * size));
    if let Some((x, y)) = corners.next() {
        builder.move_to(x, y);
        for (x, y) in corners {
            builder.line_to(x, y);
        }
        builder.close();
    }
    if let Some(path) = builder.finish() {
        let dark = Rgba::new(0x22, 0x22, 0x22, 0xFF);
        let style = LayerStyle::new()
            .with_stroke(dark)
            .with_fill(Some(dark))
            .with_stroke_width(1.0);
        fill_and_stroke(pixmap, &path, &style);
    }
}

#[cfg(test)]
mod test {
    use geo::point;

    use super::*;
    use crate::crs::Crs;
    use crate::frame::{EcoDataFrame, FrameOptions, Selection};
    use crate::test::fixtures;

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = pixmap.pixel(x, y).unwrap();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    #[test]
    fn empty_map_to_png() {
        let path = std::env::temp_dir().join("ecoframe_png_map.png");
        let map = EcoMap::new(MapConfig::default()).unwrap();
        map.to_png(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let pixmap = map.render().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (800, 600));
        assert_eq!(pixel(&pixmap, 400, 300), (255, 255, 255, 255));
    }

    #[test]
    fn invalid_config() {
        let config = MapConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(EcoMap::new(config), Err(EcoError::Render(_))));
        let config = MapConfig {
            background: "white".to_string(),
            ..Default::default()
        };
        assert!(EcoMap::new(config).is_err());
    }

    fn unit_box_map() -> EcoMap {
        let frame = EcoDataFrame::from_source(
            vec![(
                "geometry",
                Column::from(vec![fixtures::bbox(0., 0., 1., 1.)]),
            )],
            FrameOptions::new().with_crs(Crs::Epsg(4326)),
        )
        .unwrap();
        let mut map = EcoMap::new(MapConfig::default().static_map()).unwrap();
        let style = LayerStyle::new()
            .with_fill(Some(Rgba::new(255, 0, 0, 255)))
            .with_stroke_width(0.0);
        map.add_frame(&frame, style, None).unwrap();
        map
    }

    #[test]
    fn polygon_fills_center() {
        let map = unit_box_map();
        assert_eq!(map.num_layers(), 1);

        let pixmap = map.render().unwrap();
        assert_eq!(pixel(&pixmap, 400, 300), (255, 0, 0, 255));
        assert_eq!(pixel(&pixmap, 2, 2), (255, 255, 255, 255));
    }

    #[test]
    fn zoom_to_bounds_moves_viewport() {
        let mut map = unit_box_map();
        map.zoom_to_bounds([-1., -1., 1., 1.]).unwrap();
        let pixmap = map.render().unwrap();
        // The box fills the upper-right quadrant around the center.
        assert_eq!(pixel(&pixmap, 450, 250), (255, 0, 0, 255));
        assert_eq!(pixel(&pixmap, 350, 350), (255, 255, 255, 255));

        map.zoom_to_bounds([2., 2., 3., 3.]).unwrap();
        let pixmap = map.render().unwrap();
        assert_eq!(pixel(&pixmap, 400, 300), (255, 255, 255, 255));
    }

    #[test]
    fn zoom_to_bounds_rejects_invalid() {
        let mut map = EcoMap::default();
        for bounds in [
            [-180., 0., 10., 10.],
            [0., 0., 180., 10.],
            [10., 0., 0., 10.],
            [0., -90., 10., 10.],
            [0., 10., 10., 0.],
        ] {
            assert!(map.zoom_to_bounds(bounds).is_err());
        }
        assert_eq!(map.bounds(), None);
    }

    #[test]
    fn zoom_to_frame_uses_total_bounds() {
        let mut map = EcoMap::default();
        map.zoom_to_frame(&EcoDataFrame::from_table(fixtures::box_table()))
            .unwrap();
        assert_eq!(map.bounds(), Some(Rect::new((1., 1.), (4., 4.))));

        let mercator = EcoDataFrame::from_table(fixtures::box_table())
            .to_crs(&Crs::Epsg(3857))
            .unwrap();
        map.zoom_to_frame(&mercator).unwrap();
        let bounds = map.bounds().unwrap();
        approx::assert_relative_eq!(bounds.min().x, 1., epsilon = 1e-9);
        approx::assert_relative_eq!(bounds.max().y, 4., epsilon = 1e-9);

        let empty = EcoDataFrame::from_table(fixtures::box_table()).slice(0..0).unwrap();
        assert!(map.zoom_to_frame(&empty).is_err());
    }

    #[test]
    fn north_arrow_in_corner() {
        let mut map = EcoMap::default();
        assert!(map.add_north_arrow(Corner::TopRight, 0.0).is_err());

        map.add_north_arrow(Corner::TopRight, 1.0).unwrap();
        let pixmap = map.render().unwrap();
        assert_eq!(pixel(&pixmap, 740, 60), (0x22, 0x22, 0x22, 255));
        assert_eq!(pixel(&pixmap, 60, 540), (255, 255, 255, 255));

        map.add_north_arrow("bottomleft".parse().unwrap(), 1.0).unwrap();
        let pixmap = map.render().unwrap();
        assert_eq!(pixel(&pixmap, 60, 540), (0x22, 0x22, 0x22, 255));
        assert_eq!(pixel(&pixmap, 740, 60), (255, 255, 255, 255));

        assert!("middle".parse::<Corner>().is_err());
    }

    #[test]
    fn add_frame_requires_crs() {
        let mut map = EcoMap::default();
        let frame = EcoDataFrame::from_table(fixtures::point_table());
        assert!(matches!(
            map.add_frame(&frame, LayerStyle::new(), None),
            Err(EcoError::UndefinedCrs)
        ));
    }

    #[test]
    fn add_frame_skips_null_geometries() {
        let frame = EcoDataFrame::from_source(
            vec![(
                "geometry",
                Column::from(vec![Some(Geometry::from(point!(x: 1., y: 1.))), None]),
            )],
            FrameOptions::new().with_crs(Crs::Epsg(4326)),
        )
        .unwrap();
        let mut map = EcoMap::default();
        map.add_frame(&frame, LayerStyle::new(), Some(0.01)).unwrap();
        assert_eq!(map.layers[0].geometries.len(), 1);
    }

    #[test]
    fn legend_accepts_optional_hash() {
        let mut map = EcoMap::default();
        map.add_legend([("fast", "#FF0000"), ("slow", "00FF00")]).unwrap();
        assert_eq!(
            map.legend(),
            &[
                ("fast".to_string(), Rgba::new(255, 0, 0, 255)),
                ("slow".to_string(), Rgba::new(0, 255, 0, 255)),
            ]
        );
        assert!(map.add_legend([("bad", "#12")]).is_err());

        let pixmap = map.render().unwrap();
        // Center of the last swatch in the bottom-right panel.
        let x = 800 - LEGEND_GAP as u32 * 2 - LEGEND_SWATCH as u32 / 2;
        let y = 600 - LEGEND_GAP as u32 * 2 - LEGEND_SWATCH as u32 / 2;
        assert_eq!(pixel(&pixmap, x, y), (0, 255, 0, 255));
    }

    #[test]
    fn plot_selection_on_map() {
        let frame = EcoDataFrame::from_table(fixtures::box_table());
        let mut map = EcoMap::default();
        let options = PlotOptions::new().with("color", "#000000");

        frame
            .get("my_geometry")
            .unwrap()
            .plot(&mut map, &options)
            .unwrap();
        frame
            .select(&["id", "other_geometry"])
            .unwrap()
            .plot(&mut map, &options)
            .unwrap();
        assert_eq!(map.num_layers(), 2);

        let selection: Selection<EcoDataFrame> = frame.get("id").unwrap();
        assert!(matches!(
            selection.plot(&mut map, &options),
            Err(EcoError::IncorrectType(_))
        ));
    }
}
