use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tiny_skia::{Color, Paint, Shader};

use crate::error::{EcoError, Result};
use crate::frame::PlotOptions;

/// An 8-bit RGBA color, parsed from `RRGGBB` or `RRGGBBAA` hex with an optional leading `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_color(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    pub(crate) fn paint(self) -> Paint<'static> {
        Paint {
            shader: Shader::SolidColor(self.to_color()),
            anti_alias: true,
            ..Default::default()
        }
    }
}

impl FromStr for Rgba {
    type Err = EcoError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || EcoError::IncorrectType(format!("invalid color '{s}'").into());
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl TryFrom<String> for Rgba {
    type Error = EcoError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

/// How the geometries of one layer are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStyle {
    /// Outline and line color.
    pub stroke: Rgba,
    pub stroke_width: f32,
    /// Fill of polygons and point markers. `None` draws outlines only.
    pub fill: Option<Rgba>,
    /// Marker radius in pixels.
    pub point_radius: f32,
}

impl Default for LayerStyle {
    fn default() -> Self {
        let blue = Rgba::new(0x33, 0x88, 0xFF, 0xFF);
        Self {
            stroke: blue,
            stroke_width: 2.0,
            fill: Some(blue.with_alpha(0x66)),
            point_radius: 4.0,
        }
    }
}

impl LayerStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stroke(self, stroke: Rgba) -> Self {
        Self { stroke, ..self }
    }

    pub fn with_stroke_width(self, stroke_width: f32) -> Self {
        Self {
            stroke_width,
            ..self
        }
    }

    pub fn with_fill(self, fill: Option<Rgba>) -> Self {
        Self { fill, ..self }
    }

    pub fn with_point_radius(self, point_radius: f32) -> Self {
        Self {
            point_radius,
            ..self
        }
    }

    /// Read a style from plot keywords: `color`, `fill_color`, `fill_opacity` (0 to 1),
    /// `weight` and `radius`. Missing keys keep their defaults.
    pub fn from_options(options: &PlotOptions) -> Result<Self> {
        let mut style = Self::default();
        if let Some(color) = options.get_str("color") {
            let color: Rgba = color.parse()?;
            style.stroke = color;
            style.fill = Some(color.with_alpha(0x66));
        }
        if let Some(fill) = options.get_str("fill_color") {
            style.fill = Some(fill.parse()?);
        }
        if let Some(opacity) = options.get_f64("fill_opacity") {
            let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
            style.fill = style.fill.map(|fill| fill.with_alpha(alpha));
        }
        if let Some(weight) = options.get_f64("weight") {
            style.stroke_width = weight as f32;
        }
        if let Some(radius) = options.get_f64("radius") {
            style.point_radius = radius as f32;
        }
        Ok(style)
    }
}
