//! Linien- und Textstil einer Beziehung inkl. Standardwerte.

use serde::{Deserialize, Serialize};

use super::record::lenient;

pub const DEFAULT_LINE_WIDTH: f32 = 1.0;
pub const DEFAULT_LINE_COLOR: &str = "#999";
pub const DEFAULT_TEXT_COLOR: &str = "#999";
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Strichmuster der Linie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineDash {
    #[serde(alias = "soild")]
    Solid,
    SysDash,
    #[default]
    SysDot,
    Dash,
    DashDot,
    DashDotDot,
}

impl LineDash {
    /// SVG-`stroke-dasharray` für den Renderer.
    pub fn dash_array(self) -> &'static str {
        match self {
            LineDash::Solid => "0",
            LineDash::SysDash | LineDash::SysDot => "2",
            LineDash::Dash => "4 2",
            LineDash::DashDot | LineDash::DashDotDot => "4 2 2 2",
        }
    }
}

/// Endmarkierung an Start oder Ende
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Dot,
    Arrow,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    #[serde(rename = "line-width", deserialize_with = "lenient::line_width")]
    pub width: f32,
    #[serde(rename = "line-color")]
    pub color: String,
    #[serde(rename = "line-style")]
    pub dash: LineDash,
    #[serde(rename = "from-marker")]
    pub from_marker: Marker,
    #[serde(rename = "to-marker")]
    pub to_marker: Marker,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_LINE_WIDTH,
            color: DEFAULT_LINE_COLOR.to_string(),
            dash: LineDash::SysDot,
            from_marker: Marker::Empty,
            to_marker: Marker::Arrow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TextStyle {
    pub color: String,
    #[serde(deserialize_with = "lenient::font_size")]
    pub font_size: f32,
    pub font_weight: FontWeight,
    /// `auto` überlässt die Wahl dem Renderer
    pub font_family: String,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_TEXT_COLOR.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::Normal,
            font_family: "auto".to_string(),
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
        }
    }
}
