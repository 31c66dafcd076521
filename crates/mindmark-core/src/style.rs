//! Style attribute values carried by mind map nodes and preferences.
//!
//! # Overview
//!
//! Exported types:
//! - [`BranchShape`]: How the connector between a node and its children is drawn
//! - [`StrokeStyle`]: Line pattern of connectors (solid, dashed, dotted)
//! - [`NodeShape`]: Outline drawn around node text
//! - [`LayoutDirection`]: How a root arranges its subtree
//! - [`Theme`], [`ColorMode`]: Color theme of the rendering surface
//! - [`AmbientTheme`]: The light/dark signal of the surrounding environment
//!
//! Every enum parses from the kebab-case spelling it serializes to, so the
//! same strings work in stored state, configuration, and on the command line.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Smallest stroke width the line tools accept.
pub const MIN_STROKE_WIDTH: u32 = 1;
/// Largest stroke width the line tools accept.
pub const MAX_STROKE_WIDTH: u32 = 20;
/// Stroke width shown by the line tools while no preference is set.
pub const DEFAULT_STROKE_WIDTH: u32 = 2;

/// Clamps a requested stroke width into the supported range.
///
/// # Examples
///
/// ```
/// use mindmark_core::style::clamp_stroke_width;
///
/// assert_eq!(clamp_stroke_width(0), 1);
/// assert_eq!(clamp_stroke_width(7), 7);
/// assert_eq!(clamp_stroke_width(99), 20);
/// ```
pub fn clamp_stroke_width(width: u32) -> u32 {
    width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

/// Shape of the connector between a node and its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BranchShape {
    /// Smooth curve (the "spline" line type)
    Bight,
    /// Straight segments with right-angle turns
    Polyline,
}

impl BranchShape {
    /// Maps the spline preference to a branch shape.
    pub fn from_spline(spline: bool) -> Self {
        if spline { Self::Bight } else { Self::Polyline }
    }
}

/// Line pattern of branch connectors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            _ => Err(format!(
                "invalid stroke style `{s}`, valid values: solid, dashed, dotted"
            )),
        }
    }
}

/// Outline drawn around node text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeShape {
    /// Text inside a rounded rectangle
    RoundRectangle,
    /// Text on top of a single underline
    Underline,
}

impl FromStr for NodeShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round-rectangle" => Ok(Self::RoundRectangle),
            "underline" => Ok(Self::Underline),
            _ => Err(format!(
                "invalid node shape `{s}`, valid values: round-rectangle, underline"
            )),
        }
    }
}

/// How a root node arranges its subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutDirection {
    /// Classic two-column mind map; children split between right and left
    Standard,
    /// Logic diagram growing rightward
    Right,
    /// Logic diagram growing leftward
    Left,
    /// Logic diagram growing upward
    Upward,
    /// Logic diagram growing downward
    Downward,
    /// Indented tree below and to the right of the root
    RightBottomIndented,
    /// Indented tree above and to the right of the root
    RightTopIndented,
    /// Indented tree above and to the left of the root
    LeftTopIndented,
    /// Indented tree below and to the left of the root
    LeftBottomIndented,
}

impl LayoutDirection {
    /// All directions, in the order the layout picker shows them.
    pub const ALL: [Self; 9] = [
        Self::Standard,
        Self::Right,
        Self::Left,
        Self::Upward,
        Self::Downward,
        Self::RightBottomIndented,
        Self::RightTopIndented,
        Self::LeftTopIndented,
        Self::LeftBottomIndented,
    ];

    /// Returns the kebab-case name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Right => "right",
            Self::Left => "left",
            Self::Upward => "upward",
            Self::Downward => "downward",
            Self::RightBottomIndented => "right-bottom-indented",
            Self::RightTopIndented => "right-top-indented",
            Self::LeftTopIndented => "left-top-indented",
            Self::LeftBottomIndented => "left-bottom-indented",
        }
    }

    /// Whether this is the two-column layout that uses a right-side child count.
    pub fn is_standard(self) -> bool {
        matches!(self, Self::Standard)
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<_> = Self::ALL.iter().map(|d| d.as_str()).collect();
                format!(
                    "invalid layout `{s}`, valid values: {}",
                    valid.join(", ")
                )
            })
    }
}

/// Color mode of the rendering surface.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    #[default]
    Default,
    Dark,
    Soft,
    Retro,
    Starry,
    Colorful,
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "dark" => Ok(Self::Dark),
            "soft" => Ok(Self::Soft),
            "retro" => Ok(Self::Retro),
            "starry" => Ok(Self::Starry),
            "colorful" => Ok(Self::Colorful),
            _ => Err(format!(
                "invalid color mode `{s}`, valid values: default, dark, soft, retro, starry, colorful"
            )),
        }
    }
}

/// Theme applied to the rendering surface.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    color_mode: ColorMode,
}

impl Theme {
    pub fn new(color_mode: ColorMode) -> Self {
        Self { color_mode }
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// The theme derived from the ambient light/dark signal.
    pub fn from_ambient(ambient: AmbientTheme) -> Self {
        match ambient {
            AmbientTheme::Light => Self::new(ColorMode::Default),
            AmbientTheme::Dark => Self::new(ColorMode::Dark),
        }
    }
}

/// Light/dark signal from the environment hosting the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbientTheme {
    Light,
    Dark,
}

impl FromStr for AmbientTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!(
                "invalid ambient theme `{s}`, valid values: light, dark"
            )),
        }
    }
}
