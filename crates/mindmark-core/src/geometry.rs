//! Geometric primitives for anchoring and viewing a mind map.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in board space
//! - [`Viewport`] - Zoom factor and optional scroll origin of the rendering surface
//!
//! Board space uses the same convention as SVG: origin at the top-left, X
//! increasing rightward and Y increasing downward.

use serde::{Deserialize, Serialize};

/// Zoom factor used when no viewport is stored.
pub const DEFAULT_ZOOM: f64 = 1.0;
/// Smallest zoom factor the zoom commands will produce.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor the zoom commands will produce.
pub const MAX_ZOOM: f64 = 3.0;
/// Increment applied by a single zoom in/out command.
pub const ZOOM_STEP: f64 = 0.1;

/// A 2D point in board coordinate space.
///
/// # Examples
///
/// ```
/// # use mindmark_core::geometry::Point;
/// let p = Point::new(400.0, 300.0);
/// assert_eq!(p.x(), 400.0);
/// assert_eq!(p.y(), 300.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// The visible region of the rendering surface.
///
/// A stored viewport pins zoom (and optionally the scroll origin). Absence of
/// a viewport in the authoritative state means "fit to content".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    origin: Option<Point>,
}

impl Viewport {
    /// Creates a viewport at `zoom` without a fixed origin.
    pub fn new(zoom: f64) -> Self {
        Self { zoom, origin: None }
    }

    /// Sets the scroll origin (builder style).
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Returns the zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Returns the scroll origin, if one is pinned.
    pub fn origin(&self) -> Option<Point> {
        self.origin
    }

    /// Returns a copy zoomed in by one step, keeping the origin.
    ///
    /// Starts from [`DEFAULT_ZOOM`] when there is no current viewport.
    pub fn zoomed_in(current: Option<&Viewport>) -> Self {
        Self::step(current, ZOOM_STEP)
    }

    /// Returns a copy zoomed out by one step, keeping the origin.
    ///
    /// Starts from [`DEFAULT_ZOOM`] when there is no current viewport.
    pub fn zoomed_out(current: Option<&Viewport>) -> Self {
        Self::step(current, -ZOOM_STEP)
    }

    fn step(current: Option<&Viewport>, delta: f64) -> Self {
        let zoom = current.map_or(DEFAULT_ZOOM, |viewport| viewport.zoom);
        Self {
            zoom: (zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM),
            origin: current.and_then(|viewport| viewport.origin),
        }
    }
}
