//! Polar projection for the trait radar.
//!
//! Stateless geometry shared by every renderer: the interactive chart and
//! the static export must call the same functions so the two cannot drift
//! apart visually. Axis 0 sits at the top and axes proceed clockwise.
//! Values are percentages of the disc radius; out-of-range values are not
//! rejected, they extrapolate linearly — callers clamp if they want
//! clamping.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

/// Default square viewport matching the interactive chart.
pub const DEFAULT_SIZE: f64 = 300.0;
/// Margin kept free around the disc for axis labels.
pub const LABEL_PADDING: f64 = 40.0;
/// How far beyond the rim axis labels are anchored.
pub const LABEL_OFFSET: f64 = 25.0;
/// Background reference rings, as percentages of the disc radius.
pub const RING_LEVELS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];

/// One axis of the radar: primary (self) value, optional overlaid
/// secondary (peer) value. Order in a sample set is rendering order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarSample {
    pub axis: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Fixed-radius disc with N axes. Pure parameter bundle; every method is a
/// function of its arguments.
#[derive(Debug, Clone, Copy)]
pub struct RadarProjector {
    cx: f64,
    cy: f64,
    radius: f64,
    axes: usize,
}

impl RadarProjector {
    /// Disc inscribed in a `width` x `height` viewport with label padding,
    /// matching the interactive chart's layout.
    pub fn for_viewport(width: f64, height: f64, axes: usize) -> Self {
        let cx = width / 2.0;
        let cy = height / 2.0;
        Self {
            cx,
            cy,
            radius: cx.min(cy) - LABEL_PADDING,
            axes,
        }
    }

    pub fn new(cx: f64, cy: f64, radius: f64, axes: usize) -> Self {
        Self { cx, cy, radius, axes }
    }

    pub fn center(&self) -> Point {
        Point { x: self.cx, y: self.cy }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn axes(&self) -> usize {
        self.axes
    }

    /// θ(i) = i·(2π/N) − π/2 — index 0 straight up, clockwise in screen
    /// coordinates (y grows downward).
    pub fn angle(&self, index: usize) -> f64 {
        index as f64 * (TAU / self.axes as f64) - FRAC_PI_2
    }

    /// Map a percentage value on axis `index` to viewport coordinates.
    /// 0 lands on the center, 100 exactly on the axis endpoint.
    pub fn point(&self, index: usize, value: f64) -> Point {
        let angle = self.angle(index);
        let r = self.radius * (value / 100.0);
        Point {
            x: self.cx + r * angle.cos(),
            y: self.cy + r * angle.sin(),
        }
    }

    pub fn axis_end(&self, index: usize) -> Point {
        self.point(index, 100.0)
    }

    /// Anchor for the axis label, slightly beyond the rim.
    pub fn label_anchor(&self, index: usize) -> Point {
        let angle = self.angle(index);
        Point {
            x: self.cx + (self.radius + LABEL_OFFSET) * angle.cos(),
            y: self.cy + (self.radius + LABEL_OFFSET) * angle.sin(),
        }
    }

    /// Closed polygon over the primary value column.
    pub fn primary_polygon(&self, samples: &[RadarSample]) -> Vec<Point> {
        samples
            .iter()
            .enumerate()
            .map(|(i, s)| self.point(i, s.value))
            .collect()
    }

    /// Closed polygon over the secondary value column. Axes with no
    /// secondary value collapse to the center, matching the interactive
    /// chart's treatment of missing overlay data.
    pub fn secondary_polygon(&self, samples: &[RadarSample]) -> Vec<Point> {
        samples
            .iter()
            .enumerate()
            .map(|(i, s)| self.point(i, s.secondary_value.unwrap_or(0.0)))
            .collect()
    }

    /// Radii of the background reference rings, independent of data.
    pub fn ring_radii(&self) -> Vec<f64> {
        RING_LEVELS
            .iter()
            .map(|level| self.radius * (level / 100.0))
            .collect()
    }
}

/// Join points into an SVG `points` attribute: "x1,y1 x2,y2 ...".
pub fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
