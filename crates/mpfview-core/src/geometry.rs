//! 2D geometry primitives in machine coordinates (millimeters)
//!
//! Contour paths are made of two primitives:
//! - Straight lines (G0/G1)
//! - Circular arcs (G2 clockwise, G3 counter-clockwise) with an explicit
//!   center, radius and start/end angles
//!
//! Arc sweep normalization lives here so that length computation and point
//! sampling can never disagree on which way an arc turns.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;

use crate::constants::GEOMETRY_EPSILON;

/// A point in machine coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    /// The machine origin
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Equality within [`GEOMETRY_EPSILON`] on both axes
    pub fn approx_eq(&self, other: &Point2D) -> bool {
        (self.x - other.x).abs() <= GEOMETRY_EPSILON && (self.y - other.y).abs() <= GEOMETRY_EPSILON
    }

    /// Translate by an incremental offset
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Linear interpolation towards `other`
    ///
    /// Exact at both ends: `t = 0` returns `self` and `t = 1` returns `other`.
    pub fn lerp(&self, other: &Point2D, t: f64) -> Self {
        let s = 1.0 - t;
        Self::new(s * self.x + t * other.x, s * self.y + t * other.y)
    }

    /// Angle of this point as seen from `center`, in radians (`atan2` range)
    pub fn angle_from(&self, center: &Point2D) -> f64 {
        (self.y - center.y).atan2(self.x - center.x)
    }

    /// Rotate about the coordinate origin by `degrees` (counter-clockwise positive)
    pub fn rotated(&self, degrees: f64) -> Self {
        if degrees == 0.0 {
            return *self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Normalize the raw angular span `end_angle - start_angle` so its sign matches
/// the turning direction: negative for clockwise, positive for counter-clockwise.
pub fn arc_sweep(start_angle: f64, end_angle: f64, clockwise: bool) -> f64 {
    let mut span = end_angle - start_angle;
    if clockwise {
        if span > 0.0 {
            span -= TAU;
        }
    } else if span < 0.0 {
        span += TAU;
    }
    span
}

/// A single line or arc primitive of a contour
///
/// Invariant for arcs: `radius == |center - start| == |center - end|` within
/// floating tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum PathSegment {
    /// Straight move (G0/G1)
    Line { start: Point2D, end: Point2D },
    /// Circular move (G2/G3)
    Arc {
        start: Point2D,
        end: Point2D,
        center: Point2D,
        radius: f64,
        clockwise: bool,
        start_angle: f64,
        end_angle: f64,
    },
}

impl PathSegment {
    /// Create a line segment
    pub fn line(start: Point2D, end: Point2D) -> Self {
        PathSegment::Line { start, end }
    }

    /// Create an arc around `center`, deriving radius and angles from the endpoints
    pub fn arc(start: Point2D, end: Point2D, center: Point2D, clockwise: bool) -> Self {
        PathSegment::Arc {
            start,
            end,
            center,
            radius: start.distance_to(&center),
            clockwise,
            start_angle: start.angle_from(&center),
            end_angle: end.angle_from(&center),
        }
    }

    pub fn start(&self) -> Point2D {
        match self {
            PathSegment::Line { start, .. } | PathSegment::Arc { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Point2D {
        match self {
            PathSegment::Line { end, .. } | PathSegment::Arc { end, .. } => *end,
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, PathSegment::Arc { .. })
    }

    /// Signed angular span of an arc in radians (0 for lines)
    ///
    /// The raw span `end_angle - start_angle` with its sign matched to the
    /// direction (see [`arc_sweep`]). An arc that ends where it starts spans
    /// zero, and a zero radius arc never sweeps.
    pub fn sweep(&self) -> f64 {
        match *self {
            PathSegment::Line { .. } => 0.0,
            PathSegment::Arc {
                radius,
                clockwise,
                start_angle,
                end_angle,
                ..
            } => {
                if !(radius > GEOMETRY_EPSILON) {
                    return 0.0;
                }
                arc_sweep(start_angle, end_angle, clockwise)
            }
        }
    }

    /// Path length in millimeters
    pub fn length(&self) -> f64 {
        match *self {
            PathSegment::Line { start, end } => start.distance_to(&end),
            PathSegment::Arc { radius, .. } => (self.sweep() * radius).abs(),
        }
    }

    /// Position at parameter `t` in `0..=1` along the segment
    pub fn point_at(&self, t: f64) -> Point2D {
        match *self {
            PathSegment::Line { start, end } => start.lerp(&end, t),
            PathSegment::Arc {
                start,
                center,
                radius,
                start_angle,
                ..
            } => {
                if !(radius > GEOMETRY_EPSILON) {
                    return start;
                }
                let angle = start_angle + t * self.sweep();
                Point2D::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                )
            }
        }
    }

    /// Tight bounding box, including the extrema an arc sweeps through
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::new();
        bounds.update(self.start());
        bounds.update(self.end());

        if let PathSegment::Arc {
            center,
            radius,
            start_angle,
            ..
        } = *self
        {
            let sweep = self.sweep();
            for quadrant in 0..4 {
                let cardinal = quadrant as f64 * FRAC_PI_2;
                if angle_within_sweep(cardinal, start_angle, sweep) {
                    bounds.update(Point2D::new(
                        center.x + radius * cardinal.cos(),
                        center.y + radius * cardinal.sin(),
                    ));
                }
            }
        }

        bounds
    }
}

/// Whether `angle` is passed while sweeping `sweep` radians from `start_angle`
fn angle_within_sweep(angle: f64, start_angle: f64, sweep: f64) -> bool {
    if sweep == 0.0 {
        return false;
    }
    let delta = if sweep > 0.0 {
        (angle - start_angle).rem_euclid(TAU)
    } else {
        (start_angle - angle).rem_euclid(TAU)
    };
    delta <= sweep.abs()
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point2D,
    pub max: Point2D,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// An empty box; becomes valid after the first [`Bounds::update`]
    pub fn new() -> Self {
        Self {
            min: Point2D::new(f64::INFINITY, f64::INFINITY),
            max: Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Grow the box to contain `point`; non-finite points are ignored
    pub fn update(&mut self, point: Point2D) {
        if !point.x.is_finite() || !point.y.is_finite() {
            return;
        }
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Grow the box to contain another box
    pub fn merge(&mut self, other: &Bounds) {
        if other.is_valid() {
            self.update(other.min);
            self.update(other.max);
        }
    }

    /// Bounds of a sequence of segments (invalid when the sequence is empty)
    pub fn of_segments<'a>(segments: impl IntoIterator<Item = &'a PathSegment>) -> Self {
        let mut bounds = Bounds::new();
        for segment in segments {
            bounds.merge(&segment.bounds());
        }
        bounds
    }

    pub fn is_valid(&self) -> bool {
        self.min.x.is_finite()
            && self.min.y.is_finite()
            && self.max.x.is_finite()
            && self.max.y.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        if self.is_valid() {
            self.max.x - self.min.x
        } else {
            0.0
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_valid() {
            self.max.y - self.min.y
        } else {
            0.0
        }
    }
}
