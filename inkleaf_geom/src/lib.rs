// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inkleaf Geom: pressure-aware ink geometry primitives.
//!
//! This crate provides the geometry layer of the Inkleaf ink engine:
//!
//! - [`Point`]: a document-space sample point carrying pen pressure.
//! - [`distance`]: Euclidean distance between two sample points.
//! - [`stroke_outline`]: conversion of a raw pressure-carrying polyline into
//!   a closed, fillable variable-width outline path.
//!
//! The outline model follows the smoothing/thinning/streamline family of
//! freehand-ink algorithms: input points are streamlined toward their
//! predecessors, pen pressure is mapped through an easing curve to a local
//! half-width, and left/right edge points are offset along smoothed segment
//! normals. The resulting edge loop is closed into a single polygon whose
//! path uses averaged midpoints between consecutive edge samples as
//! quadratic-curve knots, which keeps the filled ink visually continuous
//! instead of faceted.
//!
//! Everything here is headless and deterministic; no rendering backend is
//! assumed. Higher layers store the produced [`kurbo::BezPath`] alongside the
//! raw points and fill it through whatever backend they target.
//!
//! ## Minimal example
//!
//! ```rust
//! use inkleaf_geom::{InkOptions, Point, stroke_outline};
//!
//! let points = [
//!     Point::new(0.0, 0.0),
//!     Point::new(4.0, 1.0),
//!     Point::new(9.0, 3.0),
//!     Point::new(15.0, 4.0),
//!     Point::new(22.0, 4.5),
//! ];
//! let outline = stroke_outline(&points, &InkOptions::default());
//! assert!(!outline.is_empty());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, Vec2};

/// A single ink sample in document space.
///
/// Coordinates are in document units (unscrolled, unzoomed). `pressure` is
/// the normalized pen pressure in `[0, 1]`; devices that do not report
/// pressure use [`Point::DEFAULT_PRESSURE`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Document-space X coordinate.
    pub x: f64,
    /// Document-space Y coordinate.
    pub y: f64,
    /// Normalized pen pressure in `[0, 1]`.
    pub pressure: f64,
}

impl Point {
    /// Mid-range pressure substituted for devices that report none.
    pub const DEFAULT_PRESSURE: f64 = 0.5;

    /// Creates a point with [`Point::DEFAULT_PRESSURE`].
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            pressure: Self::DEFAULT_PRESSURE,
        }
    }

    /// Creates a point with an explicit pressure value.
    #[must_use]
    pub const fn with_pressure(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    /// Returns the positional part as a [`kurbo::Point`], dropping pressure.
    #[must_use]
    pub const fn pos(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    /// Linear interpolation between two sample points.
    ///
    /// Position and pressure are both interpolated; `t = 0` yields `self`,
    /// `t = 1` yields `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            pressure: self.pressure + (other.pressure - self.pressure) * t,
        }
    }
}

/// Euclidean distance between two sample points.
///
/// Pressure is ignored; this is a purely positional measure.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Parameters of the variable-width ink outline.
///
/// The defaults match the pen tuning the engine ships with: a 5-unit pen
/// with moderate thinning, light streamlining, and a sine easing over the
/// pressure-to-width mapping.
#[derive(Clone, Copy, Debug)]
pub struct InkOptions {
    /// Full pen diameter in document units at neutral pressure.
    pub size: f64,
    /// Tangent smoothing factor in `[0, 1]`; higher values carry more of the
    /// previous segment direction into each edge normal.
    pub smoothing: f64,
    /// Pressure sensitivity in `[0, 1]`; `0` disables pressure and yields a
    /// constant-width stroke.
    pub thinning: f64,
    /// Input streamlining in `[0, 1]`; higher values pull each raw point
    /// further toward its streamlined predecessor.
    pub streamline: f64,
    /// Easing applied to the normalized pressure before the width mapping.
    pub easing: fn(f64) -> f64,
    /// Round off the start of the outline instead of cutting it flat.
    pub cap_start: bool,
    /// Round off the end of the outline instead of cutting it flat.
    pub cap_end: bool,
}

fn sine_ease(t: f64) -> f64 {
    (t * core::f64::consts::FRAC_PI_2).sin()
}

impl Default for InkOptions {
    fn default() -> Self {
        Self {
            size: 5.0,
            smoothing: 0.48,
            thinning: 0.5,
            streamline: 0.23,
            easing: sine_ease,
            cap_start: true,
            cap_end: true,
        }
    }
}

impl InkOptions {
    /// Local stroke half-width for a given pressure.
    fn radius(&self, pressure: f64) -> f64 {
        if self.thinning == 0.0 {
            return self.size / 2.0;
        }
        let t = 0.5 - self.thinning * (0.5 - pressure.clamp(0.0, 1.0));
        self.size / 2.0 * (self.easing)(t.clamp(0.0, 1.0))
    }
}

/// Number of cap segments inserted when an end is capped.
const CAP_STEPS: usize = 4;

/// Minimum number of edge samples required to emit a non-empty path.
const MIN_OUTLINE_SAMPLES: usize = 4;

/// Builds the closed, fillable outline of a variable-width ink stroke.
///
/// The returned path is a single closed polygon traced along the left edge
/// of the stroke and back along the right edge, suitable for filling with a
/// non-zero fill rule. Fed fewer than four resolvable edge samples (for
/// example one or two input points), this returns an empty path rather than
/// failing; callers treat an empty outline as "nothing to draw yet".
#[must_use]
pub fn stroke_outline(points: &[Point], options: &InkOptions) -> BezPath {
    let streamlined = streamline(points, options.streamline);
    let edge = edge_loop(&streamlined, options);
    closed_path_from_loop(&edge)
}

/// Pulls each raw point toward its streamlined predecessor.
///
/// The first point is kept as-is. The pull strength maps `streamline = 0` to
/// "no change" and `streamline = 1` to "barely moves", which suppresses
/// high-frequency input jitter without visibly lagging the pen.
fn streamline(points: &[Point], streamline: f64) -> Vec<Point> {
    let t = 0.15 + (1.0 - streamline.clamp(0.0, 1.0)) * 0.85;
    let mut out = Vec::with_capacity(points.len());
    let mut prev: Option<Point> = None;
    for &p in points {
        let next = match prev {
            Some(last) => last.lerp(p, t),
            None => p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// Computes the closed left-then-right edge loop of the stroke.
fn edge_loop(points: &[Point], options: &InkOptions) -> Vec<kurbo::Point> {
    if points.len() < 2 {
        return Vec::new();
    }

    // Unit direction per segment; the final point reuses the direction of
    // the segment arriving at it.
    let mut dirs: Vec<Vec2> = Vec::with_capacity(points.len());
    for i in 0..points.len() {
        let raw = if i + 1 < points.len() {
            points[i + 1].pos() - points[i].pos()
        } else {
            points[i].pos() - points[i - 1].pos()
        };
        let dir = normalize_or(raw, dirs.last().copied().unwrap_or(Vec2::new(1.0, 0.0)));
        let smoothed = match dirs.last() {
            Some(&prev) => {
                normalize_or(prev.lerp(dir, 1.0 - options.smoothing.clamp(0.0, 1.0)), dir)
            }
            None => dir,
        };
        dirs.push(smoothed);
    }

    let mut left: Vec<kurbo::Point> = Vec::with_capacity(points.len());
    let mut right: Vec<kurbo::Point> = Vec::with_capacity(points.len());
    for (p, dir) in points.iter().zip(&dirs) {
        let r = options.radius(p.pressure);
        let normal = Vec2::new(dir.y, -dir.x);
        left.push(p.pos() + normal * r);
        right.push(p.pos() - normal * r);
    }

    let start_r = options.radius(points[0].pressure);
    let end_r = options.radius(points[points.len() - 1].pressure);

    let mut loop_points = Vec::with_capacity(left.len() + right.len() + 2 * CAP_STEPS);
    loop_points.extend(left.iter().copied());
    if options.cap_end {
        let center = points[points.len() - 1].pos();
        let from = *left.last().unwrap_or(&center);
        loop_points.extend(arc_points(center, from, end_r, CAP_STEPS));
    }
    loop_points.extend(right.iter().rev().copied());
    if options.cap_start {
        let center = points[0].pos();
        let from = *right.first().unwrap_or(&center);
        loop_points.extend(arc_points(center, from, start_r, CAP_STEPS));
    }
    loop_points
}

/// Points along a half-circle from `from` around `center`, excluding both
/// endpoints. Used to round off stroke caps.
fn arc_points(
    center: kurbo::Point,
    from: kurbo::Point,
    radius: f64,
    steps: usize,
) -> Vec<kurbo::Point> {
    if radius <= 0.0 || steps == 0 {
        return Vec::new();
    }
    let start = from - center;
    let start_angle = start.y.atan2(start.x);
    let mut out = Vec::with_capacity(steps);
    for i in 1..=steps {
        let angle =
            start_angle + core::f64::consts::PI * (i as f64) / ((steps + 1) as f64);
        out.push(center + Vec2::new(angle.cos(), angle.sin()) * radius);
    }
    out
}

fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let h = v.hypot();
    if h > 1e-12 { v / h } else { fallback }
}

/// Closes an edge loop into a quadratic-curve path.
///
/// Consecutive loop samples contribute their averaged midpoint as the
/// on-curve knot and the earlier sample as the control point, which rounds
/// the polygon without ever leaving its convex hull. Fewer than four samples
/// produce an empty path.
fn closed_path_from_loop(samples: &[kurbo::Point]) -> BezPath {
    let mut path = BezPath::new();
    if samples.len() < MIN_OUTLINE_SAMPLES {
        return path;
    }

    let mid = |a: kurbo::Point, b: kurbo::Point| kurbo::Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);

    path.move_to(mid(samples[samples.len() - 1], samples[0]));
    for i in 0..samples.len() {
        let a = samples[i];
        let b = samples[(i + 1) % samples.len()];
        path.quad_to(a, mid(a, b));
    }
    path.close_path();
    path
}
