// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use inkleaf_geom::{InkOptions, Point, stroke_outline};
use kurbo::BezPath;
use peniko::Color;

/// A committed or in-progress ink stroke.
///
/// The outline is derived state: it is rebuilt whenever the point list
/// changes, so callers always see an outline that matches the points. Reads
/// never trigger a rebuild.
#[derive(Clone, Debug)]
pub struct Stroke {
    points: Vec<Point>,
    outline: BezPath,
    colour: Color,
    thickness: f64,
}

impl Stroke {
    /// Creates a stroke and builds its outline from `points`.
    #[must_use]
    pub fn new(points: Vec<Point>, colour: Color, thickness: f64) -> Self {
        let mut stroke = Self {
            points,
            outline: BezPath::new(),
            colour,
            thickness,
        };
        stroke.rebuild_outline();
        stroke
    }

    /// The captured sample points, in input order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The closed fill outline for the current point list.
    #[must_use]
    pub fn outline(&self) -> &BezPath {
        &self.outline
    }

    /// The stroke colour.
    #[must_use]
    pub fn colour(&self) -> Color {
        self.colour
    }

    /// The pen diameter in document units.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Appends a sample point and rebuilds the outline.
    pub fn push_point(&mut self, point: Point) {
        self.points.push(point);
        self.rebuild_outline();
    }

    /// The ink parameters this stroke is rendered with.
    #[must_use]
    pub fn ink_options(&self) -> InkOptions {
        InkOptions {
            size: self.thickness,
            ..InkOptions::default()
        }
    }

    fn rebuild_outline(&mut self) {
        self.outline = stroke_outline(&self.points, &self.ink_options());
    }
}
