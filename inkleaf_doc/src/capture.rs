// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use inkleaf_geom::{Point, distance};
use peniko::Color;

use crate::Stroke;

/// Screen-space gap above which synthetic points are inserted between two
/// captured samples.
pub const INTERPOLATE_DIST: f64 = 10.0;

/// The stroke-capture state machine.
///
/// A capture is either idle or carrying one in-progress stroke. Calls that
/// arrive out of order, an [`extend`](Self::extend) or [`end`](Self::end)
/// while idle, or a [`begin`](Self::begin) while drawing, are ignored rather
/// than corrupting the active stroke; input sources routinely deliver
/// duplicated or re-ordered event families.
#[derive(Clone, Debug)]
pub struct StrokeCapture {
    active: Option<Stroke>,
    interpolate: bool,
}

impl StrokeCapture {
    /// Creates an idle capture.
    ///
    /// When `interpolate` is set, fast pen movement is densified with
    /// linearly interpolated points so the outline stays smooth.
    #[must_use]
    pub fn new(interpolate: bool) -> Self {
        Self {
            active: None,
            interpolate,
        }
    }

    /// Whether a stroke is currently being captured.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// The in-progress stroke, when drawing.
    #[must_use]
    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    /// Starts a new stroke at `point`. Ignored while already drawing.
    ///
    /// The caller has already converted `point` to document space and
    /// verified it lands on a page.
    pub fn begin(&mut self, point: Point, colour: Color, thickness: f64) {
        if self.active.is_some() {
            return;
        }
        self.active = Some(Stroke::new(vec![point], colour, thickness));
    }

    /// Appends `point` to the active stroke. Ignored while idle.
    ///
    /// `zoom` is the current viewport zoom; the interpolation threshold is
    /// [`INTERPOLATE_DIST`] screen pixels, so it shrinks in document units
    /// as the view zooms in. When the gap from the previous sample exceeds
    /// the threshold, `floor(gap / threshold)` synthetic points are inserted
    /// at even spacing strictly between the two real samples, with pressure
    /// interpolated alongside position.
    pub fn extend(&mut self, point: Point, zoom: f64) {
        let Some(stroke) = self.active.as_mut() else {
            return;
        };
        let Some(&last) = stroke.points().last() else {
            return;
        };
        let threshold = INTERPOLATE_DIST / zoom;
        let gap = distance(last, point);
        if self.interpolate && gap > threshold {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "gap / threshold is bounded by practical input deltas"
            )]
            let count = (gap / threshold).floor() as usize;
            for i in 1..=count {
                let t = i as f64 / (count + 1) as f64;
                stroke.push_point(last.lerp(point, t));
            }
        }
        stroke.push_point(point);
    }

    /// Finishes the active stroke and returns it for committing.
    ///
    /// Returns `None` while idle.
    pub fn end(&mut self) -> Option<Stroke> {
        self.active.take()
    }
}
