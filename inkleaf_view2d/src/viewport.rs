// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};

/// Smallest permitted zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest permitted zoom factor.
pub const ZOOM_MAX: f64 = 10.0;

/// Scroll + zoom camera over the document plane.
///
/// `Viewport` tracks the view size in device pixels, a scroll offset in
/// document units, and a uniform zoom factor. It can be used to:
/// - Convert points between screen/device and document coordinates.
/// - Pan with edge clamping against a caller-supplied document extent.
/// - Zoom around a chosen screen pivot while keeping the document point
///   under the pivot visually fixed.
#[derive(Clone, Debug)]
pub struct Viewport {
    view_size: Size,
    scroll: Vec2,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Viewport {
    /// Creates a viewport covering `view_size` device pixels.
    ///
    /// - Initial zoom is `1.0`, initial scroll is zero (document origin maps
    ///   to the view origin).
    /// - Zoom is clamped to `[ZOOM_MIN, ZOOM_MAX]`.
    #[must_use]
    pub fn new(view_size: Size) -> Self {
        Self {
            view_size,
            scroll: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: ZOOM_MIN,
            max_zoom: ZOOM_MAX,
        }
    }

    /// Returns the view size in device pixels.
    #[must_use]
    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Sets the view size in device pixels (window/canvas resize).
    pub fn set_view_size(&mut self, size: Size) {
        self.view_size = size;
    }

    /// Returns the current scroll offset in document units.
    #[must_use]
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Returns the current uniform zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the minimum and maximum zoom factors.
    ///
    /// The range is normalized so that `min <= max`; the current zoom is
    /// clamped into the new range.
    pub fn set_zoom_limits(&mut self, min: f64, max: f64) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_zoom = min;
        self.max_zoom = max;
        self.zoom = self.zoom.clamp(min, max);
    }

    /// Converts a screen/device point into document space.
    #[must_use]
    pub fn screen_to_document(&self, p: Point) -> Point {
        Point::new(p.x / self.zoom - self.scroll.x, p.y / self.zoom - self.scroll.y)
    }

    /// Converts a document point into screen/device space.
    #[must_use]
    pub fn document_to_screen(&self, p: Point) -> Point {
        Point::new(
            (p.x + self.scroll.x) * self.zoom,
            (p.y + self.scroll.y) * self.zoom,
        )
    }

    /// Converts a screen-space delta into document units.
    #[must_use]
    pub fn screen_delta_to_document(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Returns the document-space rectangle currently visible through the
    /// view. Used for page and stroke culling.
    #[must_use]
    pub fn visible_document_rect(&self) -> Rect {
        let top_left = Point::new(-self.scroll.x, -self.scroll.y);
        Rect::new(
            top_left.x,
            top_left.y,
            self.view_size.width / self.zoom - self.scroll.x,
            self.view_size.height / self.zoom - self.scroll.y,
        )
    }

    /// Pans by a screen-space delta, clamped against the document extent.
    ///
    /// A positive `delta.x` moves content to the right (revealing content on
    /// the left), matching the scroll convention of the input layer. Each
    /// axis is clamped independently:
    /// - content may be scrolled until its trailing (right/bottom) edge
    ///   meets the trailing viewport edge, but not past it;
    /// - content's leading (left/top) edge may meet the leading viewport
    ///   edge, but not be pulled past it.
    ///
    /// An axis already at (or, after a zoom change, beyond) its bound only
    /// accepts movement back toward the valid range. Returns `true` if the
    /// scroll offset changed.
    pub fn pan(&mut self, delta: Vec2, extent: Size) -> bool {
        let doc_delta = delta / self.zoom;
        let new_x = self.clamp_axis(
            self.scroll.x,
            doc_delta.x,
            self.view_size.width / self.zoom - extent.width,
        );
        let new_y = self.clamp_axis(
            self.scroll.y,
            doc_delta.y,
            self.view_size.height / self.zoom - extent.height,
        );
        let changed = new_x != self.scroll.x || new_y != self.scroll.y;
        self.scroll = Vec2::new(new_x, new_y);
        changed
    }

    /// One-axis clamp: `trailing_bound` is the (usually negative) scroll
    /// value at which the trailing content edge meets the trailing viewport
    /// edge; `0.0` is where the leading edges meet.
    fn clamp_axis(&self, current: f64, delta: f64, trailing_bound: f64) -> f64 {
        let next = current + delta;
        if delta > 0.0 {
            next.min(current.max(0.0))
        } else if delta < 0.0 {
            next.max(current.min(trailing_bound))
        } else {
            current
        }
    }

    /// Pans by a screen-space delta without edge clamping.
    ///
    /// Used internally for the pivot dance in [`Viewport::zoom_at`]; edge
    /// clamping there would break the pivot invariant.
    fn scroll_by_screen(&mut self, delta: Vec2) {
        self.scroll += delta / self.zoom;
    }

    /// Zooms by `factor` while keeping the document point under the screen
    /// point `pivot` visually fixed.
    ///
    /// Rejected (returns `false`) when the zoom already sits at a bound and
    /// `factor` would push it further outside; movement back toward the
    /// valid range is always accepted. A `factor` that would cross a bound
    /// is clamped to land exactly on it.
    pub fn zoom_at(&mut self, factor: f64, pivot: Point) -> bool {
        if factor <= 0.0 {
            return false;
        }
        if factor > 1.0 && self.zoom >= self.max_zoom {
            return false;
        }
        if factor < 1.0 && self.zoom <= self.min_zoom {
            return false;
        }

        let pivot = pivot.to_vec2();
        self.scroll_by_screen(-pivot);
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        self.scroll_by_screen(pivot);
        true
    }

    /// Centers content of the given width horizontally when the viewport is
    /// wider than the scaled content. Runs after a zoom animation settles.
    pub fn horizontally_center(&mut self, content_width: f64) {
        let view_width_doc = self.view_size.width / self.zoom;
        if view_width_doc > content_width {
            self.scroll.x = (view_width_doc - content_width) / 2.0;
        }
    }
}
