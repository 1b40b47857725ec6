// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use inkleaf_geom::{Point, distance};
use kurbo::{Rect, Size};

use crate::Stroke;

/// Vertical gap between consecutive pages, in document units.
pub const PAGE_GAP: f64 = 20.0;

/// Eraser hit radius in document units.
///
/// Deliberately not scaled by zoom: the eraser grabs the same slice of the
/// page regardless of how far the view is zoomed in.
pub const ERASE_RADIUS: f64 = 10.0;

/// A page background image handle.
///
/// The engine never decodes image data; it lays the page out from the
/// reported dimensions and hands the `source` string to the render backend.
#[derive(Clone, Debug, PartialEq)]
pub struct PageImage {
    /// Backend-interpreted image reference (a URL, a path, a cache key).
    pub source: String,
    /// Page width in document units.
    pub width: f64,
    /// Page height in document units.
    pub height: f64,
}

/// One note: committed strokes plus the page backgrounds they sit on.
///
/// Pages are stacked vertically from `y = 0` with [`PAGE_GAP`] between
/// them. A document with zero pages accepts no drawing (no point lies on
/// any page) but is otherwise fully functional.
#[derive(Clone, Debug, Default)]
pub struct Document {
    strokes: Vec<Stroke>,
    pages: Vec<PageImage>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed strokes, in commit order.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// The page backgrounds, top to bottom.
    #[must_use]
    pub fn pages(&self) -> &[PageImage] {
        &self.pages
    }

    /// Commits a finished stroke.
    pub fn commit(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Replaces all strokes, for example when loading a saved note.
    pub fn set_strokes(&mut self, strokes: Vec<Stroke>) {
        self.strokes = strokes;
    }

    /// Replaces the page backgrounds wholesale.
    pub fn set_pages(&mut self, pages: Vec<PageImage>) {
        self.pages = pages;
    }

    /// Removes the first stroke with any sample within [`ERASE_RADIUS`] of
    /// `point`, at most one per call.
    ///
    /// Returns whether a stroke was removed.
    pub fn erase_at(&mut self, point: Point) -> bool {
        let hit = self.strokes.iter().position(|stroke| {
            stroke
                .points()
                .iter()
                .any(|&p| distance(p, point) <= ERASE_RADIUS)
        });
        match hit {
            Some(index) => {
                self.strokes.remove(index);
                true
            }
            None => false,
        }
    }

    /// The index of the page containing `point`, if any.
    ///
    /// Points inside an inter-page gap, beside a page, or in an empty
    /// document belong to no page.
    #[must_use]
    pub fn page_containing(&self, point: Point) -> Option<usize> {
        let mut top = 0.0;
        for (index, page) in self.pages.iter().enumerate() {
            if point.y >= top
                && point.y < top + page.height
                && point.x >= 0.0
                && point.x < page.width
            {
                return Some(index);
            }
            top += page.height + PAGE_GAP;
        }
        None
    }

    /// The document-space rectangle of page `index`.
    #[must_use]
    pub fn page_rect(&self, index: usize) -> Option<Rect> {
        let mut top = 0.0;
        for (i, page) in self.pages.iter().enumerate() {
            if i == index {
                return Some(Rect::new(0.0, top, page.width, top + page.height));
            }
            top += page.height + PAGE_GAP;
        }
        None
    }

    /// The overall content extent: the widest page by the stacked height,
    /// inter-page gaps included.
    #[must_use]
    pub fn extent(&self) -> Size {
        let width = self.pages.iter().fold(0.0_f64, |w, p| w.max(p.width));
        let mut height = 0.0;
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                height += PAGE_GAP;
            }
            height += page.height;
        }
        Size::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::Color;

    fn page(width: f64, height: f64) -> PageImage {
        PageImage {
            source: String::from("page"),
            width,
            height,
        }
    }

    fn dot_stroke(x: f64, y: f64) -> Stroke {
        Stroke::new(vec![Point::new(x, y)], Color::BLACK, 5.0)
    }

    #[test]
    fn pages_stack_with_gaps() {
        let mut doc = Document::new();
        doc.set_pages(vec![page(100.0, 200.0), page(150.0, 100.0)]);

        assert_eq!(doc.page_containing(Point::new(50.0, 10.0)), Some(0));
        // Inside the gap between the pages.
        assert_eq!(doc.page_containing(Point::new(50.0, 210.0)), None);
        assert_eq!(doc.page_containing(Point::new(50.0, 230.0)), Some(1));
        // Beside the narrower first page.
        assert_eq!(doc.page_containing(Point::new(120.0, 10.0)), None);

        assert_eq!(doc.extent(), Size::new(150.0, 320.0));
        assert_eq!(doc.page_rect(1), Some(Rect::new(0.0, 220.0, 150.0, 320.0)));
        assert_eq!(doc.page_rect(2), None);
    }

    #[test]
    fn empty_document_contains_nothing() {
        let doc = Document::new();
        assert_eq!(doc.page_containing(Point::new(0.0, 0.0)), None);
        assert_eq!(doc.extent(), Size::ZERO);
    }

    #[test]
    fn erase_removes_the_first_hit_only() {
        let mut doc = Document::new();
        doc.commit(dot_stroke(0.0, 0.0));
        doc.commit(dot_stroke(5.0, 0.0));
        doc.commit(dot_stroke(100.0, 100.0));

        // Both of the first two strokes are within radius; only the first
        // goes.
        assert!(doc.erase_at(Point::new(2.0, 0.0)));
        assert_eq!(doc.strokes().len(), 2);
        assert_eq!(doc.strokes()[0].points()[0].x, 5.0);

        assert!(!doc.erase_at(Point::new(50.0, 50.0)));
        assert_eq!(doc.strokes().len(), 2);
    }

    #[test]
    fn erase_radius_is_inclusive() {
        let mut doc = Document::new();
        doc.commit(dot_stroke(10.0, 0.0));
        assert!(doc.erase_at(Point::new(0.0, 0.0)));
    }
}
