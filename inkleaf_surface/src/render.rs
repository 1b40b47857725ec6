// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render pipeline: document state becomes a frame of render ops.

use inkleaf_imaging::{ImageDesc, RenderBackend, RenderOp};
use kurbo::{Affine, Circle, Point, Rect, Shape};
use peniko::Color;

use crate::surface::Surface;

/// Fill behind and between the pages.
pub const BACKDROP_COLOUR: Color = Color::from_rgb8(0x33, 0x33, 0x33);

/// Page fill drawn under the background image.
const PAGE_FILL: Color = Color::WHITE;

/// Page border colour.
const PAGE_BORDER: Color = Color::BLACK;

/// Debug overlay dot colour.
const DEBUG_DOT: Color = Color::from_rgb8(0xff, 0x00, 0x00);

/// Debug overlay dot radius in device pixels.
const DEBUG_DOT_RADIUS: f64 = 2.0;

impl Surface {
    /// Renders a full frame.
    ///
    /// Op order is fixed: an identity-transform clear, the backdrop, the
    /// in-view pages (fill, image, border), the in-view committed strokes,
    /// the active stroke, and finally the debug overlay when enabled.
    ///
    /// Strokes, committed and active alike, are culled by their sample
    /// points: a stroke is drawn when any sample lies in the visible
    /// rectangle. A stroke whose every sample is outside the view but whose
    /// outline still crosses it is dropped; at the erase radius strokes are
    /// too small for the gap to show in practice.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) {
        self.ensure_images(backend);

        backend.apply(RenderOp::SetTransform(Affine::IDENTITY));
        backend.apply(RenderOp::Clear);
        backend.apply(RenderOp::FillRect {
            rect: Rect::from_origin_size(Point::ZERO, self.viewport.view_size()),
            colour: BACKDROP_COLOUR,
        });

        backend.apply(RenderOp::SetTransform(self.view_transform()));
        let visible = self.viewport.visible_document_rect();

        for (index, page) in self.document.pages().iter().enumerate() {
            let Some(rect) = self.document.page_rect(index) else {
                continue;
            };
            if !rects_overlap(rect, visible) {
                continue;
            }
            backend.apply(RenderOp::FillRect {
                rect,
                colour: PAGE_FILL,
            });
            if let Some(&image) = self.images.get(&page.source) {
                backend.apply(RenderOp::DrawImage {
                    image,
                    origin: rect.origin(),
                });
            }
            backend.apply(RenderOp::StrokeRect {
                rect,
                colour: PAGE_BORDER,
                width: 1.0,
            });
        }

        for stroke in self.document.strokes() {
            if stroke.points().iter().any(|p| visible.contains(p.pos())) {
                backend.apply(RenderOp::FillPath {
                    path: stroke.outline().clone(),
                    colour: stroke.colour(),
                });
            }
        }

        if let Some(active) = self.capture.active()
            && active.points().iter().any(|p| visible.contains(p.pos()))
        {
            backend.apply(RenderOp::FillPath {
                path: active.outline().clone(),
                colour: active.colour(),
            });
        }

        if self.options.debug {
            self.render_debug(backend, visible);
        }
    }

    /// Cheap re-render of just the active stroke, used between full frames
    /// while a stroke is being captured.
    pub(crate) fn render_active(&mut self, backend: &mut dyn RenderBackend) {
        let Some(active) = self.capture.active() else {
            return;
        };
        let visible = self.viewport.visible_document_rect();
        if !active.points().iter().any(|p| visible.contains(p.pos())) {
            return;
        }
        backend.apply(RenderOp::SetTransform(self.view_transform()));
        backend.apply(RenderOp::FillPath {
            path: active.outline().clone(),
            colour: active.colour(),
        });
    }

    /// Overlays every in-view sample point as a small red dot.
    fn render_debug(&self, backend: &mut dyn RenderBackend, visible: Rect) {
        let radius = DEBUG_DOT_RADIUS / self.viewport.zoom();
        let committed = self
            .document
            .strokes()
            .iter()
            .filter(|s| s.points().iter().any(|p| visible.contains(p.pos())));
        for stroke in committed.chain(self.capture.active()) {
            for point in stroke.points() {
                backend.apply(RenderOp::FillPath {
                    path: Circle::new(point.pos(), radius).to_path(0.1),
                    colour: DEBUG_DOT,
                });
            }
        }
    }

    /// The document-to-screen transform of the current viewport.
    fn view_transform(&self) -> Affine {
        Affine::scale(self.viewport.zoom()) * Affine::translate(self.viewport.scroll())
    }

    /// Registers backend images for pages that do not have one yet.
    fn ensure_images(&mut self, backend: &mut dyn RenderBackend) {
        for page in self.document.pages() {
            if !self.images.contains_key(&page.source) {
                let id = backend.register_image(ImageDesc {
                    source: page.source.clone(),
                    width: page.width,
                    height: page.height,
                });
                self.images.insert(page.source.clone(), id);
            }
        }
    }
}

fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}
