// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input normalization: pointer, wheel, and touch events become stroke
//! capture, erasing, panning, and zooming.

use inkleaf_geom::Point as InkPoint;
use inkleaf_imaging::RenderBackend;
use kurbo::{Point, Vec2};

use crate::surface::{Mode, Surface, Tool};

/// Device pixels scrolled per wheel notch.
pub const SCROLL_STEP: f64 = 50.0;

/// Zoom factor applied per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

/// A normalized mouse or pen event.
///
/// Coordinates are in device pixels relative to the surface origin.
#[derive(Clone, Copy, Debug)]
pub struct PointerEvent {
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Device-reported pressure, when the device has a pressure channel.
    pub pressure: Option<f64>,
    /// Whether this is the primary pointer of its family.
    pub primary: bool,
}

/// A normalized wheel event.
#[derive(Clone, Copy, Debug)]
pub struct WheelEvent {
    /// Cursor X position, the zoom pivot.
    pub x: f64,
    /// Cursor Y position, the zoom pivot.
    pub y: f64,
    /// Positive scrolls down / zooms out.
    pub delta_y: f64,
    /// Shift was held: scroll horizontally instead of vertically.
    pub shift: bool,
    /// Ctrl (or cmd) was held: zoom at the cursor instead of scrolling.
    pub ctrl: bool,
}

/// A normalized touch event for one touch point.
#[derive(Clone, Copy, Debug)]
pub struct TouchEvent {
    /// Stable identifier of this touch point across its lifetime.
    pub id: u64,
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Whether the device classified this touch as a stylus.
    pub stylus: bool,
    /// Device-reported pressure, when available.
    pub pressure: Option<f64>,
}

/// A live touch point tracked by the surface.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TouchPoint {
    pub(crate) id: u64,
    pub(crate) pos: Point,
    pub(crate) stylus: bool,
}

impl Surface {
    /// Handles a pointer press. Non-primary pointers are ignored.
    pub fn pointer_down(&mut self, backend: &mut dyn RenderBackend, event: PointerEvent) {
        if !event.primary {
            return;
        }
        self.press_at(backend, Point::new(event.x, event.y), event.pressure);
    }

    /// Handles pointer movement while a gesture may be in progress.
    pub fn pointer_move(&mut self, backend: &mut dyn RenderBackend, event: PointerEvent) {
        if !event.primary {
            return;
        }
        self.drag_at(backend, Point::new(event.x, event.y), event.pressure);
    }

    /// Handles a pointer release, committing any active stroke.
    pub fn pointer_up(&mut self, backend: &mut dyn RenderBackend, event: PointerEvent) {
        if !event.primary {
            return;
        }
        match self.mode {
            Mode::Drawing => self.finish_stroke(backend),
            Mode::Erasing => self.mode = Mode::Idle,
            Mode::Idle | Mode::PanZoom => {}
        }
    }

    /// Handles a wheel event: scroll, or zoom at the cursor with ctrl held.
    ///
    /// With the `smooth` option set, the movement is routed through the
    /// animation steppers and plays out over subsequent
    /// [`tick_animations`](Surface::tick_animations) calls; otherwise it is
    /// applied and rendered immediately.
    pub fn wheel(&mut self, backend: &mut dyn RenderBackend, event: WheelEvent) {
        if event.ctrl {
            let factor = if event.delta_y < 0.0 {
                ZOOM_STEP
            } else {
                1.0 / ZOOM_STEP
            };
            let pivot = Point::new(event.x, event.y);
            if self.options.smooth {
                self.zoom_pivot = pivot;
                self.zoom_token = Some(self.zoom_anim.start(factor));
            } else if self.viewport.zoom_at(factor, pivot) {
                self.render(backend);
            }
        } else {
            let step = -event.delta_y.signum() * SCROLL_STEP;
            if self.options.smooth {
                // Each pan axis has its own animation slot, so a horizontal
                // wheel does not cancel in-flight vertical travel.
                if event.shift {
                    self.pan_x_token = Some(self.pan_x_anim.start(step));
                } else {
                    self.pan_y_token = Some(self.pan_y_anim.start(step));
                }
            } else {
                let delta = if event.shift {
                    Vec2::new(step, 0.0)
                } else {
                    Vec2::new(0.0, step)
                };
                if self.viewport.pan(delta, self.document.extent()) {
                    self.render(backend);
                }
            }
        }
    }

    /// Handles a new touch point.
    ///
    /// The first touch either draws (stylus-classified, or any touch with
    /// the `treat_touch_as_stylus` option) or pans; a second touch upgrades
    /// a pan into a pinch. Touches beyond the second, and any touch landing
    /// while a stylus gesture is in progress, are ignored.
    pub fn touch_start(&mut self, backend: &mut dyn RenderBackend, event: TouchEvent) {
        if self.touches.iter().any(|t| t.id == event.id) {
            return;
        }
        if matches!(self.mode, Mode::Drawing | Mode::Erasing) || self.touches.len() == 2 {
            return;
        }
        let pos = Point::new(event.x, event.y);
        let stylus = event.stylus || self.options.treat_touch_as_stylus;
        self.touches.push(TouchPoint {
            id: event.id,
            pos,
            stylus,
        });
        if self.touches.len() == 1 && stylus {
            self.press_at(backend, pos, event.pressure);
        } else {
            self.mode = Mode::PanZoom;
        }
    }

    /// Handles movement of a tracked touch point.
    pub fn touch_move(&mut self, backend: &mut dyn RenderBackend, event: TouchEvent) {
        let Some(index) = self.touches.iter().position(|t| t.id == event.id) else {
            return;
        };
        let pos = Point::new(event.x, event.y);
        let prev = self.touches[index].pos;
        self.touches[index].pos = pos;

        match self.mode {
            Mode::Drawing | Mode::Erasing if self.touches[index].stylus => {
                self.drag_at(backend, pos, event.pressure);
            }
            Mode::PanZoom => {
                let extent = self.document.extent();
                let mut changed = false;
                if self.touches.len() == 2 {
                    let other = self.touches[1 - index].pos;
                    let d_prev = (prev - other).hypot();
                    let d_now = (pos - other).hypot();
                    if d_prev > 0.0 && d_now > 0.0 {
                        let factor = (d_now / d_prev).sqrt();
                        let midpoint = ((pos.to_vec2() + other.to_vec2()) / 2.0).to_point();
                        changed |= self.viewport.zoom_at(factor, midpoint);
                    }
                    if index == 0 {
                        changed |= self.viewport.pan(pos - prev, extent);
                    }
                } else {
                    changed = self.viewport.pan(pos - prev, extent);
                }
                if changed {
                    self.render(backend);
                }
            }
            Mode::Idle | Mode::Drawing | Mode::Erasing => {}
        }
    }

    /// Handles the end of a tracked touch point.
    pub fn touch_end(&mut self, backend: &mut dyn RenderBackend, event: TouchEvent) {
        let Some(index) = self.touches.iter().position(|t| t.id == event.id) else {
            return;
        };
        let was_stylus = self.touches[index].stylus;
        self.touches.remove(index);

        match self.mode {
            Mode::Drawing if was_stylus => self.finish_stroke(backend),
            Mode::Erasing if was_stylus => self.mode = Mode::Idle,
            Mode::PanZoom if self.touches.is_empty() => self.mode = Mode::Idle,
            _ => {}
        }
    }

    /// Starts a draw or erase gesture at a screen position.
    fn press_at(&mut self, backend: &mut dyn RenderBackend, screen: Point, pressure: Option<f64>) {
        if self.mode != Mode::Idle {
            return;
        }
        let point = self.doc_point(screen, pressure);
        if self.document.page_containing(point).is_none() {
            return;
        }
        match self.tool {
            Tool::Pen => {
                self.capture.begin(point, self.pen_colour, self.pen_thickness);
                self.mode = Mode::Drawing;
                self.render_active(backend);
            }
            Tool::Eraser => {
                self.mode = Mode::Erasing;
                if self.document.erase_at(point) {
                    log::debug!("erased stroke at ({:.1}, {:.1})", point.x, point.y);
                    self.notify_change();
                    self.render(backend);
                }
            }
        }
    }

    /// Continues a draw or erase gesture at a screen position.
    ///
    /// During a draw, every point refreshes the active outline cheaply and
    /// every tenth point triggers a full re-render; a point leaving all
    /// pages force-ends the stroke.
    fn drag_at(&mut self, backend: &mut dyn RenderBackend, screen: Point, pressure: Option<f64>) {
        let point = self.doc_point(screen, pressure);
        match self.mode {
            Mode::Drawing => {
                if self.document.page_containing(point).is_none() {
                    self.finish_stroke(backend);
                    return;
                }
                self.capture.extend(point, self.viewport.zoom());
                let count = self.capture.active().map_or(0, |s| s.points().len());
                if count % 10 == 0 {
                    self.render(backend);
                } else {
                    self.render_active(backend);
                }
            }
            Mode::Erasing => {
                if self.document.erase_at(point) {
                    self.notify_change();
                    self.render(backend);
                }
            }
            Mode::Idle | Mode::PanZoom => {}
        }
    }

    /// Commits the active stroke, fires the change callback, and re-renders.
    pub(crate) fn finish_stroke(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(stroke) = self.capture.end() {
            log::debug!("committing stroke with {} points", stroke.points().len());
            self.document.commit(stroke);
            self.notify_change();
        }
        self.mode = Mode::Idle;
        self.render(backend);
    }

    fn doc_point(&self, screen: Point, pressure: Option<f64>) -> InkPoint {
        let doc = self.viewport.screen_to_document(screen);
        InkPoint::with_pressure(
            doc.x,
            doc.y,
            pressure.unwrap_or(InkPoint::DEFAULT_PRESSURE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SurfaceOptions;
    use inkleaf_doc::PageImage;
    use inkleaf_imaging::{RecordingBackend, RenderOp};
    use std::cell::Cell;
    use std::rc::Rc;

    fn plain_surface() -> (Surface, RecordingBackend) {
        let mut surface = Surface::new(
            800.0,
            600.0,
            SurfaceOptions {
                smooth: false,
                ..SurfaceOptions::default()
            },
        )
        .unwrap();
        let mut backend = RecordingBackend::new();
        surface.set_backgrounds(
            &mut backend,
            vec![
                PageImage {
                    source: String::from("p1"),
                    width: 400.0,
                    height: 600.0,
                },
                PageImage {
                    source: String::from("p2"),
                    width: 400.0,
                    height: 600.0,
                },
            ],
        );
        (surface, backend)
    }

    fn pointer(x: f64, y: f64) -> PointerEvent {
        PointerEvent {
            x,
            y,
            pressure: None,
            primary: true,
        }
    }

    fn touch(id: u64, x: f64, y: f64, stylus: bool) -> TouchEvent {
        TouchEvent {
            id,
            x,
            y,
            stylus,
            pressure: None,
        }
    }

    #[test]
    fn pen_drag_captures_and_commits_a_stroke() {
        let (mut surface, mut backend) = plain_surface();
        let commits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&commits);
        surface.set_change_callback(move || seen.set(seen.get() + 1));

        surface.pointer_down(&mut backend, pointer(100.0, 100.0));
        assert_eq!(surface.mode(), Mode::Drawing);
        surface.pointer_move(&mut backend, pointer(105.0, 100.0));
        surface.pointer_move(&mut backend, pointer(110.0, 105.0));
        surface.pointer_up(&mut backend, pointer(110.0, 105.0));

        assert_eq!(surface.mode(), Mode::Idle);
        assert_eq!(surface.document().strokes().len(), 1);
        assert_eq!(commits.get(), 1);
        assert_eq!(surface.document().strokes()[0].points().len(), 3);
    }

    #[test]
    fn non_primary_pointers_are_ignored() {
        let (mut surface, mut backend) = plain_surface();
        let mut event = pointer(100.0, 100.0);
        event.primary = false;
        surface.pointer_down(&mut backend, event);
        assert_eq!(surface.mode(), Mode::Idle);
    }

    #[test]
    fn pressing_off_every_page_does_nothing() {
        let (mut surface, mut backend) = plain_surface();
        // x = 500 is right of the 400-wide pages.
        surface.pointer_down(&mut backend, pointer(500.0, 100.0));
        assert_eq!(surface.mode(), Mode::Idle);
        assert!(surface.document().strokes().is_empty());
    }

    #[test]
    fn leaving_the_pages_force_ends_the_stroke() {
        let (mut surface, mut backend) = plain_surface();
        surface.pointer_down(&mut backend, pointer(100.0, 100.0));
        surface.pointer_move(&mut backend, pointer(200.0, 100.0));
        surface.pointer_move(&mut backend, pointer(500.0, 100.0));

        assert_eq!(surface.mode(), Mode::Idle);
        assert_eq!(surface.document().strokes().len(), 1);
    }

    #[test]
    fn eraser_removes_at_most_one_stroke_per_event() {
        let (mut surface, mut backend) = plain_surface();
        for x in [100.0, 104.0] {
            surface.pointer_down(&mut backend, pointer(x, 100.0));
            surface.pointer_up(&mut backend, pointer(x, 100.0));
        }
        assert_eq!(surface.document().strokes().len(), 2);

        surface.set_tool(Tool::Eraser);
        surface.pointer_down(&mut backend, pointer(102.0, 100.0));
        assert_eq!(surface.mode(), Mode::Erasing);
        assert_eq!(surface.document().strokes().len(), 1);
        surface.pointer_up(&mut backend, pointer(102.0, 100.0));
        assert_eq!(surface.mode(), Mode::Idle);
    }

    #[test]
    fn every_tenth_point_triggers_a_full_render() {
        let (mut surface, mut backend) = plain_surface();
        surface.pointer_down(&mut backend, pointer(100.0, 100.0));
        backend.clear_ops();

        // Points 2..=9: cheap active re-renders only.
        for i in 1..9 {
            surface.pointer_move(&mut backend, pointer(100.0 + f64::from(i), 100.0));
        }
        let clears = |backend: &RecordingBackend| {
            backend
                .ops()
                .iter()
                .filter(|op| matches!(op, RenderOp::Clear))
                .count()
        };
        assert_eq!(clears(&backend), 0);

        // The tenth point re-renders everything.
        surface.pointer_move(&mut backend, pointer(110.0, 100.0));
        assert_eq!(clears(&backend), 1);
    }

    #[test]
    fn plain_wheel_scrolls_down_by_a_step() {
        let (mut surface, mut backend) = plain_surface();
        surface.wheel(
            &mut backend,
            WheelEvent {
                x: 0.0,
                y: 0.0,
                delta_y: 120.0,
                shift: false,
                ctrl: false,
            },
        );
        assert_eq!(surface.viewport().scroll().y, -SCROLL_STEP);
    }

    #[test]
    fn shift_wheel_scrolls_horizontally() {
        let mut surface = Surface::new(
            800.0,
            600.0,
            SurfaceOptions {
                smooth: false,
                ..SurfaceOptions::default()
            },
        )
        .unwrap();
        let mut backend = RecordingBackend::new();
        // Wider than the view, so there is room to scroll horizontally.
        surface.set_backgrounds(
            &mut backend,
            vec![PageImage {
                source: String::from("wide"),
                width: 2000.0,
                height: 600.0,
            }],
        );
        surface.wheel(
            &mut backend,
            WheelEvent {
                x: 0.0,
                y: 0.0,
                delta_y: 120.0,
                shift: true,
                ctrl: false,
            },
        );
        assert_eq!(surface.viewport().scroll().x, -SCROLL_STEP);
        assert_eq!(surface.viewport().scroll().y, 0.0);
    }

    #[test]
    fn ctrl_wheel_zooms_in_at_the_cursor() {
        let (mut surface, mut backend) = plain_surface();
        let cursor = Point::new(200.0, 150.0);
        let before = surface.viewport().screen_to_document(cursor);
        surface.wheel(
            &mut backend,
            WheelEvent {
                x: cursor.x,
                y: cursor.y,
                delta_y: -120.0,
                shift: false,
                ctrl: true,
            },
        );
        assert!((surface.viewport().zoom() - ZOOM_STEP).abs() < 1e-12);
        let after = surface.viewport().screen_to_document(cursor);
        assert!((before - after).hypot() < 1e-9);
    }

    #[test]
    fn single_finger_touch_pans() {
        let (mut surface, mut backend) = plain_surface();
        // Make room to pan up by scrolling down first.
        surface.wheel(
            &mut backend,
            WheelEvent {
                x: 0.0,
                y: 0.0,
                delta_y: 120.0,
                shift: false,
                ctrl: false,
            },
        );
        let start = surface.viewport().scroll().y;

        surface.touch_start(&mut backend, touch(1, 300.0, 300.0, false));
        assert_eq!(surface.mode(), Mode::PanZoom);
        surface.touch_move(&mut backend, touch(1, 300.0, 320.0, false));
        assert_eq!(surface.viewport().scroll().y, start + 20.0);
        surface.touch_end(&mut backend, touch(1, 300.0, 320.0, false));
        assert_eq!(surface.mode(), Mode::Idle);
    }

    #[test]
    fn stylus_touch_draws() {
        let (mut surface, mut backend) = plain_surface();
        surface.touch_start(&mut backend, touch(1, 100.0, 100.0, true));
        assert_eq!(surface.mode(), Mode::Drawing);
        surface.touch_move(&mut backend, touch(1, 120.0, 110.0, true));
        surface.touch_end(&mut backend, touch(1, 120.0, 110.0, true));
        assert_eq!(surface.document().strokes().len(), 1);
    }

    #[test]
    fn treat_touch_as_stylus_lets_fingers_draw() {
        let mut surface = Surface::new(
            800.0,
            600.0,
            SurfaceOptions {
                smooth: false,
                treat_touch_as_stylus: true,
                ..SurfaceOptions::default()
            },
        )
        .unwrap();
        let mut backend = RecordingBackend::new();
        surface.set_backgrounds(
            &mut backend,
            vec![PageImage {
                source: String::from("p1"),
                width: 400.0,
                height: 600.0,
            }],
        );

        surface.touch_start(&mut backend, touch(1, 100.0, 100.0, false));
        assert_eq!(surface.mode(), Mode::Drawing);
    }

    #[test]
    fn pinch_zooms_by_the_square_root_of_the_distance_ratio() {
        let (mut surface, mut backend) = plain_surface();
        surface.touch_start(&mut backend, touch(1, 300.0, 300.0, false));
        surface.touch_start(&mut backend, touch(2, 400.0, 300.0, false));
        assert_eq!(surface.mode(), Mode::PanZoom);

        // Second finger moves out: distance 100 -> 200.
        surface.touch_move(&mut backend, touch(2, 500.0, 300.0, false));
        assert!((surface.viewport().zoom() - 2.0_f64.sqrt()).abs() < 1e-12);

        // Lifting one finger falls back to a pan with the other.
        surface.touch_end(&mut backend, touch(2, 500.0, 300.0, false));
        assert_eq!(surface.mode(), Mode::PanZoom);
        surface.touch_end(&mut backend, touch(1, 300.0, 300.0, false));
        assert_eq!(surface.mode(), Mode::Idle);
    }

    #[test]
    fn extra_touches_during_a_stylus_stroke_are_ignored() {
        let (mut surface, mut backend) = plain_surface();
        surface.touch_start(&mut backend, touch(1, 100.0, 100.0, true));
        surface.touch_start(&mut backend, touch(2, 300.0, 300.0, false));
        assert_eq!(surface.mode(), Mode::Drawing);
        surface.touch_end(&mut backend, touch(1, 100.0, 100.0, true));
        assert_eq!(surface.document().strokes().len(), 1);
    }
}
