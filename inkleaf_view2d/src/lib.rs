// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inkleaf View 2D: the viewport transform manager of the ink engine.
//!
//! This crate provides a small, headless model of the document camera:
//!
//! - [`Viewport`]: scroll offset and uniform zoom, with coordinate
//!   conversion between screen/device space and document space, pan
//!   clamping against the document extent, and pivot-anchored zooming.
//! - [`PanAnimation`] / [`ZoomAnimation`]: decaying per-frame steppers for
//!   smooth panning and zooming, with generation tokens so a newly started
//!   animation replaces an in-flight one instead of compounding with it.
//!   Pans get one stepper per axis, so the two axes animate independently.
//!
//! The crate does **not** own strokes, pages, or any rendering backend. The
//! host wires input events into pan/zoom operations, supplies the document
//! extent for clamping, and drives animation frames by calling `tick` on the
//! steppers once per frame.
//!
//! ## Coordinate model
//!
//! Document space is the unscaled, unscrolled space strokes and pages live
//! in. A screen point converts as `document = screen / zoom - scroll`, and
//! back as `screen = (document + scroll) * zoom`; the two are exact inverses
//! up to floating-point tolerance.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use inkleaf_view2d::Viewport;
//!
//! let mut view = Viewport::new(Size::new(800.0, 600.0));
//! view.zoom_at(2.0, Point::new(100.0, 100.0));
//!
//! let screen = Point::new(400.0, 300.0);
//! let doc = view.screen_to_document(screen);
//! let back = view.document_to_screen(doc);
//! assert!((back - screen).hypot() < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod anim;
mod viewport;

pub use anim::{PanAnimation, ZoomAnimation};
pub use viewport::{Viewport, ZOOM_MAX, ZOOM_MIN};
