// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Inkleaf drawing-surface engine.
//!
//! A [`Surface`] ties the other Inkleaf crates together: it owns one note's
//! document and viewport, turns normalized input events into stroke capture,
//! erasing, panning, and zooming, and emits each frame as render operations
//! into any [`inkleaf_imaging::RenderBackend`].
//!
//! The engine is headless and deterministic. The host owns the event loop,
//! the frame clock, and the pixels:
//!
//! - feed input with [`Surface::pointer_down`] and friends,
//!   [`Surface::wheel`], and the `touch_*` methods;
//! - while [`Surface::is_animating`], call [`Surface::tick_animations`] once
//!   per frame;
//! - persist on change via [`Surface::set_change_callback`] plus
//!   [`Surface::save`] and [`Surface::load`].
//!
//! ```
//! use inkleaf_imaging::RecordingBackend;
//! use inkleaf_surface::{PointerEvent, Surface, SurfaceOptions};
//! use inkleaf_doc::PageImage;
//!
//! let mut surface = Surface::new(800.0, 600.0, SurfaceOptions::default())?;
//! let mut backend = RecordingBackend::new();
//! surface.set_backgrounds(
//!     &mut backend,
//!     vec![PageImage {
//!         source: String::from("page-1.png"),
//!         width: 400.0,
//!         height: 600.0,
//!     }],
//! );
//!
//! let press = PointerEvent { x: 100.0, y: 100.0, pressure: None, primary: true };
//! surface.pointer_down(&mut backend, press);
//! surface.pointer_move(&mut backend, PointerEvent { x: 140.0, y: 120.0, ..press });
//! surface.pointer_up(&mut backend, PointerEvent { x: 140.0, y: 120.0, ..press });
//! assert_eq!(surface.document().strokes().len(), 1);
//! # Ok::<(), inkleaf_surface::SurfaceError>(())
//! ```

mod input;
mod render;
mod surface;

pub use input::{PointerEvent, SCROLL_STEP, TouchEvent, WheelEvent, ZOOM_STEP};
pub use render::BACKDROP_COLOUR;
pub use surface::{
    DEFAULT_PEN_COLOUR, DEFAULT_PEN_THICKNESS, Mode, Surface, SurfaceError, SurfaceOptions, Tool,
};
