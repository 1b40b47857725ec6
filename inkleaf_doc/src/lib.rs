// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document state for Inkleaf.
//!
//! This crate owns everything about a note that survives a frame: the
//! committed [`Stroke`]s, the page backgrounds they sit on, the
//! [`StrokeCapture`] state machine that turns pointer samples into strokes,
//! the eraser, and the JSON save format.
//!
//! Everything here is in document space. Converting from screen coordinates,
//! and deciding when to call these APIs at all, is the surface crate's job.
//!
//! ```
//! use inkleaf_doc::{Document, PageImage, StrokeCapture};
//! use inkleaf_geom::Point;
//! use peniko::Color;
//!
//! let mut doc = Document::new();
//! doc.set_pages(vec![PageImage {
//!     source: String::from("page-1.png"),
//!     width: 400.0,
//!     height: 600.0,
//! }]);
//!
//! let mut capture = StrokeCapture::new(true);
//! capture.begin(Point::new(10.0, 10.0), Color::BLACK, 5.0);
//! capture.extend(Point::new(60.0, 40.0), 1.0);
//! if let Some(stroke) = capture.end() {
//!     doc.commit(stroke);
//! }
//! assert_eq!(doc.strokes().len(), 1);
//! ```

mod capture;
mod document;
mod save;
mod stroke;

pub use capture::{INTERPOLATE_DIST, StrokeCapture};
pub use document::{Document, ERASE_RADIUS, PAGE_GAP, PageImage};
pub use save::{DocumentError, LoadedNote, load_note, save_note};
pub use stroke::Stroke;
