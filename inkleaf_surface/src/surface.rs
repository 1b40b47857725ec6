// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use hashbrown::HashMap;
use inkleaf_doc::{Document, DocumentError, PageImage, StrokeCapture, load_note, save_note};
use inkleaf_imaging::{ImageId, RenderBackend};
use inkleaf_view2d::{PanAnimation, Viewport, ZoomAnimation};
use kurbo::{Point, Size, Vec2};
use peniko::Color;
use smallvec::SmallVec;
use thiserror::Error;

use crate::input::TouchPoint;

/// Errors produced by the drawing surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The surface was created with a non-positive width or height.
    #[error("surface dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width in device pixels.
        width: f64,
        /// Requested height in device pixels.
        height: f64,
    },
    /// A note failed to save or load.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// The active tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    /// Draw ink strokes.
    #[default]
    Pen,
    /// Remove strokes under the pointer.
    Eraser,
}

/// What the surface is currently doing with the pointer.
///
/// Modes are mutually exclusive; an active stroke capture exists exactly
/// while the mode is [`Mode::Drawing`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Capturing an ink stroke.
    Drawing,
    /// Erasing under a held-down pointer.
    Erasing,
    /// A touch pan or pinch gesture is in progress.
    PanZoom,
}

/// Behaviour switches for a [`Surface`].
#[derive(Clone, Copy, Debug)]
pub struct SurfaceOptions {
    /// Animate wheel pans and zooms instead of jumping.
    pub smooth: bool,
    /// Densify fast pen movement with interpolated points.
    pub linear_interpolation: bool,
    /// Let any single touch draw, not just stylus-classified ones.
    pub treat_touch_as_stylus: bool,
    /// Overlay each captured sample point as a small red dot.
    pub debug: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            smooth: true,
            linear_interpolation: true,
            treat_touch_as_stylus: false,
            debug: false,
        }
    }
}

/// Default pen colour.
pub const DEFAULT_PEN_COLOUR: Color = Color::BLACK;

/// Default pen diameter in document units.
pub const DEFAULT_PEN_THICKNESS: f64 = 5.0;

/// The drawing-surface engine.
///
/// A `Surface` owns one note's [`Document`], the [`Viewport`] it is seen
/// through, and all gesture state. It is headless: the host feeds it input
/// events and a frame clock, and it emits render operations into any
/// [`RenderBackend`].
///
/// The surface never renders of its own accord before the host has supplied
/// backgrounds; a host loading a note should resolve the background sources
/// returned by [`Surface::load`], install them with
/// [`Surface::set_backgrounds`], and only then present the first frame.
pub struct Surface {
    pub(crate) document: Document,
    pub(crate) viewport: Viewport,
    pub(crate) capture: StrokeCapture,
    pub(crate) options: SurfaceOptions,
    pub(crate) tool: Tool,
    pub(crate) mode: Mode,
    pub(crate) pen_colour: Color,
    pub(crate) pen_thickness: f64,
    pub(crate) pan_x_anim: PanAnimation,
    pub(crate) pan_x_token: Option<u64>,
    pub(crate) pan_y_anim: PanAnimation,
    pub(crate) pan_y_token: Option<u64>,
    pub(crate) zoom_anim: ZoomAnimation,
    pub(crate) zoom_token: Option<u64>,
    pub(crate) zoom_pivot: Point,
    pub(crate) images: HashMap<String, ImageId>,
    pub(crate) touches: SmallVec<[TouchPoint; 2]>,
    pub(crate) on_change: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("document", &self.document)
            .field("viewport", &self.viewport)
            .field("options", &self.options)
            .field("tool", &self.tool)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Creates a surface of the given device-pixel size.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidDimensions`] when either dimension is
    /// not strictly positive; there is no degraded zero-size mode.
    pub fn new(width: f64, height: f64, options: SurfaceOptions) -> Result<Self, SurfaceError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        log::debug!("creating {width}x{height} surface");
        Ok(Self {
            document: Document::new(),
            viewport: Viewport::new(Size::new(width, height)),
            capture: StrokeCapture::new(options.linear_interpolation),
            options,
            tool: Tool::default(),
            mode: Mode::default(),
            pen_colour: DEFAULT_PEN_COLOUR,
            pen_thickness: DEFAULT_PEN_THICKNESS,
            pan_x_anim: PanAnimation::new(),
            pan_x_token: None,
            pan_y_anim: PanAnimation::new(),
            pan_y_token: None,
            zoom_anim: ZoomAnimation::new(),
            zoom_token: None,
            zoom_pivot: Point::ZERO,
            images: HashMap::new(),
            touches: SmallVec::new(),
            on_change: None,
        })
    }

    /// The note being edited.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The viewport the note is seen through.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The current gesture mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switches tools. A gesture in progress keeps its original tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Sets the pen colour for subsequent strokes.
    pub fn set_pen_colour(&mut self, colour: Color) {
        self.pen_colour = colour;
    }

    /// Sets the pen diameter, in document units, for subsequent strokes.
    pub fn set_pen_thickness(&mut self, thickness: f64) {
        self.pen_thickness = thickness;
    }

    /// Installs the change callback.
    ///
    /// The callback fires after every committed mutation of the note, a
    /// stroke commit or a successful erase, and is fire-and-forget: the
    /// surface neither awaits nor observes whatever persistence it triggers.
    pub fn set_change_callback(&mut self, callback: impl FnMut() + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Resizes the surface. The host renders when it is ready to present.
    pub fn set_view_size(&mut self, width: f64, height: f64) {
        self.viewport.set_view_size(Size::new(width, height));
    }

    /// Serializes the note to its JSON save format.
    pub fn save(&self) -> Result<String, SurfaceError> {
        Ok(save_note(&self.document)?)
    }

    /// Loads a note from its JSON save format.
    ///
    /// Strokes are installed immediately, with their outlines rebuilt. Pages
    /// are cleared; the returned background sources are for the host to
    /// resolve into sized [`PageImage`]s and pass to
    /// [`Surface::set_backgrounds`], after which the first frame can be
    /// rendered.
    pub fn load(&mut self, json: &str) -> Result<Vec<String>, SurfaceError> {
        let note = load_note(json)?;
        log::info!(
            "loaded note: {} strokes, {} backgrounds",
            note.strokes.len(),
            note.backgrounds.len()
        );
        self.cancel_gesture();
        self.document.set_strokes(note.strokes);
        self.document.set_pages(Vec::new());
        Ok(note.backgrounds)
    }

    /// Replaces the page backgrounds wholesale and re-renders.
    ///
    /// Previously registered background images that no longer appear are
    /// released from the backend.
    pub fn set_backgrounds(&mut self, backend: &mut dyn RenderBackend, pages: Vec<PageImage>) {
        self.document.set_pages(pages);
        let live = self.document.pages();
        let stale: Vec<(String, ImageId)> = self
            .images
            .iter()
            .filter(|(source, _)| !live.iter().any(|p| p.source == **source))
            .map(|(source, id)| (source.clone(), *id))
            .collect();
        for (source, id) in stale {
            backend.destroy_image(id);
            self.images.remove(&source);
        }
        self.render(backend);
    }

    /// Advances any in-flight pan or zoom animation by one frame.
    ///
    /// Call once per frame while it returns `true`. Re-renders whenever the
    /// view moved. When a zoom animation settles, content narrower than the
    /// view is recentred horizontally.
    pub fn tick_animations(&mut self, backend: &mut dyn RenderBackend) -> bool {
        let mut moved = false;
        let extent = self.document.extent();
        if let Some(token) = self.pan_x_token {
            match self.pan_x_anim.tick(token) {
                Some(step) => {
                    if self.viewport.pan(Vec2::new(step, 0.0), extent) {
                        moved = true;
                    } else {
                        // Ran into a document edge; let the animation die.
                        self.pan_x_token = None;
                    }
                }
                None => self.pan_x_token = None,
            }
        }
        if let Some(token) = self.pan_y_token {
            match self.pan_y_anim.tick(token) {
                Some(step) => {
                    if self.viewport.pan(Vec2::new(0.0, step), extent) {
                        moved = true;
                    } else {
                        self.pan_y_token = None;
                    }
                }
                None => self.pan_y_token = None,
            }
        }
        if let Some(token) = self.zoom_token {
            match self.zoom_anim.tick(token) {
                Some(factor) => {
                    if self.viewport.zoom_at(factor, self.zoom_pivot) {
                        moved = true;
                    } else {
                        self.zoom_token = None;
                    }
                }
                None => {
                    self.zoom_token = None;
                    self.viewport.horizontally_center(self.document.extent().width);
                    moved = true;
                }
            }
        }
        if moved {
            self.render(backend);
        }
        self.is_animating()
    }

    /// Whether a pan or zoom animation is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.pan_x_token.is_some() || self.pan_y_token.is_some() || self.zoom_token.is_some()
    }

    /// Fires the change callback, if any.
    pub(crate) fn notify_change(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback();
        }
    }

    /// Drops any gesture in progress without committing it.
    pub(crate) fn cancel_gesture(&mut self) {
        self.capture.end();
        self.touches.clear();
        self.mode = Mode::Idle;
    }
}
