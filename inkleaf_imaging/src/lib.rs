// Copyright 2025 the Inkleaf Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inkleaf Imaging: backend-agnostic render operations and backend traits.
//!
//! The drawing surface does not render pixels itself. It emits a short,
//! plain-old-data sequence of [`RenderOp`]s each frame and hands them to a
//! [`RenderBackend`]: a canvas binding in a browser host, a rasterizer in a
//! native host, or the in-memory [`RecordingBackend`] in tests.
//!
//! # Core concepts
//!
//! - **Images**: page backgrounds are opaque handles ([`ImageId`]) registered
//!   up front with [`RenderBackend::register_image`] from an [`ImageDesc`].
//!   The engine never sees pixel data.
//! - **Render operations**: [`RenderOp`] carries geometry inline. Paths are
//!   rebuilt every frame from live document state, so there is nothing to
//!   gain from a path resource table; images are the only retained resource.
//! - **Paints**: solid colours only. Ink and page chrome never need
//!   gradients, so each draw op names its [`peniko::Color`] directly.
//!
//! All geometry in a [`RenderOp`] is in document space under the most recent
//! [`RenderOp::SetTransform`], except [`RenderOp::Clear`] and backdrop fills
//! issued under the identity transform.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Color;

/// Identifier for a registered page-background image.
///
/// A small, opaque handle that is stable for the lifetime of the resource.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Description of a page-background image.
///
/// The `source` string is interpreted by the backend (a URL, a file path, a
/// texture cache key). The engine only uses the reported dimensions, which
/// are in document units.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageDesc {
    /// Backend-interpreted image reference.
    pub source: String,
    /// Image width in document units.
    pub width: f64,
    /// Image height in document units.
    pub height: f64,
}

/// A single render operation.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOp {
    /// Set the transform applied to subsequent geometry.
    SetTransform(Affine),
    /// Clear the whole output, ignoring the current transform.
    Clear,
    /// Fill an axis-aligned rectangle with a solid colour.
    FillRect {
        /// Rectangle to fill, under the current transform.
        rect: Rect,
        /// Fill colour.
        colour: Color,
    },
    /// Stroke the border of an axis-aligned rectangle.
    StrokeRect {
        /// Rectangle to outline, under the current transform.
        rect: Rect,
        /// Stroke colour.
        colour: Color,
        /// Stroke width in the current transform's units.
        width: f64,
    },
    /// Fill a closed path with a solid colour, non-zero winding.
    FillPath {
        /// Path to fill, under the current transform.
        path: BezPath,
        /// Fill colour.
        colour: Color,
    },
    /// Draw a registered image with its top-left corner at `origin`.
    DrawImage {
        /// Image to draw.
        image: ImageId,
        /// Top-left corner, under the current transform.
        origin: Point,
    },
}

/// Minimal render backend trait.
///
/// Backends consume operations in the order they are issued; a frame is the
/// op sequence between two [`RenderOp::Clear`]s. Backends own their image
/// storage and must keep an [`ImageId`] valid until it is dropped with
/// [`RenderBackend::destroy_image`].
pub trait RenderBackend {
    /// Register an image resource, returning its handle.
    fn register_image(&mut self, desc: ImageDesc) -> ImageId;

    /// Release a previously registered image.
    fn destroy_image(&mut self, id: ImageId);

    /// Apply a render operation.
    fn apply(&mut self, op: RenderOp);
}

/// An in-memory backend that appends every operation to a log.
///
/// This is the test double for the render pipeline: tests drive the surface,
/// then assert on the recorded op sequence instead of on pixels.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    images: Vec<Option<ImageDesc>>,
    ops: Vec<RenderOp>,
}

impl RecordingBackend {
    /// Creates an empty recording backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded operations, in application order.
    #[must_use]
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// The operations of the most recent frame: everything from the last
    /// [`RenderOp::Clear`] on, or the whole log when nothing cleared yet.
    #[must_use]
    pub fn last_frame(&self) -> &[RenderOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, RenderOp::Clear))
            .unwrap_or(0);
        &self.ops[start..]
    }

    /// The descriptor a handle was registered with, when still alive.
    #[must_use]
    pub fn image(&self, id: ImageId) -> Option<&ImageDesc> {
        self.images.get(id.0 as usize)?.as_ref()
    }

    /// Drops the recorded operations, keeping registered images.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn register_image(&mut self, desc: ImageDesc) -> ImageId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "image registrations are bounded by page count"
        )]
        let id = ImageId(self.images.len() as u32);
        self.images.push(Some(desc));
        id
    }

    fn destroy_image(&mut self, id: ImageId) {
        if let Some(slot) = self.images.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn apply(&mut self, op: RenderOp) {
        self.ops.push(op);
    }
}
