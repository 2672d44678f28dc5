//! This module defines the slice-plane entity: a 2D image embedded in the 3D volume,
//! perpendicular to one principal axis, that can be dragged along its normal between integer
//! sample positions.
//!
//! The entity does not own any renderer state; it holds an opaque `NodeHandle` into whatever
//! renderer displays it, and closures that produce its image payload for a given position.

use log::debug;
use thiserror::Error;

use crate::axis::Axis;
use crate::rectangle::Rectangle;

/// Produces the image payload for a slice at a given integer position. A slice holds one of
/// these per displayed layer (a primary image plus any overlays).
pub type ImageSourceFn = Box<dyn Fn(i32) -> SliceImage>;

#[derive(Debug, Error)]
/// Construction and mutation errors for slice planes
pub enum SliceError {
    #[error("position {position} is outside the valid range [{lo}, {hi}]")]
    PositionOutOfRange { position: i32, lo: i32, hi: i32 },

    #[error("slice plane on axis {axis:?} was given no image source")]
    MissingImageSource { axis: Axis },
}

#[derive(Debug, Clone, PartialEq)]
/// A 2D array of samples, row-major
pub struct SliceImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl SliceImage {
    /// Build an image by evaluating `f` at every (column, row) pair
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(col, row));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// The closed interval of valid integer positions for a slice plane
pub struct SliceRange {
    pub lo: i32,
    pub hi: i32,
}

impl SliceRange {
    pub fn new(lo: i32, hi: i32) -> Self {
        Self { lo, hi }
    }

    pub fn contains(self, position: i32) -> bool {
        self.lo <= position && position <= self.hi
    }

    /// Truncate `offset` so that `position + offset` lands inside the range, exactly on the
    /// boundary when it would overshoot.
    pub fn clamp_offset(self, position: i32, offset: f32) -> f32 {
        let mut offset = offset;
        if position as f32 + offset < self.lo as f32 {
            offset = (self.lo - position) as f32;
        }
        if position as f32 + offset > self.hi as f32 {
            offset = (self.hi - position) as f32;
        }
        offset
    }

    /// Clamp an integer position into the range
    pub fn clamp(self, position: i32) -> i32 {
        position.max(self.lo).min(self.hi)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Opaque id of the renderable node that displays a slice, owned by the external renderer
pub struct NodeHandle(pub u64);

/// An axis-aligned slice plane inside the volume.
///
/// `position` only changes through `set_position` and `commit_drag`; everything else that moves
/// the plane goes through the drag solver, which accumulates into `pending_offset` first.
pub struct SlicePlane {
    axis: Axis,
    position: i32,
    range: SliceRange,
    /// Drag delta computed by the solver but not yet folded into `position`
    pub(crate) pending_offset: f32,
    /// In-plane grab point, present only while this plane is the active drag target
    pub(crate) anchor: Option<nalgebra_glm::Vec2>,
    /// Rendering hint driven by hover/selection
    pub highlight_visible: bool,
    image_sources: Vec<ImageSourceFn>,
    images: Vec<SliceImage>,
    extent: Rectangle,
    node: Option<NodeHandle>,
}

impl SlicePlane {
    /// Create a slice plane at `position` along `axis`. Fails when the position is outside the
    /// valid range or when no image source is supplied; the plane fetches its initial images
    /// eagerly so it is never in an unrenderable state.
    pub fn new(
        axis: Axis,
        position: i32,
        range: SliceRange,
        image_sources: Vec<ImageSourceFn>,
    ) -> Result<Self, SliceError> {
        if !range.contains(position) {
            return Err(SliceError::PositionOutOfRange {
                position,
                lo: range.lo,
                hi: range.hi,
            });
        }
        if image_sources.is_empty() {
            return Err(SliceError::MissingImageSource { axis });
        }

        let images: Vec<SliceImage> = image_sources.iter().map(|f| f(position)).collect();
        let extent = Rectangle::new(0.0, 0.0, images[0].width as f32, images[0].height as f32);
        Ok(Self {
            axis,
            position,
            range,
            pending_offset: 0.0,
            anchor: None,
            highlight_visible: false,
            image_sources,
            images,
            extent,
            node: None,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn range(&self) -> SliceRange {
        self.range
    }

    /// The in-plane extent of the slice image, in local coordinates
    pub fn extent(&self) -> Rectangle {
        self.extent
    }

    /// Current image payloads, primary first
    pub fn images(&self) -> &[SliceImage] {
        &self.images
    }

    pub fn anchor(&self) -> Option<nalgebra_glm::Vec2> {
        self.anchor
    }

    /// The transform placing this slice's local frame into the volume, recomputed on demand
    pub fn model_matrix(&self) -> nalgebra_glm::Mat4 {
        self.axis.model_matrix(self.position as f32)
    }

    /// Spatial extent of this plane along world axis `axis_3d` (0, 1 or 2), used by callers that
    /// auto-range a camera around the scene. The plane is flat along its own axis.
    pub fn bounds(&self, axis_3d: usize) -> (f32, f32) {
        let w = self.extent.size.x;
        let h = self.extent.size.y;
        let flat = (self.position as f32, self.position as f32);
        match (self.axis, axis_3d) {
            (Axis::Z, 0) => (0.0, w),
            (Axis::Z, 1) => (0.0, h),
            (Axis::Z, _) => flat,
            (Axis::Y, 0) => (0.0, w),
            (Axis::Y, 1) => flat,
            (Axis::Y, _) => (0.0, h),
            (Axis::X, 0) => flat,
            (Axis::X, 1) => (0.0, w),
            (Axis::X, _) => (0.0, h),
        }
    }

    /// Move the plane to an explicit position, refreshing its images
    pub fn set_position(&mut self, position: i32) -> Result<(), SliceError> {
        if !self.range.contains(position) {
            return Err(SliceError::PositionOutOfRange {
                position,
                lo: self.range.lo,
                hi: self.range.hi,
            });
        }
        self.position = position;
        self.refresh_images();
        Ok(())
    }

    /// Fold the pending drag offset into `position`, rounding to the nearest integer sample and
    /// clamping into the valid range, then refresh the images for the new position.
    pub fn commit_drag(&mut self) {
        let committed = (self.position as f32 + self.pending_offset).round() as i32;
        let committed = self.range.clamp(committed);
        if committed != self.position {
            debug!(
                "slice {:?} commit: {} -> {}",
                self.axis, self.position, committed
            );
            self.position = committed;
            self.refresh_images();
        }
        self.pending_offset = 0.0;
    }

    /// Drop the drag anchor, ending any in-progress drag bookkeeping
    pub fn clear_anchor(&mut self) {
        self.anchor = None;
        self.pending_offset = 0.0;
    }

    /// Associate this slice with its renderer-side node
    pub fn attach_node(&mut self, node: NodeHandle) {
        self.node = Some(node);
    }

    pub fn node(&self) -> Option<NodeHandle> {
        self.node
    }

    fn refresh_images(&mut self) {
        for (image, source) in self.images.iter_mut().zip(self.image_sources.iter()) {
            *image = source(self.position);
        }
    }
}
