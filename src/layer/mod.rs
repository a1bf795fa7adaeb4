//! The layer capability and the geometry shared between layers during a render walk.

pub(crate) mod caption;
pub(crate) mod card;

use crate::{
    foundation::{
        core::{Frame, Offset, Size},
        error::{SceneError, SceneResult},
    },
    render::canvas::Canvas,
};

/// Handle to a layer in a [`crate::Scene`]'s stack (its insertion index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub(crate) usize);

impl LayerId {
    /// Build a handle from a stack index.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the layer in the stack.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Frames resolved so far in a render walk, indexed by [`LayerId`].
///
/// Layers that were skipped (empty or failed) have no frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Placements {
    frames: Vec<Option<Frame>>,
}

impl Placements {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            frames: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, frame: Option<Frame>) {
        self.frames.push(frame);
    }

    /// Resolved frame of `id`, if that layer has already been painted.
    pub fn get(&self, id: LayerId) -> Option<Frame> {
        self.frames.get(id.0).copied().flatten()
    }

    /// Number of layers walked so far.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` before the first layer has been walked.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// A unit of visual content whose geometry depends on the canvas and earlier layers.
///
/// A [`crate::Scene`] calls `measure`, then `position`, then `render` for each layer in
/// stack order.
pub trait Layer: std::fmt::Debug {
    /// Short name used in logs and diagnostics.
    fn kind(&self) -> &'static str;

    /// Footprint of the layer on a canvas of `canvas` size.
    fn measure(&self, canvas: Size, placed: &Placements) -> SceneResult<Size>;

    /// Top-left corner for a layer of `size`. May be negative; painting clips.
    fn position(&self, canvas: Size, size: Size, placed: &Placements) -> SceneResult<Offset>;

    /// Paint onto `canvas` at `position`.
    fn render(&mut self, canvas: &mut Canvas, position: Offset, size: Size) -> SceneResult<()>;

    /// A non-fatal problem found while constructing the layer, which leaves it empty.
    fn unresolved(&self) -> Option<&SceneError> {
        None
    }
}

/// Floor of `(outer - inner) / 2`, the centering offset along one axis.
pub(crate) fn centered(outer: u32, inner: u32) -> i64 {
    (i64::from(outer) - i64::from(inner)).div_euclid(2)
}
