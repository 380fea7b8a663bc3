//! Frame sources: what gets drawn for a given frame index.
//!
//! A [`FrameSource`] is either an [`ImageSequence`] (decoded frames composited with cover-fit) or
//! a procedural [`FrameRenderer`]. The controller picks the variant; renderers never branch on
//! whether images happen to be loaded.

pub(crate) mod image_seq;
pub(crate) mod procedural;

use std::sync::Arc;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::ScrubResult;
use crate::render::surface::DrawTarget;
use crate::render::text::FontBytes;

pub use image_seq::{ImageSequence, cover_fit};
pub use procedural::DefaultFrameRenderer;

/// Procedural frame drawing.
///
/// Implementations must be pure: the pixels produced depend only on `(index, total, width,
/// height)` so that scrubbing back and forth is reproducible.
pub trait FrameRenderer: Send + Sync {
    /// Draw frame `index` of `total` into a `width` x `height` logical-pixel target.
    fn render(
        &self,
        target: &mut DrawTarget<'_>,
        index: u32,
        total: u32,
        width: f64,
        height: f64,
    ) -> ScrubResult<()>;
}

impl<F> FrameRenderer for F
where
    F: Fn(&mut DrawTarget<'_>, u32, u32, f64, f64) -> ScrubResult<()> + Send + Sync,
{
    fn render(
        &self,
        target: &mut DrawTarget<'_>,
        index: u32,
        total: u32,
        width: f64,
        height: f64,
    ) -> ScrubResult<()> {
        self(target, index, total, width, height)
    }
}

/// Which variant a [`FrameSource`] is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Decoded image sequence.
    Image,
    /// Procedural renderer.
    Procedural,
}

/// The active provider of frame pixels.
#[derive(Clone)]
pub enum FrameSource {
    /// Draw `images[index]` with cover-fit.
    Image(ImageSequence),
    /// Call a pure renderer.
    Procedural(Arc<dyn FrameRenderer>),
}

impl std::fmt::Debug for FrameSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image(seq) => f.debug_tuple("Image").field(&seq.len()).finish(),
            Self::Procedural(_) => f.write_str("Procedural"),
        }
    }
}

impl FrameSource {
    /// Procedural source backed by the built-in animation.
    pub fn default_procedural(font: Option<FontBytes>) -> Self {
        Self::Procedural(Arc::new(DefaultFrameRenderer::new(font)))
    }

    /// Variant tag.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Image(_) => SourceKind::Image,
            Self::Procedural(_) => SourceKind::Procedural,
        }
    }

    /// Number of frames this source scrubs through. Procedural sources use `configured_total`.
    pub fn frame_count(&self, configured_total: u32) -> u32 {
        match self {
            Self::Image(seq) => u32::try_from(seq.len()).unwrap_or(u32::MAX),
            Self::Procedural(_) => configured_total.max(1),
        }
    }

    /// Draw frame `index`. Out-of-range indices are clamped to the last frame.
    pub fn render(
        &self,
        index: FrameIndex,
        total: u32,
        target: &mut DrawTarget<'_>,
    ) -> ScrubResult<()> {
        match self {
            Self::Image(seq) => seq.render(index, target),
            Self::Procedural(renderer) => {
                let total = total.max(1);
                let index = index.clamp_to(total);
                let (width, height) = (target.width(), target.height());
                renderer.render(target, index.0, total, width, height)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/mod.rs"]
mod tests;
