use std::sync::Arc;

use crate::assets::loader::LoadedImageSet;
use crate::foundation::core::{FrameIndex, Rect, Rgba8};
use crate::foundation::error::{ScrubError, ScrubResult};
use crate::render::surface::{DrawTarget, ImagePaint};

/// Destination rectangle that covers a `target_width` x `target_height` area with an image of
/// the given size, preserving aspect ratio and centering the overflow.
///
/// The image is scaled until its limiting dimension exactly fills the target; the other dimension
/// overflows equally on both sides. Degenerate images fill the target.
pub fn cover_fit(image_width: f64, image_height: f64, target_width: f64, target_height: f64) -> Rect {
    if image_width <= 0.0 || image_height <= 0.0 || target_height <= 0.0 {
        return Rect::new(0.0, 0.0, target_width.max(0.0), target_height.max(0.0));
    }

    let image_ratio = image_width / image_height;
    let target_ratio = target_width / target_height;
    let (dw, dh) = if image_ratio > target_ratio {
        (target_height * image_ratio, target_height)
    } else {
        (target_width, target_width / image_ratio)
    };
    let dx = (target_width - dw) / 2.0;
    let dy = (target_height - dh) / 2.0;
    Rect::new(dx, dy, dx + dw, dy + dh)
}

/// Decoded frames ready for compositing.
#[derive(Clone)]
pub struct ImageSequence {
    frames: Arc<[ImagePaint]>,
    clear: Rgba8,
}

impl ImageSequence {
    /// Prepare every frame of `images` for drawing. `clear` is painted before each frame.
    pub fn from_loaded(images: &LoadedImageSet, clear: Rgba8) -> ScrubResult<Self> {
        if images.is_empty() {
            return Err(ScrubError::validation(
                "image sequence needs at least one frame",
            ));
        }
        let frames = images
            .iter()
            .map(|img| ImagePaint::from_premul_rgba8(&img.rgba8_premul, img.width, img.height))
            .collect::<ScrubResult<Vec<_>>>()?;
        Ok(Self {
            frames: frames.into(),
            clear,
        })
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence is empty. Never true for sequences built by `from_loaded`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Clear, then draw frame `index` (clamped) with cover-fit.
    pub fn render(&self, index: FrameIndex, target: &mut DrawTarget<'_>) -> ScrubResult<()> {
        let total = u32::try_from(self.frames.len()).unwrap_or(u32::MAX);
        let index = index.clamp_to(total);
        let frame = self
            .frames
            .get(index.0 as usize)
            .ok_or_else(|| ScrubError::render("image sequence is empty"))?;

        let dest = cover_fit(
            f64::from(frame.width()),
            f64::from(frame.height()),
            target.width(),
            target.height(),
        );
        target.clear(self.clear);
        target.draw_image(frame, dest);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/image_seq.rs"]
mod tests;
