use std::f64::consts::TAU;
use std::sync::OnceLock;

use kurbo::RoundedRect;

use crate::foundation::core::{Affine, Rect, Rgba8};
use crate::foundation::error::ScrubResult;
use crate::render::surface::{DrawTarget, ImagePaint};
use crate::render::text::FontBytes;
use crate::source::FrameRenderer;

// Gradients are smooth, so they are rasterized at bounded resolution and stretched.
const BACKDROP_TEXELS: u32 = 256;
const GLOW_TEXELS: u32 = 128;
const GLOW_FALLOFF: f64 = 2.2;
const GLOW_COLOR: Rgba8 = Rgba8::new(59, 130, 246, 179);

const CARD_FILL: Rgba8 = Rgba8::new(15, 23, 42, 153);
const CARD_STROKE: Rgba8 = Rgba8::new(59, 130, 246, 153);
const CARD_RADIUS: f64 = 16.0;
const CARD_STROKE_WIDTH: f64 = 2.0;

const TITLE: &str = "Scroll to scrub the animation";
const TITLE_COLOR: Rgba8 = Rgba8::new(226, 232, 240, 230);
const CAPTION_COLOR: Rgba8 = Rgba8::new(148, 163, 184, 230);

/// Built-in animation shown when no image sequence is available.
///
/// A diagonal backdrop whose hues drift with progress, a glow travelling left to right, and a
/// slowly rotating card. A title and a frame counter are drawn on top only when a font is set.
#[derive(Clone, Default)]
pub struct DefaultFrameRenderer {
    font: Option<FontBytes>,
    glow: OnceLock<ImagePaint>,
}

impl std::fmt::Debug for DefaultFrameRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultFrameRenderer")
            .field("font", &self.font.is_some())
            .field("glow_cached", &self.glow.get().is_some())
            .finish()
    }
}

impl DefaultFrameRenderer {
    /// Renderer drawing text lines with `font` when set.
    pub fn new(font: Option<FontBytes>) -> Self {
        Self {
            font,
            glow: OnceLock::new(),
        }
    }

    /// Font used for the text lines.
    pub fn font(&self) -> Option<&FontBytes> {
        self.font.as_ref()
    }

    /// The glow texture does not depend on the frame; it is built on first use.
    fn glow(&self) -> ScrubResult<&ImagePaint> {
        if let Some(glow) = self.glow.get() {
            return Ok(glow);
        }
        let glow = glow_paint()?;
        Ok(self.glow.get_or_init(|| glow))
    }
}

impl FrameRenderer for DefaultFrameRenderer {
    fn render(
        &self,
        target: &mut DrawTarget<'_>,
        index: u32,
        total: u32,
        width: f64,
        height: f64,
    ) -> ScrubResult<()> {
        let t = f64::from(index) / f64::from(total.saturating_sub(1).max(1));
        let short_side = width.min(height);

        target.clear(Rgba8::TRANSPARENT);

        let backdrop = backdrop_paint(t, width, height)?;
        target.draw_image(&backdrop, Rect::new(0.0, 0.0, width, height));

        let glow_center = (
            width * (0.2 + 0.6 * t),
            height * (0.5 + 0.2 * (TAU * t).sin()),
        );
        let glow_radius = short_side * (0.12 + 0.08 * (TAU * t).cos()) * GLOW_FALLOFF;
        if glow_radius > 0.0 {
            let glow = self.glow()?;
            target.draw_image(
                glow,
                Rect::new(
                    glow_center.0 - glow_radius,
                    glow_center.1 - glow_radius,
                    glow_center.0 + glow_radius,
                    glow_center.1 + glow_radius,
                ),
            );
        }

        let card_w = short_side * 0.45;
        let card_h = card_w * 0.6;
        if card_w > 0.0 {
            let card = RoundedRect::new(
                -card_w / 2.0,
                -card_h / 2.0,
                card_w / 2.0,
                card_h / 2.0,
                CARD_RADIUS,
            );
            let placement =
                Affine::translate((width / 2.0, height / 2.0)) * Affine::rotate(TAU * t / 6.0);
            target.fill_shape(&card, placement, CARD_FILL);
            target.stroke_shape(&card, placement, CARD_STROKE_WIDTH, CARD_STROKE);
        }

        if let Some(font) = &self.font {
            let title_px = (height * 0.035).floor();
            let caption_px = (height * 0.028).floor();
            if title_px >= 1.0 {
                target.draw_text_centered(
                    font,
                    TITLE,
                    title_px as f32,
                    TITLE_COLOR,
                    width / 2.0,
                    height * 0.12 - title_px,
                )?;
            }
            if caption_px >= 1.0 {
                let caption = format!("Frame {} / {}", index + 1, total);
                target.draw_text_centered(
                    font,
                    &caption,
                    caption_px as f32,
                    CAPTION_COLOR,
                    width / 2.0,
                    height * 0.18 - caption_px,
                )?;
            }
        }

        Ok(())
    }
}

/// Diagonal two-stop gradient from the top-left to the bottom-right corner.
fn backdrop_paint(t: f64, width: f64, height: f64) -> ScrubResult<ImagePaint> {
    let start = Rgba8::from_hsl(200.0 + 60.0 * t, 0.7, 0.08);
    let end = Rgba8::from_hsl(260.0 + 60.0 * t, 0.9, 0.12);

    let tw = texels_for(width, BACKDROP_TEXELS);
    let th = texels_for(height, BACKDROP_TEXELS);
    let len_sq = (width * width + height * height).max(f64::EPSILON);

    let mut bytes = vec![0u8; (tw as usize) * (th as usize) * 4];
    for y in 0..th {
        let py = (f64::from(y) + 0.5) / f64::from(th) * height;
        for x in 0..tw {
            let px = (f64::from(x) + 0.5) / f64::from(tw) * width;
            // Projection onto the diagonal.
            let s = (px * width + py * height) / len_sq;
            let idx = ((y as usize) * (tw as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&start.lerp(end, s).to_premul_array());
        }
    }
    ImagePaint::from_premul_rgba8(&bytes, tw, th)
}

/// Radial falloff from the glow color at the center to transparent at the edge.
fn glow_paint() -> ScrubResult<ImagePaint> {
    let n = GLOW_TEXELS;
    let half = f64::from(n) / 2.0;
    let mut bytes = vec![0u8; (n as usize) * (n as usize) * 4];
    for y in 0..n {
        for x in 0..n {
            let dx = (f64::from(x) + 0.5 - half) / half;
            let dy = (f64::from(y) + 0.5 - half) / half;
            let d = (dx * dx + dy * dy).sqrt();
            if d >= 1.0 {
                continue;
            }
            let c = GLOW_COLOR.lerp(GLOW_COLOR.with_alpha_f(0.0), d);
            let idx = ((y as usize) * (n as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&c.to_premul_array());
        }
    }
    ImagePaint::from_premul_rgba8(&bytes, n, n)
}

fn texels_for(len: f64, max: u32) -> u32 {
    (len.ceil().clamp(1.0, f64::from(max))) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/source/procedural.rs"]
mod tests;
