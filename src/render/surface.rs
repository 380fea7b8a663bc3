use crate::foundation::core::{Affine, BezPath, Rect, Rgba8, Viewport};
use crate::foundation::error::{ScrubError, ScrubResult};
use crate::render::frame::FrameRGBA;
use crate::render::text::{FontBytes, TextLayoutEngine};
use kurbo::Shape;

/// Device pixel ratios above this are treated as this value to bound backing-store memory.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Backing-store and logical dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceState {
    /// Backing-store width in device pixels.
    pub backing_width: u32,
    /// Backing-store height in device pixels.
    pub backing_height: u32,
    /// Drawing-space width in logical pixels.
    pub logical_width: f64,
    /// Drawing-space height in logical pixels.
    pub logical_height: f64,
    /// Sanitized, capped pixel ratio relating the two.
    pub pixel_ratio: f64,
}

impl SurfaceState {
    /// A zero-area surface cannot be drawn to; painting it is a no-op.
    pub fn is_detached(&self) -> bool {
        self.backing_width == 0 || self.backing_height == 0
    }

    /// Transform from logical drawing space into backing-store pixels.
    pub fn logical_to_device(&self) -> Affine {
        Affine::scale(self.pixel_ratio)
    }
}

/// Sanitize a host-reported pixel ratio: missing/invalid ratios become `1`, large ones are capped.
pub fn effective_pixel_ratio(reported: f64) -> f64 {
    if !reported.is_finite() || reported <= 0.0 {
        return 1.0;
    }
    reported.min(MAX_PIXEL_RATIO)
}

/// Size a surface for a viewport.
///
/// Backing dimensions are `floor(viewport * ratio)`; logical dimensions are the viewport itself.
pub fn compute_surface(
    viewport_width: f64,
    viewport_height: f64,
    pixel_ratio: f64,
) -> SurfaceState {
    fn sanitize_len(v: f64) -> f64 {
        if v.is_finite() { v.max(0.0) } else { 0.0 }
    }

    let ratio = effective_pixel_ratio(pixel_ratio);
    let logical_width = sanitize_len(viewport_width);
    let logical_height = sanitize_len(viewport_height);
    SurfaceState {
        backing_width: (logical_width * ratio).floor().min(f64::from(u32::MAX)) as u32,
        backing_height: (logical_height * ratio).floor().min(f64::from(u32::MAX)) as u32,
        logical_width,
        logical_height,
        pixel_ratio: ratio,
    }
}

/// [`compute_surface`] for a host [`Viewport`].
pub fn surface_for_viewport(viewport: Viewport) -> SurfaceState {
    compute_surface(viewport.width, viewport.height, viewport.pixel_ratio)
}

/// CPU pixel surface the controller paints into.
///
/// Owns the backing pixmap plus the reusable `vello_cpu` context and text layout state. The
/// pixmap is reallocated whenever the [`SurfaceState`] changes.
pub struct Surface {
    state: Option<SurfaceState>,
    pixmap: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
    text: TextLayoutEngine,
    paints: u64,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// An unsized surface. Paints are no-ops until [`Surface::ensure`] is called.
    pub fn new() -> Self {
        Self {
            state: None,
            pixmap: None,
            ctx: None,
            text: TextLayoutEngine::new(),
            paints: 0,
        }
    }

    /// Current state, if the surface has been sized.
    pub fn state(&self) -> Option<SurfaceState> {
        self.state
    }

    /// Whether a backing pixmap exists.
    pub fn is_attached(&self) -> bool {
        self.pixmap.is_some()
    }

    /// Number of completed paints since creation.
    pub fn paint_count(&self) -> u64 {
        self.paints
    }

    /// Fonts registered by this surface's text engine.
    pub(crate) fn font_registrations(&self) -> u64 {
        self.text.registrations()
    }

    /// Resize to `state`. Returns `true` when the backing store was replaced.
    ///
    /// On error the surface is left detached.
    pub fn ensure(&mut self, state: SurfaceState) -> ScrubResult<bool> {
        if self.state == Some(state) && (self.pixmap.is_some() || state.is_detached()) {
            return Ok(false);
        }

        self.state = Some(state);
        self.pixmap = None;
        if state.is_detached() {
            return Ok(true);
        }

        let w: u16 = state.backing_width.try_into().map_err(|_| {
            ScrubError::render(format!(
                "surface width {} exceeds u16",
                state.backing_width
            ))
        })?;
        let h: u16 = state.backing_height.try_into().map_err(|_| {
            ScrubError::render(format!(
                "surface height {} exceeds u16",
                state.backing_height
            ))
        })?;
        self.pixmap = Some(vello_cpu::Pixmap::new(w, h));
        Ok(true)
    }

    /// Clear the surface and draw one frame with `draw`.
    ///
    /// Returns `Ok(false)` without calling `draw` when the surface is detached. The previous
    /// contents are kept if `draw` fails.
    pub fn paint(
        &mut self,
        draw: impl FnOnce(&mut DrawTarget<'_>) -> ScrubResult<()>,
    ) -> ScrubResult<bool> {
        let (Some(state), Some(pixmap)) = (self.state, self.pixmap.as_mut()) else {
            return Ok(false);
        };

        let (width, height) = (pixmap.width(), pixmap.height());
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        let drawn = {
            let mut target = DrawTarget {
                ctx: &mut ctx,
                text: &mut self.text,
                base: state.logical_to_device(),
                width: state.logical_width,
                height: state.logical_height,
            };
            draw(&mut target)
        };

        if drawn.is_ok() {
            clear_pixmap(pixmap, [0, 0, 0, 0]);
            ctx.flush();
            ctx.render_to_pixmap(pixmap);
            self.paints += 1;
        }
        self.ctx = Some(ctx);
        drawn.map(|()| true)
    }

    /// Copy out the current backing store.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        let pixmap = self.pixmap.as_ref()?;
        Some(FrameRGBA {
            width: u32::from(pixmap.width()),
            height: u32::from(pixmap.height()),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

/// A prepared image ready to be drawn repeatedly.
#[derive(Clone)]
pub struct ImagePaint {
    pub(crate) paint: vello_cpu::Image,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl ImagePaint {
    /// Build from premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(bytes: &[u8], width: u32, height: u32) -> ScrubResult<Self> {
        let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width,
            height,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Drawing handle passed to frame renderers.
///
/// All coordinates are logical pixels in `[0, width] x [0, height]`; the device pixel ratio is
/// applied underneath.
pub struct DrawTarget<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    text: &'a mut TextLayoutEngine,
    base: Affine,
    width: f64,
    height: f64,
}

impl DrawTarget<'_> {
    /// Logical width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Logical height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Logical bounds of the target.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Discard everything drawn so far in this paint and fill with `color`.
    pub fn clear(&mut self, color: Rgba8) {
        self.ctx.reset();
        if color.a > 0 {
            let bounds = self.bounds();
            self.fill_rect(bounds, color);
        }
    }

    /// Fill a logical-space rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.prepare(Affine::IDENTITY);
        self.ctx.set_paint(to_cpu_color(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Fill any shape after applying `transform` (logical space).
    pub fn fill_shape(&mut self, shape: &impl Shape, transform: Affine, color: Rgba8) {
        self.prepare(transform);
        self.ctx.set_paint(to_cpu_color(color));
        self.ctx.fill_path(&shape_to_cpu(shape));
    }

    /// Stroke any shape after applying `transform`. `width` is in logical pixels.
    pub fn stroke_shape(&mut self, shape: &impl Shape, transform: Affine, width: f64, color: Rgba8) {
        self.prepare(transform);
        self.ctx.set_paint(to_cpu_color(color));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&shape_to_cpu(shape));
    }

    /// Draw `image` stretched into `dest` (logical space). Parts of `dest` outside the target are
    /// cropped.
    pub fn draw_image(&mut self, image: &ImagePaint, dest: Rect) {
        if image.width == 0 || image.height == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let sx = dest.width() / f64::from(image.width);
        let sy = dest.height() / f64::from(image.height);
        self.prepare(Affine::translate((dest.x0, dest.y0)) * Affine::scale_non_uniform(sx, sy));
        self.ctx.set_paint(image.paint.clone());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
    }

    /// Draw a single line of text horizontally centered on `center_x`, with its top at `top`.
    pub fn draw_text_centered(
        &mut self,
        font: &FontBytes,
        text: &str,
        size_px: f32,
        color: Rgba8,
        center_x: f64,
        top: f64,
    ) -> ScrubResult<()> {
        let shaped = self.text.layout_line(font, text, size_px, color)?;
        let left = center_x - f64::from(shaped.layout.width()) / 2.0;
        self.prepare(Affine::translate((left, top)));

        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(brush.r, brush.g, brush.b, brush.a));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&shaped.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn prepare(&mut self, transform: Affine) {
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(self.base * transform));
    }
}

fn to_cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn shape_to_cpu(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    let path: BezPath = shape.path_elements(0.1).collect();
    bezpath_to_cpu(&path)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ScrubResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ScrubError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ScrubError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ScrubError::render("pixmap byte len mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
