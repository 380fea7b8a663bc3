use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ScrubError, ScrubResult};

/// Raw TTF/OTF bytes shared between renderers.
#[derive(Clone, Debug)]
pub struct FontBytes(Arc<Vec<u8>>);

impl FontBytes {
    /// Wrap font bytes already in memory.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }

    /// Read a font file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> ScrubResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(Self::new(bytes))
    }

    /// The font bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    fn same_source(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

pub(crate) struct ShapedLine {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
}

struct RegisteredFont {
    source: FontBytes,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

/// Parley contexts reused across paints of one surface.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: Option<RegisteredFont>,
    registrations: u64,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: None,
            registrations: 0,
        }
    }

    /// Shape one unwrapped line of text.
    pub(crate) fn layout_line(
        &mut self,
        font: &FontBytes,
        text: &str,
        size_px: f32,
        color: Rgba8,
    ) -> ScrubResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ScrubError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let (family_name, font_data) = self.register(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(ShapedLine {
            layout,
            font: font_data,
        })
    }

    /// Fonts registered with fontique so far. Repeated layouts with one font register it once.
    pub(crate) fn registrations(&self) -> u64 {
        self.registrations
    }

    fn register(&mut self, font: &FontBytes) -> ScrubResult<(String, vello_cpu::peniko::FontData)> {
        if let Some(r) = &self.registered
            && r.source.same_source(font)
        {
            return Ok((r.family_name.clone(), r.font.clone()));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.as_bytes().to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ScrubError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ScrubError::validation("registered font family has no name"))?
            .to_string();

        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.as_bytes().to_vec()),
            0,
        );
        self.registrations += 1;
        self.registered = Some(RegisteredFont {
            source: font.clone(),
            family_name: family_name.clone(),
            font: font_data.clone(),
        });
        Ok((family_name, font_data))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
