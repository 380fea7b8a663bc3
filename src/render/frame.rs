/// A painted surface read back as RGBA8 pixels.
///
/// Surfaces store **premultiplied alpha**; the `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// The `[r, g, b, a]` bytes at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Composite over an opaque straight-alpha background, producing opaque straight RGBA8.
    pub fn flatten_over(&self, bg_rgba: [u8; 4]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let a = u32::from(px[3]);
            let inv = 255 - a;
            for c in 0..3 {
                let src = if self.premultiplied {
                    u32::from(px[c])
                } else {
                    (u32::from(px[c]) * a + 127) / 255
                };
                let bg = (u32::from(bg_rgba[c]) * inv + 127) / 255;
                out.push((src + bg).min(255) as u8);
            }
            out.push(255);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
