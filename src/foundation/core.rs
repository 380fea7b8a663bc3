pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// 0-based index of a frame within the scrub sequence.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// First frame of every sequence.
    pub const ZERO: Self = Self(0);

    /// Clamp into `[0, total - 1]`. A `total` of zero clamps to frame 0.
    pub fn clamp_to(self, total: u32) -> Self {
        Self(self.0.min(total.saturating_sub(1)))
    }

    /// Normalized position of this frame in a sequence of `total` frames.
    ///
    /// Single-frame sequences report `0.0`.
    pub fn progress(self, total: u32) -> f64 {
        let last = total.saturating_sub(1).max(1);
        f64::from(self.clamp_to(total).0) / f64::from(last)
    }
}

/// Visible window area in logical (CSS) pixels plus the device pixel ratio reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
    /// Device pixels per logical pixel, as reported (not yet sanitized or capped).
    pub pixel_ratio: f64,
}

impl Viewport {
    /// Construct a viewport.
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Construct from a `[r, g, b, a]` array.
    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }

    /// Same color with alpha given as a `0..=1` fraction.
    pub fn with_alpha_f(self, alpha: f64) -> Self {
        Self {
            a: unit_to_u8(alpha),
            ..self
        }
    }

    /// Convert hue (degrees), saturation and lightness (`0..=1`) into an opaque color.
    pub fn from_hsl(hue_deg: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue_deg.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = unit_to_u8(l);
            return Self::new(v, v, v, 255);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::new(
            unit_to_u8(hue_to_channel(p, q, h + 1.0 / 3.0)),
            unit_to_u8(hue_to_channel(p, q, h)),
            unit_to_u8(hue_to_channel(p, q, h - 1.0 / 3.0)),
            255,
        )
    }

    /// Linear interpolation in straight-alpha space.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let af = f64::from(a);
            let bf = f64::from(b);
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn to_premul_array(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn unit_to_u8(v: f64) -> u8 {
    if !v.is_finite() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
