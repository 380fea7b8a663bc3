use crate::foundation::core::FrameIndex;

/// Scroll geometry of the scrub region, derived fresh for every scroll/resize event.
///
/// Layout can shift between events, so this is never cached across paints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollGeometry {
    /// Document-relative top of the scrub region, in logical pixels.
    pub section_top: f64,
    /// Region height minus viewport height. May be `<= 0` when the region is shorter than the
    /// viewport.
    pub scrollable_height: f64,
}

impl ScrollGeometry {
    /// Derive geometry from the region's client-rect top (relative to the viewport), the current
    /// scroll offset, the region height and the viewport height.
    pub fn from_section(
        client_top: f64,
        scroll_y: f64,
        section_height: f64,
        viewport_height: f64,
    ) -> Self {
        Self {
            section_top: client_top + scroll_y,
            scrollable_height: section_height - viewport_height,
        }
    }

    /// Normalized progress for `scroll_y`, see [`scroll_progress`].
    pub fn progress(self, scroll_y: f64) -> f64 {
        scroll_progress(scroll_y, self.section_top, self.scrollable_height)
    }

    /// Frame shown at `scroll_y`, see [`map_progress_to_frame`].
    pub fn frame_at(self, scroll_y: f64, effective_total: u32) -> FrameIndex {
        map_progress_to_frame(
            scroll_y,
            self.section_top,
            self.scrollable_height,
            effective_total,
        )
    }

    /// Scroll offset at which `progress` is reached.
    pub fn scroll_y_for_progress(self, progress: f64) -> f64 {
        self.section_top + progress.clamp(0.0, 1.0) * self.scrollable_height.max(0.0)
    }
}

/// Position within the scrub region as a value in `[0, 1]`.
///
/// The denominator is floored to `1` so a region shorter than the viewport cannot divide by zero.
/// Non-finite inputs report `0`.
pub fn scroll_progress(scroll_y: f64, section_top: f64, scrollable_height: f64) -> f64 {
    let denom = if scrollable_height.is_finite() {
        scrollable_height.max(1.0)
    } else {
        1.0
    };
    let raw = (scroll_y - section_top) / denom;
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}

/// Quantize the scroll position into a frame index in `[0, effective_total - 1]`.
pub fn map_progress_to_frame(
    scroll_y: f64,
    section_top: f64,
    scrollable_height: f64,
    effective_total: u32,
) -> FrameIndex {
    if effective_total <= 1 {
        return FrameIndex::ZERO;
    }
    let progress = scroll_progress(scroll_y, section_top, scrollable_height);
    let last = effective_total - 1;
    let idx = (progress * f64::from(last)).round() as u32;
    FrameIndex(idx.min(last))
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/mapper.rs"]
mod tests;
