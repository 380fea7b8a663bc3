use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::assets::fetch::FsFetcher;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ScrubError, ScrubResult};
use crate::render::text::FontBytes;
use crate::source::{FrameRenderer, FrameSource};

/// Overrides [`ScrubConfig::loader_threads`] when set to a positive integer.
pub const LOADER_THREADS_ENV: &str = "SCROLLSCRUB_LOADER_THREADS";

fn default_height_factor() -> f64 {
    300.0
}

fn default_total_frames() -> u32 {
    180
}

/// Per-mount configuration of a scroll scrub section.
///
/// Deserializes from JSON with snake_case keys; the camelCase names `heightVh`, `heightFactor`,
/// `totalFrames`, `imageUrls`, `frameLocators` and `className` are accepted as aliases.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct ScrubConfig {
    /// Scroll-through length as a percentage of the viewport height.
    #[serde(
        default = "default_height_factor",
        alias = "heightVh",
        alias = "heightFactor"
    )]
    pub height_factor: f64,

    /// Frames scrubbed through when no image sequence is loaded.
    #[serde(default = "default_total_frames", alias = "totalFrames")]
    pub total_frames: u32,

    /// Ordered frame images. Absent or empty means procedural only.
    #[serde(
        default,
        alias = "imageUrls",
        alias = "frameLocators",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub frame_locators: Vec<String>,

    /// Style class passed through to the host for the surface element.
    #[serde(
        default,
        alias = "className",
        alias = "surfaceStyleClass",
        skip_serializing_if = "Option::is_none"
    )]
    pub surface_style_class: Option<String>,

    /// Directory frame locators are resolved against. Defaults to the config file's directory,
    /// or the working directory for configs built in code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_root: Option<PathBuf>,

    /// TTF/OTF used by the default renderer's text lines. Without it no text is drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,

    /// Worker threads for frame decoding; rayon's default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader_threads: Option<usize>,

    /// Color painted under image frames.
    #[serde(default)]
    pub clear_rgba: [u8; 4],

    #[serde(skip)]
    custom_renderer: Option<Arc<dyn FrameRenderer>>,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            height_factor: default_height_factor(),
            total_frames: default_total_frames(),
            frame_locators: Vec::new(),
            surface_style_class: None,
            assets_root: None,
            font_path: None,
            loader_threads: None,
            clear_rgba: [0, 0, 0, 0],
            custom_renderer: None,
        }
    }
}

impl std::fmt::Debug for ScrubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrubConfig")
            .field("height_factor", &self.height_factor)
            .field("total_frames", &self.total_frames)
            .field("frame_locators", &self.frame_locators)
            .field("surface_style_class", &self.surface_style_class)
            .field("assets_root", &self.assets_root)
            .field("font_path", &self.font_path)
            .field("loader_threads", &self.loader_threads)
            .field("clear_rgba", &self.clear_rgba)
            .field("custom_renderer", &self.custom_renderer.is_some())
            .finish()
    }
}

impl ScrubConfig {
    /// Parse JSON. Relative paths stay relative to the working directory.
    pub fn from_json_str(json: &str) -> ScrubResult<Self> {
        let cfg: Self = serde_json::from_str(json).context("parse scrub config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a JSON file. `assets_root` and `font_path` resolve against the file's directory.
    pub fn from_json_path(path: impl AsRef<Path>) -> ScrubResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read scrub config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&json)?;

        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        cfg.assets_root = Some(match cfg.assets_root.take() {
            Some(root) if root.is_relative() => base.join(root),
            Some(root) => root,
            None => base.to_path_buf(),
        });
        if let Some(font) = cfg.font_path.take() {
            cfg.font_path = Some(if font.is_relative() {
                base.join(font)
            } else {
                font
            });
        }
        Ok(cfg)
    }

    /// Replace the built-in animation with `renderer`.
    pub fn with_renderer(mut self, renderer: Arc<dyn FrameRenderer>) -> Self {
        self.custom_renderer = Some(renderer);
        self
    }

    /// Builder-style frame locators.
    pub fn with_frame_locators<I, S>(mut self, locators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frame_locators = locators.into_iter().map(Into::into).collect();
        self
    }

    /// The custom renderer, if any.
    pub fn custom_renderer(&self) -> Option<&Arc<dyn FrameRenderer>> {
        self.custom_renderer.as_ref()
    }

    /// Reject configurations the controller cannot honor.
    pub fn validate(&self) -> ScrubResult<()> {
        if !self.height_factor.is_finite() || self.height_factor <= 0.0 {
            return Err(ScrubError::validation(
                "height_factor must be finite and > 0",
            ));
        }
        if self.total_frames == 0 {
            return Err(ScrubError::validation("total_frames must be >= 1"));
        }
        if self.loader_threads == Some(0) {
            return Err(ScrubError::validation(
                "loader_threads must be >= 1 when set",
            ));
        }
        if let Some(i) = self.frame_locators.iter().position(|l| l.trim().is_empty()) {
            return Err(ScrubError::validation(format!(
                "frame locator {i} is empty"
            )));
        }
        Ok(())
    }

    /// Section height for a viewport of `viewport_height` logical pixels.
    pub fn section_height(&self, viewport_height: f64) -> f64 {
        (self.height_factor / 100.0 * viewport_height).max(0.0)
    }

    /// Loader pool size, honoring [`LOADER_THREADS_ENV`].
    pub fn effective_loader_threads(&self) -> Option<usize> {
        std::env::var(LOADER_THREADS_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .or(self.loader_threads)
    }

    /// Filesystem fetcher rooted at [`ScrubConfig::assets_root`].
    pub fn fs_fetcher(&self) -> FsFetcher {
        FsFetcher::new(
            self.assets_root
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
        )
    }

    /// Clear color for image frames.
    pub fn clear_color(&self) -> Rgba8 {
        Rgba8::from_array(self.clear_rgba)
    }

    /// Source used until (or instead of) an image sequence: the custom renderer when set,
    /// otherwise the built-in animation.
    pub fn fallback_source(&self) -> ScrubResult<FrameSource> {
        if let Some(renderer) = &self.custom_renderer {
            return Ok(FrameSource::Procedural(Arc::clone(renderer)));
        }
        let font = self
            .font_path
            .as_ref()
            .map(FontBytes::from_path)
            .transpose()?;
        Ok(FrameSource::default_procedural(font))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
