//! scrollscrub ties a page's scroll position to a frame of an animation painted on a sticky
//! surface, so scrolling scrubs through the sequence.
//!
//! - Describe a section with [`ScrubConfig`]
//! - Mount a [`ScrollVideoController`] on a [`HostPage`]
//! - Forward host events and refresh ticks; the controller paints at most one frame per tick
//!
//! Frames come from an image sequence loaded in the background (all-or-nothing, with stale
//! batches discarded) or from a deterministic procedural [`FrameRenderer`].
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod host;
pub(crate) mod render;
pub(crate) mod scroll;
pub(crate) mod source;

/// Section configuration.
pub mod config;
/// Controller lifecycle and event handling.
pub mod controller;

pub use crate::foundation::core::{Affine, BezPath, FrameIndex, Point, Rect, Rgba8, Vec2, Viewport};
pub use crate::foundation::error::{ScrubError, ScrubResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::fetch::{FrameFetcher, FsFetcher, MemoryFetcher};
pub use crate::assets::loader::{AssetLoader, LoadOutcome, LoadTicket, LoadedImageSet, LoaderStats};
pub use crate::config::{LOADER_THREADS_ENV, ScrubConfig};
pub use crate::controller::{ControllerState, ControllerStats, ScrollVideoController};
pub use crate::host::{
    HostEvent, HostPage, ListenerId, ListenerKind, SectionBounds, SectionLayout, SimulatedPage,
    Subscription,
};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::scheduler::{RenderScheduler, SchedulerStats};
pub use crate::render::surface::{
    DrawTarget, ImagePaint, MAX_PIXEL_RATIO, Surface, SurfaceState, compute_surface,
    effective_pixel_ratio, surface_for_viewport,
};
pub use crate::render::text::FontBytes;
pub use crate::scroll::mapper::{ScrollGeometry, map_progress_to_frame, scroll_progress};
pub use crate::source::{
    DefaultFrameRenderer, FrameRenderer, FrameSource, ImageSequence, SourceKind, cover_fit,
};
