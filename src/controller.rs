use std::sync::Arc;
use std::time::Duration;

use crate::assets::fetch::FrameFetcher;
use crate::assets::loader::{AssetLoader, LoadOutcome, LoaderStats};
use crate::config::ScrubConfig;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ScrubError, ScrubResult};
use crate::host::{HostEvent, HostPage, ListenerKind, SectionLayout, Subscription};
use crate::render::frame::FrameRGBA;
use crate::render::scheduler::{RenderScheduler, SchedulerStats};
use crate::render::surface::{Surface, SurfaceState, surface_for_viewport};
use crate::scroll::mapper::ScrollGeometry;
use crate::source::{FrameSource, ImageSequence, SourceKind};

/// Lifecycle of a [`ScrollVideoController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// Constructed, not yet attached to a host.
    Uninitialized,
    /// Surface sized and first frame painted; listeners not yet attached.
    Ready,
    /// Reacting to scroll and resize events.
    Active,
    /// Torn down. Every further call is a no-op.
    Unmounted,
}

/// Counters exposed for tests and diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControllerStats {
    /// Paints that reached the surface.
    pub paints: u64,
    /// Paints whose drawing failed; the previous frame stayed visible.
    pub paint_errors: u64,
    /// Paint coalescing.
    pub scheduler: SchedulerStats,
    /// Frame batch loading.
    pub loader: LoaderStats,
}

/// Ties scroll position to a frame on a sticky surface.
///
/// The controller is driven by its owner: forward host events to
/// [`ScrollVideoController::handle_event`] and call [`ScrollVideoController::on_animation_frame`]
/// once per display refresh. Scroll events only record the wanted frame; painting happens on the
/// refresh tick, so bursts of events cost one paint.
pub struct ScrollVideoController {
    config: ScrubConfig,
    state: ControllerState,
    host: Option<Arc<dyn HostPage>>,
    subscriptions: Vec<Subscription>,
    surface: Surface,
    scheduler: RenderScheduler,
    loader: AssetLoader,
    fallback: FrameSource,
    source: FrameSource,
    current: Option<FrameIndex>,
    paints: u64,
    paint_errors: u64,
}

impl ScrollVideoController {
    /// Controller loading frames from the filesystem below the config's assets root.
    pub fn new(config: ScrubConfig) -> ScrubResult<Self> {
        let fetcher = Arc::new(config.fs_fetcher());
        Self::with_fetcher(config, fetcher)
    }

    /// Controller loading frames through `fetcher`.
    pub fn with_fetcher(config: ScrubConfig, fetcher: Arc<dyn FrameFetcher>) -> ScrubResult<Self> {
        config.validate()?;
        let loader = AssetLoader::new(fetcher, config.effective_loader_threads())?;
        let fallback = config.fallback_source()?;
        Ok(Self {
            source: fallback.clone(),
            fallback,
            config,
            state: ControllerState::Uninitialized,
            host: None,
            subscriptions: Vec::new(),
            surface: Surface::new(),
            scheduler: RenderScheduler::new(),
            loader,
            current: None,
            paints: 0,
            paint_errors: 0,
        })
    }

    /// Attach to `host`: size the section and surface, start loading frames, paint frame 0 and
    /// subscribe to scroll and resize.
    #[tracing::instrument(skip(self, host))]
    pub fn mount(&mut self, host: Arc<dyn HostPage>) -> ScrubResult<()> {
        if self.state != ControllerState::Uninitialized {
            return Err(ScrubError::host(format!(
                "cannot mount a controller in state {:?}",
                self.state
            )));
        }

        self.host = Some(Arc::clone(&host));
        self.sync_layout(host.as_ref());
        if !self.config.frame_locators.is_empty() {
            self.loader.load(&self.config.frame_locators);
        }

        self.paint_now(FrameIndex::ZERO);
        self.state = ControllerState::Ready;

        self.subscriptions = vec![
            Subscription::new(Arc::clone(&host), ListenerKind::Scroll),
            Subscription::new(host, ListenerKind::Resize),
        ];
        self.state = ControllerState::Active;
        tracing::debug!(total = self.effective_total(), "controller active");
        Ok(())
    }

    /// React to a host event. Ignored unless active.
    pub fn handle_event(&mut self, event: HostEvent) {
        if self.state != ControllerState::Active {
            return;
        }
        let Some(host) = self.host.clone() else {
            return;
        };
        if event == HostEvent::Resize {
            self.sync_layout(host.as_ref());
        }
        self.sync_scroll(host.as_ref());
    }

    /// Display refresh tick: apply finished frame batches, then run the pending paint.
    ///
    /// Returns the frame painted, if one was due.
    pub fn on_animation_frame(&mut self) -> Option<FrameIndex> {
        if !matches!(
            self.state,
            ControllerState::Ready | ControllerState::Active
        ) {
            return None;
        }
        if let Some(outcome) = self.loader.poll() {
            self.apply_outcome(outcome);
        }
        let frame = self.scheduler.take_due()?;
        self.paint_now(frame);
        Some(frame)
    }

    /// Block up to `timeout` for the current frame batch and apply it.
    ///
    /// Returns `true` when a batch resolved (successfully or not).
    pub fn wait_for_assets(&mut self, timeout: Duration) -> bool {
        if self.state == ControllerState::Unmounted {
            return false;
        }
        match self.loader.wait_timeout(timeout) {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    /// Replace the frame list, superseding any batch in flight.
    ///
    /// An empty list switches back to the procedural source at once. Otherwise the current source
    /// stays visible until the new batch resolves.
    pub fn set_frame_locators(&mut self, locators: Vec<String>) -> ScrubResult<()> {
        if let Some(i) = locators.iter().position(|l| l.trim().is_empty()) {
            return Err(ScrubError::validation(format!(
                "frame locator {i} is empty"
            )));
        }
        self.config.frame_locators = locators;
        match self.state {
            ControllerState::Uninitialized | ControllerState::Unmounted => return Ok(()),
            ControllerState::Ready | ControllerState::Active => {}
        }

        if self.config.frame_locators.is_empty() {
            self.loader.cancel();
            self.use_source(self.fallback.clone());
        } else {
            self.loader.load(&self.config.frame_locators);
        }
        Ok(())
    }

    /// Release listeners, drop the pending paint and invalidate the batch in flight.
    ///
    /// Idempotent; also run on drop.
    pub fn unmount(&mut self) {
        if self.state == ControllerState::Unmounted {
            return;
        }
        self.subscriptions.clear();
        self.scheduler.cancel();
        self.loader.cancel();
        self.host = None;
        self.state = ControllerState::Unmounted;
        tracing::debug!("controller unmounted");
    }

    /// Lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Frames scrubbed through by the active source.
    pub fn effective_total(&self) -> u32 {
        self.source.frame_count(self.config.total_frames)
    }

    /// Which source is active.
    pub fn source_kind(&self) -> SourceKind {
        self.source.kind()
    }

    /// Last frame successfully painted.
    pub fn current_frame(&self) -> Option<FrameIndex> {
        self.current
    }

    /// Frame waiting for the next refresh tick.
    pub fn pending_frame(&self) -> Option<FrameIndex> {
        self.scheduler.pending()
    }

    /// Whether a frame batch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Current surface sizing.
    pub fn surface_state(&self) -> Option<SurfaceState> {
        self.surface.state()
    }

    /// Copy of the surface pixels.
    pub fn snapshot(&self) -> Option<FrameRGBA> {
        self.surface.snapshot()
    }

    /// The configuration in effect.
    pub fn config(&self) -> &ScrubConfig {
        &self.config
    }

    /// Diagnostics counters.
    pub fn stats(&self) -> ControllerStats {
        ControllerStats {
            paints: self.paints,
            paint_errors: self.paint_errors,
            scheduler: self.scheduler.stats(),
            loader: self.loader.stats(),
        }
    }

    fn sync_layout(&mut self, host: &dyn HostPage) {
        let viewport = host.viewport();
        host.apply_layout(&SectionLayout {
            height: self.config.section_height(viewport.height),
            surface_class: self.config.surface_style_class.clone(),
        });
        match self.surface.ensure(surface_for_viewport(viewport)) {
            Ok(true) => tracing::debug!(?viewport, "surface resized"),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "surface left detached"),
        }
    }

    fn sync_scroll(&mut self, host: &dyn HostPage) {
        let Some(bounds) = host.section_bounds() else {
            tracing::debug!("scrub section not laid out; ignoring scroll");
            return;
        };
        let scroll_y = host.scroll_y();
        let geometry = ScrollGeometry::from_section(
            bounds.top,
            scroll_y,
            bounds.height,
            host.viewport().height,
        );
        let frame = geometry.frame_at(scroll_y, self.effective_total());
        self.scheduler.request_paint(frame);
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded { images, .. } => {
                match ImageSequence::from_loaded(&images, self.config.clear_color()) {
                    Ok(seq) => {
                        tracing::debug!(frames = seq.len(), "switching to image frames");
                        self.use_source(FrameSource::Image(seq));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "loaded frames unusable; keeping procedural");
                        self.use_source(self.fallback.clone());
                    }
                }
            }
            LoadOutcome::Failed { reason, .. } => {
                tracing::warn!(%reason, "using procedural frames");
                if self.source.kind() != SourceKind::Procedural {
                    self.use_source(self.fallback.clone());
                }
            }
        }
    }

    /// Switch sources: paint frame 0 at once, then schedule the frame for the current scroll.
    fn use_source(&mut self, source: FrameSource) {
        self.source = source;
        self.paint_now(FrameIndex::ZERO);
        if let Some(host) = self.host.clone() {
            self.sync_scroll(host.as_ref());
        }
    }

    #[tracing::instrument(skip(self, frame), fields(frame = frame.0))]
    fn paint_now(&mut self, frame: FrameIndex) {
        let total = self.effective_total();
        let source = &self.source;
        match self.surface.paint(|target| source.render(frame, total, target)) {
            Ok(true) => {
                self.current = Some(frame.clamp_to(total));
                self.paints += 1;
            }
            Ok(false) => tracing::debug!("surface detached; paint skipped"),
            Err(e) => {
                self.paint_errors += 1;
                tracing::warn!(error = %e, "frame paint failed");
            }
        }
    }
}

impl Drop for ScrollVideoController {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
#[path = "../tests/unit/controller.rs"]
mod tests;
