//! The embedding page, seen from the controller.
//!
//! [`HostPage`] is the narrow surface the controller needs: scroll offset, viewport, where the
//! scrub section sits, and scroll/resize listener registration. Listeners are held through
//! [`Subscription`] guards so a dropped controller never leaves one behind.

pub(crate) mod simulated;

use std::sync::Arc;

use crate::foundation::core::Viewport;

pub use simulated::SimulatedPage;

/// Client-rect of the scrub section relative to the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBounds {
    /// Top edge relative to the viewport top; negative once scrolled past.
    pub top: f64,
    /// Laid-out height.
    pub height: f64,
}

/// Layout the controller asks the host to apply to the scrub section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionLayout {
    /// Section height in logical pixels.
    pub height: f64,
    /// Style class for the sticky surface element.
    pub surface_class: Option<String>,
}

/// Events the controller subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Scroll offset changes.
    Scroll,
    /// Viewport size or pixel ratio changes.
    Resize,
}

/// A host notification delivered to [`crate::ScrollVideoController::handle_event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// The page scrolled.
    Scroll,
    /// The viewport was resized.
    Resize,
}

impl HostEvent {
    /// Listener kind this event is delivered to.
    pub fn kind(self) -> ListenerKind {
        match self {
            Self::Scroll => ListenerKind::Scroll,
            Self::Resize => ListenerKind::Resize,
        }
    }
}

/// Opaque listener registration handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The page hosting a scrub section.
pub trait HostPage: Send + Sync {
    /// Current vertical scroll offset of the document.
    fn scroll_y(&self) -> f64;

    /// Current viewport.
    fn viewport(&self) -> Viewport;

    /// Where the scrub section is, or `None` when it is not laid out.
    fn section_bounds(&self) -> Option<SectionBounds>;

    /// Apply section sizing and styling. Hosts without layout control may ignore it.
    fn apply_layout(&self, _layout: &SectionLayout) {}

    /// Register a passive listener.
    fn add_listener(&self, kind: ListenerKind) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// Listener registration that is removed from the host on drop.
pub struct Subscription {
    host: Arc<dyn HostPage>,
    kind: ListenerKind,
    id: ListenerId,
}

impl Subscription {
    /// Register a `kind` listener on `host`.
    pub fn new(host: Arc<dyn HostPage>, kind: ListenerKind) -> Self {
        let id = host.add_listener(kind);
        tracing::debug!(?kind, id = id.0, "listener added");
        Self { host, kind, id }
    }

    /// Kind of event listened for.
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    /// Host-assigned id.
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.host.remove_listener(self.id);
        tracing::debug!(kind = ?self.kind, id = self.id.0, "listener removed");
    }
}
