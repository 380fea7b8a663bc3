use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::foundation::core::Viewport;
use crate::host::{
    HostEvent, HostPage, ListenerId, ListenerKind, SectionBounds, SectionLayout,
};

/// In-process page: `header | scrub section | footer`, scrolled programmatically.
///
/// The section height comes from the controller through [`HostPage::apply_layout`]. Scroll
/// offsets are clamped to the document. Events are queued only for kinds that have a live
/// listener; drain them with [`SimulatedPage::take_events`].
#[derive(Debug)]
pub struct SimulatedPage {
    state: Mutex<PageState>,
}

#[derive(Debug)]
struct PageState {
    viewport: Viewport,
    header: f64,
    footer: f64,
    layout: SectionLayout,
    attached: bool,
    scroll_y: f64,
    next_id: u64,
    listeners: HashMap<ListenerId, ListenerKind>,
    events: VecDeque<HostEvent>,
}

impl PageState {
    fn document_height(&self) -> f64 {
        let section = if self.attached { self.layout.height } else { 0.0 };
        self.header + section + self.footer
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport.height).max(0.0)
    }

    fn clamp_scroll(&mut self) {
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    fn emit(&mut self, event: HostEvent) {
        let kind = event.kind();
        if self.listeners.values().any(|k| *k == kind) {
            self.events.push_back(event);
        }
    }
}

impl SimulatedPage {
    /// A page with no content around the section.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_surroundings(viewport, 0.0, 0.0)
    }

    /// A page with `header` pixels above and `footer` pixels below the section.
    pub fn with_surroundings(viewport: Viewport, header: f64, footer: f64) -> Self {
        Self {
            state: Mutex::new(PageState {
                viewport,
                header: header.max(0.0),
                footer: footer.max(0.0),
                layout: SectionLayout::default(),
                attached: true,
                scroll_y: 0.0,
                next_id: 0,
                listeners: HashMap::new(),
                events: VecDeque::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Scroll to `y`, clamped to the document. Queues a scroll event.
    pub fn scroll_to(&self, y: f64) {
        let mut s = self.lock();
        s.scroll_y = if y.is_finite() { y } else { 0.0 };
        s.clamp_scroll();
        s.emit(HostEvent::Scroll);
    }

    /// Scroll so the section is `progress` (`0..=1`) of the way through. Returns the new offset.
    pub fn scroll_to_progress(&self, progress: f64) -> f64 {
        let target = {
            let s = self.lock();
            let scrollable = (s.layout.height - s.viewport.height).max(0.0);
            s.header + progress.clamp(0.0, 1.0) * scrollable
        };
        self.scroll_to(target);
        self.scroll_y()
    }

    /// Change the viewport. Queues a resize event.
    pub fn resize(&self, viewport: Viewport) {
        let mut s = self.lock();
        s.viewport = viewport;
        s.clamp_scroll();
        s.emit(HostEvent::Resize);
    }

    /// Remove the section from layout; [`HostPage::section_bounds`] reports `None` afterwards.
    pub fn detach_section(&self) {
        let mut s = self.lock();
        s.attached = false;
        s.clamp_scroll();
    }

    /// Drain queued events in arrival order.
    pub fn take_events(&self) -> Vec<HostEvent> {
        self.lock().events.drain(..).collect()
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Layout most recently applied by the controller.
    pub fn layout(&self) -> SectionLayout {
        self.lock().layout.clone()
    }

    /// Total document height.
    pub fn document_height(&self) -> f64 {
        self.lock().document_height()
    }
}

impl HostPage for SimulatedPage {
    fn scroll_y(&self) -> f64 {
        self.lock().scroll_y
    }

    fn viewport(&self) -> Viewport {
        self.lock().viewport
    }

    fn section_bounds(&self) -> Option<SectionBounds> {
        let s = self.lock();
        s.attached.then(|| SectionBounds {
            top: s.header - s.scroll_y,
            height: s.layout.height,
        })
    }

    fn apply_layout(&self, layout: &SectionLayout) {
        let mut s = self.lock();
        s.layout = layout.clone();
        s.clamp_scroll();
    }

    fn add_listener(&self, kind: ListenerKind) -> ListenerId {
        let mut s = self.lock();
        s.next_id += 1;
        let id = ListenerId(s.next_id);
        s.listeners.insert(id, kind);
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.lock().listeners.remove(&id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/simulated.rs"]
mod tests;
