use crate::foundation::core::FrameIndex;

/// Counters describing how paint requests were coalesced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Total `request_paint` calls.
    pub requested: u64,
    /// Requests replaced by a newer request before a refresh tick.
    pub coalesced: u64,
    /// Paints handed out by `take_due`.
    pub executed: u64,
    /// Pending paints dropped by `cancel`.
    pub cancelled: u64,
}

/// Single-slot paint scheduler.
///
/// At most one paint is outstanding. A new request replaces the pending one; a refresh tick
/// hands out whatever is pending, once. Ticks may never arrive (e.g. a backgrounded host), in which
/// case requests simply keep replacing each other.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    pending: Option<FrameIndex>,
    stats: SchedulerStats,
}

impl RenderScheduler {
    /// An idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `frame` for the next refresh tick, replacing any pending paint.
    pub fn request_paint(&mut self, frame: FrameIndex) {
        self.stats.requested += 1;
        if let Some(prev) = self.pending.replace(frame) {
            self.stats.coalesced += 1;
            tracing::trace!(prev = prev.0, next = frame.0, "paint request coalesced");
        }
    }

    /// Called on a display refresh tick: the frame to paint now, if any.
    pub fn take_due(&mut self) -> Option<FrameIndex> {
        let due = self.pending.take()?;
        self.stats.executed += 1;
        Some(due)
    }

    /// Drop the pending paint without executing it.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.stats.cancelled += 1;
        }
    }

    /// The frame waiting for the next tick.
    pub fn pending(&self) -> Option<FrameIndex> {
        self.pending
    }

    /// Coalescing counters.
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scheduler.rs"]
mod tests;
