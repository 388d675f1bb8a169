//! Recompute coalescing.
//!
//! Rapid edits should not each trigger a full re-validation and preview
//! re-serialization. [`Debounce`] is a pure scheduling policy over
//! caller-supplied instants: a burst of mutations yields exactly one
//! recompute once the window elapses, and the last mutation before the
//! window closes determines what that recompute sees.

use std::time::{Duration, Instant};

/// Default recompute delay after a burst of edits.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(50);

/// Coalesces bursts of mutation events into one recompute.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record a mutation at `now`; the window restarts from here.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// True when a pending window has elapsed. Consumes the pending state,
    /// so it fires at most once per window.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a mutation is waiting for its window to elapse.
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop any pending window (a recompute already ran explicitly).
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
