use std::time::{Duration, Instant};

/// Quiet window for ordinary form input
pub const FORM_INPUT_DEBOUNCE_MS: u64 = 300;
/// Quiet window after an extra-payment edit
pub const EXTRA_PAYMENT_DEBOUNCE_MS: u64 = 750;

/// Trailing debounce for recompute requests.
///
/// Each `submit` replaces the pending request and pushes the deadline out.
/// The caller drives time: `poll(now)` hands back the request once its quiet
/// window has elapsed.
#[derive(Debug)]
pub struct RecomputeDebouncer<T> {
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Default for RecomputeDebouncer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            deadline: None,
        }
    }
}

impl<T> RecomputeDebouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `request`, superseding any pending one.
    pub fn submit(&mut self, request: T, now: Instant, window: Duration) {
        if self.pending.is_some() {
            tracing::trace!("pending recompute superseded");
        }
        self.pending = Some(request);
        self.deadline = Some(now + window);
    }

    /// Take the pending request if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Drop the pending request, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before `poll` will fire; zero once due.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}
