//! Single-deadline debounce timer.
//!
//! At most one expiry is ever pending.  [`Debounce::rearm`] cancels the
//! previous deadline before scheduling the next one, so a stale expiry can
//! never race a fresh one (last write wins).
//!
//! Time is supplied by the caller as monotonic milliseconds (`u32`, wrapping),
//! the same convention the tick-driven gesture code uses.  Nothing here
//! touches a platform timer; the owner polls from its event loop.
//!
//! The window is half-open: armed at `t`, it is still open at
//! `t + window - 1` and expired at `t + window`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    window_ms: u32,
    armed_at: Option<u32>,
}

impl Debounce {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            armed_at: None,
        }
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }

    /// Cancel any pending expiry and start a fresh window at `now_ms`.
    pub fn rearm(&mut self, now_ms: u32) {
        self.armed_at = Some(now_ms);
    }

    /// Drop the pending expiry, if any.
    pub fn cancel(&mut self) {
        self.armed_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Absolute deadline of the pending window (wrapping).
    pub fn deadline(&self) -> Option<u32> {
        self.armed_at.map(|t| t.wrapping_add(self.window_ms))
    }

    /// Whether the pending window has run out at `now_ms`.  Does not consume.
    pub fn expired(&self, now_ms: u32) -> bool {
        self.armed_at
            .is_some_and(|t| now_ms.wrapping_sub(t) >= self.window_ms)
    }

    /// Consume an expiry.  Returns `true` exactly once per armed window.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.expired(now_ms) {
            self.armed_at = None;
            true
        } else {
            false
        }
    }
}
