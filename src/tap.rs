//! Proximity triple-tap detector.
//!
//! ## Gesture detection
//!
//! | Input          | Effect                                                  |
//! |----------------|---------------------------------------------------------|
//! | tap            | count += 1, window rearmed                              |
//! | count == N     | `ForegroundRequested`, count = 0, window cancelled       |
//! | window expiry  | count = 0, no gesture                                   |
//!
//! `N` defaults to 3 and the window to 2000 ms.  A tap landing exactly on
//! the window deadline sees the expiry first and starts a new count.

use log::debug;

use crate::debounce::Debounce;

pub const DEFAULT_TAP_WINDOW_MS: u32 = 2000;
pub const DEFAULT_TAP_THRESHOLD: u8 = 3;

/// Gestures emitted after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapGesture {
    /// `threshold` taps arrived with no gap longer than the window.
    ForegroundRequested,
}

/// Observable state of the detector.  `Triggered` is momentary and never
/// observed from outside: the detector returns to `Idle` in the same call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapState {
    Idle,
    Counting(u8),
}

#[derive(Debug, Clone)]
pub struct TapDebouncer {
    count: u8,
    threshold: u8,
    window: Debounce,
}

impl TapDebouncer {
    /// `threshold` of 0 is treated as 1.
    pub fn new(window_ms: u32, threshold: u8) -> Self {
        Self {
            count: 0,
            threshold: threshold.max(1),
            window: Debounce::new(window_ms),
        }
    }

    /// Register one proximity trigger at `now_ms`.
    pub fn on_tap(&mut self, now_ms: u32) -> Option<TapGesture> {
        // Expiry that is already due wins over the new tap.
        self.poll(now_ms);

        self.count += 1;
        self.window.rearm(now_ms);
        debug!("tap {}/{} at {}ms", self.count, self.threshold, now_ms);

        if self.count >= self.threshold {
            self.count = 0;
            self.window.cancel();
            return Some(TapGesture::ForegroundRequested);
        }
        None
    }

    /// Expire the window if due.  Returns the count that was discarded, or
    /// `None` when nothing expired.
    pub fn poll(&mut self, now_ms: u32) -> Option<u8> {
        if self.window.poll(now_ms) {
            let dropped = self.count;
            self.count = 0;
            Some(dropped)
        } else {
            None
        }
    }

    /// Drop any partial gesture without reporting it.
    pub fn reset(&mut self) {
        self.count = 0;
        self.window.cancel();
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn state(&self) -> TapState {
        match self.count {
            0 => TapState::Idle,
            n => TapState::Counting(n),
        }
    }

    pub fn window_pending(&self) -> bool {
        self.window.is_pending()
    }
}

impl Default for TapDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_WINDOW_MS, DEFAULT_TAP_THRESHOLD)
    }
}
