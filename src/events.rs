//! Inbound event queue.
//!
//! Events are produced by platform callbacks:
//! - location provider (batches of position fixes)
//! - proximity sensor listener (change events)
//! - permission prompt / lifecycle (commands)
//! - the host loop's own timer tick
//!
//! and consumed by a single loop that hands them to
//! [`AppService::dispatch`](crate::app::service::AppService::dispatch) one at
//! a time, so the state machines only ever see serial mutation.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Location CB │────▶│              │     │              │
//! │ Sensor CB   │────▶│  EventQueue  │────▶│  Main Loop   │
//! │ Permission  │────▶│  (SPSC)      │     │  (consumer)  │
//! │ Timer tick  │────▶│              │     │              │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::spsc::{Consumer, Producer, Queue};
use log::warn;

use crate::app::commands::AppCommand;
use crate::geofence::GeoPoint;
use crate::proximity::ProximityReading;

/// Slots in the queue.  One slot is reserved by the ring buffer, so at most
/// `EVENT_QUEUE_CAP - 1` events can be pending.
pub const EVENT_QUEUE_CAP: usize = 32;

/// Maximum fixes a provider may deliver in one callback.
pub const MAX_FIXES_PER_RESULT: usize = 8;

/// A batch of fixes delivered by one location callback.
pub type LocationBatch = heapless::Vec<GeoPoint, MAX_FIXES_PER_RESULT>;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The location provider delivered one or more fixes.
    LocationResult(LocationBatch),
    /// The proximity sensor value changed.
    Proximity(ProximityReading),
    /// Periodic wake-up so pending timers can expire.
    Tick,
    /// Permission answer or lifecycle request.
    Command(AppCommand),
}

/// An event stamped with the monotonic time it was observed.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub at_ms: u32,
    pub event: Event,
}

impl TimedEvent {
    pub fn new(at_ms: u32, event: Event) -> Self {
        Self { at_ms, event }
    }
}

/// Bounded FIFO between producers (platform callbacks) and the consumer loop.
pub struct EventQueue {
    inner: Queue<TimedEvent, EVENT_QUEUE_CAP>,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            inner: Queue::new(),
        }
    }

    /// Push an event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: TimedEvent) -> bool {
        match self.inner.enqueue(event) {
            Ok(()) => true,
            Err(dropped) => {
                warn!("EventQueue full, dropping {:?}", dropped.event);
                false
            }
        }
    }

    /// Pop the next event in FIFO order.
    pub fn pop(&mut self) -> Option<TimedEvent> {
        self.inner.dequeue()
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(TimedEvent)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Split into a producer half for callbacks and a consumer half for the
    /// loop.  Each half may live in a different context.
    pub fn split(
        &mut self,
    ) -> (
        Producer<'_, TimedEvent, EVENT_QUEUE_CAP>,
        Consumer<'_, TimedEvent, EVENT_QUEUE_CAP>,
    ) {
        self.inner.split()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
