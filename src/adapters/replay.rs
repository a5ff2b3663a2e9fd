//! Scripted replay platform.
//!
//! Implements every platform port against a recorded trace so the full
//! service can run on a host without a device.  The trace describes the
//! device up front (permission state, proximity sensor, installed handlers)
//! followed by time-stamped callbacks:
//!
//! ```json
//! {
//!   "device": { "permission_granted": false, "proximity_max_range": 5.0,
//!               "handlers": ["https://www.instagram.com"] },
//!   "events": [
//!     { "at_ms": 0,     "type": "permission", "granted": true },
//!     { "at_ms": 10000, "type": "location", "fixes": [{ "latitude": 37.6097, "longitude": 126.998 }] },
//!     { "at_ms": 12000, "type": "proximity", "distance": 0.0 },
//!     { "at_ms": 20000, "type": "shutdown" }
//!   ]
//! }
//! ```
//!
//! Callbacks the real platform would never deliver (fixes while updates are
//! stopped, sensor changes without a registered listener) are dropped.

use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::commands::AppCommand;
use crate::app::ports::{
    DisplayPort, EventSink, LauncherPort, LocationPort, Notice, PermissionPort, ProximityPort,
};
use crate::app::service::AppService;
use crate::config::LocationRequest;
use crate::error::{LaunchError, LocationError, Result, SensorError};
use crate::events::{Event, EventQueue, LocationBatch, MAX_FIXES_PER_RESULT, TimedEvent};
use crate::geofence::GeoPoint;
use crate::proximity::ProximityReading;

// ═══════════════════════════════════════════════════════════════
//  Trace format
// ═══════════════════════════════════════════════════════════════

/// Facts about the simulated device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    /// Fine-location permission already granted at launch.
    pub permission_granted: bool,
    /// Maximum range of the proximity sensor; `None` = no sensor.
    pub proximity_max_range: Option<f32>,
    /// URI prefixes that have an installed handler.
    pub handlers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// One location callback.
    Location { fixes: Vec<GeoPoint> },
    /// One proximity sensor change.
    Proximity { distance: f32 },
    /// The permission prompt answered.
    Permission {
        granted: bool,
        #[serde(default)]
        request_code: Option<u16>,
    },
    /// Nothing happened; only lets timers expire.
    Tick,
    /// The app is being torn down.
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub at_ms: u32,
    #[serde(flatten)]
    pub event: TraceEvent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Trace {
    pub device: DeviceProfile,
    pub events: Vec<TraceEntry>,
}

impl Trace {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }
}

// ═══════════════════════════════════════════════════════════════
//  ReplayPlatform
// ═══════════════════════════════════════════════════════════════

/// In-memory platform driven by a [`DeviceProfile`].  Records every call
/// the service makes so the replay can be summarised afterwards.
#[derive(Debug, Default)]
pub struct ReplayPlatform {
    permission_granted: bool,
    max_range: Option<f32>,
    handlers: Vec<String>,

    location_request: Option<LocationRequest>,
    proximity_registered: bool,
    permission_requests: Vec<u16>,
    opened: Vec<String>,
    foreground_requests: u32,
    notices: Vec<Notice>,
    last_location: Option<GeoPoint>,
}

impl ReplayPlatform {
    pub fn new(device: &DeviceProfile) -> Self {
        Self {
            permission_granted: device.permission_granted,
            max_range: device.proximity_max_range,
            handlers: device.handlers.clone(),
            ..Default::default()
        }
    }

    /// Translate one trace entry into the queue events the real platform
    /// would deliver right now.
    pub fn deliver(&mut self, entry: &TraceEntry, default_request_code: u16) -> Vec<TimedEvent> {
        let at = entry.at_ms;
        match &entry.event {
            TraceEvent::Location { fixes } => {
                if self.location_request.is_none() {
                    debug!("replay: dropping {} fix(es), updates not running", fixes.len());
                    return Vec::new();
                }
                fixes
                    .chunks(MAX_FIXES_PER_RESULT)
                    .map(|chunk| {
                        let batch: LocationBatch = chunk.iter().copied().collect();
                        TimedEvent::new(at, Event::LocationResult(batch))
                    })
                    .collect()
            }
            TraceEvent::Proximity { distance } => match self.max_range {
                Some(max_range) if self.proximity_registered => vec![TimedEvent::new(
                    at,
                    Event::Proximity(ProximityReading::new(*distance, max_range)),
                )],
                _ => {
                    debug!("replay: dropping proximity change, no listener");
                    Vec::new()
                }
            },
            TraceEvent::Permission {
                granted,
                request_code,
            } => {
                if *granted {
                    self.permission_granted = true;
                }
                let request_code = request_code
                    .or_else(|| self.permission_requests.last().copied())
                    .unwrap_or(default_request_code);
                vec![TimedEvent::new(
                    at,
                    Event::Command(AppCommand::PermissionResult {
                        request_code,
                        granted: *granted,
                    }),
                )]
            }
            TraceEvent::Tick => vec![TimedEvent::new(at, Event::Tick)],
            TraceEvent::Shutdown => vec![TimedEvent::new(at, Event::Command(AppCommand::Shutdown))],
        }
    }

    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    pub fn foreground_requests(&self) -> u32 {
        self.foreground_requests
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn last_location(&self) -> Option<GeoPoint> {
        self.last_location
    }

    pub fn location_running(&self) -> bool {
        self.location_request.is_some()
    }

    pub fn proximity_registered(&self) -> bool {
        self.proximity_registered
    }
}

impl LocationPort for ReplayPlatform {
    fn start_updates(&mut self, request: &LocationRequest) -> Result<()> {
        if !self.permission_granted {
            return Err(LocationError::PermissionDenied.into());
        }
        debug!("replay: location updates every {} ms", request.interval_ms);
        self.location_request = Some(*request);
        Ok(())
    }

    fn stop_updates(&mut self) {
        self.location_request = None;
    }
}

impl PermissionPort for ReplayPlatform {
    fn has_fine_location(&self) -> bool {
        self.permission_granted
    }

    fn request_fine_location(&mut self, request_code: u16) {
        self.permission_requests.push(request_code);
    }
}

impl ProximityPort for ReplayPlatform {
    fn max_range(&self) -> Option<f32> {
        self.max_range
    }

    fn register(&mut self) -> Result<()> {
        if self.max_range.is_none() {
            return Err(SensorError::Unavailable.into());
        }
        self.proximity_registered = true;
        Ok(())
    }

    fn unregister(&mut self) {
        self.proximity_registered = false;
    }
}

impl LauncherPort for ReplayPlatform {
    fn open_uri(&mut self, uri: &str) -> core::result::Result<(), LaunchError> {
        if uri.trim().is_empty() {
            return Err(LaunchError::InvalidUri);
        }
        if self.handlers.iter().any(|h| uri.starts_with(h.as_str())) {
            self.opened.push(uri.to_owned());
            Ok(())
        } else {
            Err(LaunchError::NoHandler)
        }
    }

    fn bring_to_foreground(&mut self) {
        self.foreground_requests += 1;
    }
}

impl DisplayPort for ReplayPlatform {
    fn show_location(&mut self, point: GeoPoint) {
        self.last_location = Some(point);
    }

    fn show_notice(&mut self, notice: Notice) {
        info!("NOTICE | {}", notice.message());
        self.notices.push(notice);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Replay loop
// ═══════════════════════════════════════════════════════════════

/// What happened during a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub arrived: bool,
    pub opened: Vec<String>,
    pub foreground_requests: u32,
    pub dispatched: usize,
    pub dropped: usize,
}

/// Feed `trace` through `app` via the event queue, one entry at a time.
///
/// Before each entry a tick at the entry's timestamp lets due timers
/// expire in order.  Entries stamped earlier than one already replayed are
/// delivered at the latest time seen so far.  If the trace did not shut the
/// app down, a final tick one tap window after the last entry flushes any
/// pending window and a shutdown is issued.
pub fn run(
    trace: &Trace,
    app: &mut AppService,
    platform: &mut ReplayPlatform,
    sink: &mut impl EventSink,
) -> ReplaySummary {
    let mut queue = EventQueue::new();
    let mut dispatched = 0usize;
    let mut dropped = 0usize;
    let default_code = app.config().permission_request_code;

    app.start(platform, sink);

    let mut last_at = 0u32;
    for entry in &trace.events {
        if entry.at_ms < last_at {
            warn!(
                "replay: entry at {} ms is earlier than {} ms, stamping it at {} ms",
                entry.at_ms, last_at, last_at
            );
        }
        last_at = last_at.max(entry.at_ms);

        // Replayed time is monotone; timers compare with wrapping arithmetic.
        let at = last_at;
        let mut batch = vec![TimedEvent::new(at, Event::Tick)];
        batch.extend(platform.deliver(entry, default_code).into_iter().map(|mut e| {
            e.at_ms = at;
            e
        }));
        for event in batch {
            if !queue.push(event) {
                dropped += 1;
            }
        }
        queue.drain(|event| {
            dispatched += 1;
            app.dispatch(event, &mut *platform, &mut *sink);
        });
    }

    if !app.is_stopped() {
        let flush_at = last_at.wrapping_add(app.config().tap_window_ms);
        app.tick(flush_at, sink);
        app.handle_command(AppCommand::Shutdown, platform, sink);
    }

    let summary = ReplaySummary {
        arrived: app.has_arrived(),
        opened: platform.opened().to_vec(),
        foreground_requests: platform.foreground_requests(),
        dispatched,
        dropped,
    };
    info!(
        "replay: {} event(s) dispatched, {} dropped, arrived={}, foreground={}",
        summary.dispatched, summary.dropped, summary.arrived, summary.foreground_requests
    );
    summary
}
