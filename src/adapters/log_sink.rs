//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! `log` facade.  Tagged prefixes keep the output greppable.

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                location_active,
                tap_detection,
            } => {
                info!(
                    "START | location={} taps={}",
                    if *location_active { "ON" } else { "OFF" },
                    if *tap_detection { "ON" } else { "OFF" },
                );
            }
            AppEvent::PermissionRequested { request_code } => {
                info!("PERM | requested code={}", request_code);
            }
            AppEvent::PermissionDenied { request_code } => {
                warn!("PERM | denied code={}", request_code);
            }
            AppEvent::LocationStarted => {
                info!("FIX | updates started");
            }
            AppEvent::LocationUpdated {
                point,
                distance_m,
                inside,
            } => {
                info!(
                    "FIX | lat={:.7} lon={:.7} | {:.1} m | {}",
                    point.latitude,
                    point.longitude,
                    distance_m,
                    if *inside { "INSIDE" } else { "outside" },
                );
            }
            AppEvent::Arrived { point, distance_m } => {
                info!("ARRIVE | at {} ({:.1} m from center)", point, distance_m);
            }
            AppEvent::Launched(outcome) => {
                info!("LAUNCH | {:?}", outcome);
            }
            AppEvent::LaunchFailed(e) => {
                error!("LAUNCH | failed: {}", e);
            }
            AppEvent::TapCounted { count } => {
                debug!("TAP | count={}", count);
            }
            AppEvent::TapWindowExpired { dropped } => {
                debug!("TAP | window expired, dropped={}", dropped);
            }
            AppEvent::ForegroundRequested => {
                info!("TAP | triple tap, foreground requested");
            }
            AppEvent::Stopped => {
                info!("STOP | listeners released");
            }
        }
    }
}
