//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::error::LaunchError;
use crate::geofence::GeoPoint;
use crate::launch::LaunchOutcome;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started.
    Started {
        location_active: bool,
        tap_detection: bool,
    },

    /// Fine-location permission was requested from the user.
    PermissionRequested { request_code: u16 },

    /// Fine-location permission was refused (or answered for another code).
    PermissionDenied { request_code: u16 },

    /// Location updates are flowing.
    LocationStarted,

    /// A position fix was evaluated.
    LocationUpdated {
        point: GeoPoint,
        distance_m: f64,
        inside: bool,
    },

    /// First fix inside the target zone.  Emitted once per process.
    Arrived { point: GeoPoint, distance_m: f64 },

    /// An external target was opened after arrival.
    Launched(LaunchOutcome),

    /// Both launch attempts failed.
    LaunchFailed(LaunchError),

    /// A proximity tap was counted.
    TapCounted { count: u8 },

    /// The tap window ran out before the gesture completed.
    TapWindowExpired { dropped: u8 },

    /// Triple tap detected; the app was asked to come to the foreground.
    ForegroundRequested,

    /// Listeners released.
    Stopped,
}
