//! Port traits: the hexagonal boundary between domain logic and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Platform adapters (location provider, permission prompt, proximity
//! sensor, URI launcher, on-screen notices, event sinks, config storage)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never calls a platform
//! API directly.
//!
//! Callback-style sources (location fixes, sensor changes, permission
//! results) do not call into the domain themselves: adapters push them into
//! the [`EventQueue`](crate::events::EventQueue) and the consumer loop
//! dispatches them one at a time.

use crate::config::{AppConfig, LocationRequest};
use crate::error::{LaunchError, Result};
use crate::geofence::GeoPoint;

// ───────────────────────────────────────────────────────────────
// Location port (domain → location provider)
// ───────────────────────────────────────────────────────────────

/// Controls the subscription to periodic position fixes.
pub trait LocationPort {
    /// Begin delivering fixes with the given interval and priority.
    fn start_updates(&mut self, request: &LocationRequest) -> Result<()>;

    /// Stop delivering fixes.  Safe to call when not started.
    fn stop_updates(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Permission port (domain ↔ permission prompt)
// ───────────────────────────────────────────────────────────────

pub trait PermissionPort {
    /// Whether fine-location permission is currently granted.
    fn has_fine_location(&self) -> bool;

    /// Show the permission prompt.  The answer comes back later as
    /// [`AppCommand::PermissionResult`](super::commands::AppCommand) carrying
    /// `request_code`.
    fn request_fine_location(&mut self, request_code: u16);
}

// ───────────────────────────────────────────────────────────────
// Proximity port (sensor → domain subscription)
// ───────────────────────────────────────────────────────────────

/// Subscription handle on the proximity sensor.
pub trait ProximityPort {
    /// Maximum range of the sensor, or `None` when the device has none.
    fn max_range(&self) -> Option<f32>;

    /// Start receiving change events.
    fn register(&mut self) -> Result<()>;

    /// Stop receiving change events.  Safe to call when not registered.
    fn unregister(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Launcher port (domain → activity / intent system)
// ───────────────────────────────────────────────────────────────

pub trait LauncherPort {
    /// Open `uri` in whichever installed handler the platform prefers.
    fn open_uri(&mut self, uri: &str) -> core::result::Result<(), LaunchError>;

    /// Bring this app's own screen back to the foreground.
    fn bring_to_foreground(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (domain → UI)
// ───────────────────────────────────────────────────────────────

/// Short user-visible notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The primary target opened.
    PrimaryOpened,
    /// The primary target failed to open; the fallback opened instead.
    FallbackOpened,
    /// The triple-tap gesture brought the app to the front.
    ForegroundRestored,
    /// Location permission was refused.
    PermissionRequired,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Self::PrimaryOpened => "Target app opened.",
            Self::FallbackOpened => "Target app missing; opened in browser.",
            Self::ForegroundRestored => "App moved to foreground.",
            Self::PermissionRequired => "Location permission is required.",
        }
    }
}

pub trait DisplayPort {
    /// Render the latest position fix.
    fn show_location(&mut self, point: GeoPoint);

    /// Show a transient notice.
    fn show_notice(&mut self, notice: Notice);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists [`AppConfig`].
///
/// Implementations MUST run [`AppConfig::validate`] before persisting and
/// after loading.  Invalid values are rejected, not clamped.
pub trait ConfigPort {
    /// Load configuration.  Returns [`AppConfig::default()`] if nothing is
    /// stored yet.
    fn load(&self) -> core::result::Result<AppConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &AppConfig) -> core::result::Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage.
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::NotFound => Self::Config("config not found"),
            ConfigError::Corrupted => Self::Config("config corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::IoError => Self::Config("config I/O error"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Platform bundle
// ───────────────────────────────────────────────────────────────

/// Everything the service drives on the platform side.  Blanket-implemented,
/// so a single adapter (or mock) implementing every port qualifies.
pub trait Platform: LocationPort + PermissionPort + ProximityPort + LauncherPort + DisplayPort {}

impl<T> Platform for T where T: LocationPort + PermissionPort + ProximityPort + LauncherPort + DisplayPort {}
