//! Unified error types for boundy.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! service's error handling uniform. All variants are `Copy` so they can be
//! passed through the state machines and event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration or a value derived from it is invalid.
    Config(&'static str),
    /// Opening an external target failed.
    Launch(LaunchError),
    /// The proximity sensor could not be used.
    Sensor(SensorError),
    /// The location provider refused to start.
    Location(LocationError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Launch(e) => write!(f, "launch: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Location(e) => write!(f, "location: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Launch errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchError {
    /// No installed handler can open the URI.
    NoHandler,
    /// The URI could not be parsed by the platform.
    InvalidUri,
    /// The platform refused to start the handler.
    Rejected,
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHandler => write!(f, "no handler for URI"),
            Self::InvalidUri => write!(f, "invalid URI"),
            Self::Rejected => write!(f, "launch rejected"),
        }
    }
}

impl From<LaunchError> for Error {
    fn from(e: LaunchError) -> Self {
        Self::Launch(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The device has no proximity sensor.
    Unavailable,
    /// The sensor manager refused the listener registration.
    RegistrationFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "proximity sensor unavailable"),
            Self::RegistrationFailed => write!(f, "listener registration failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Location errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    /// Fine-location permission has not been granted.
    PermissionDenied,
    /// The provider is disabled or disconnected.
    ProviderUnavailable,
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::ProviderUnavailable => write!(f, "provider unavailable"),
        }
    }
}

impl From<LocationError> for Error {
    fn from(e: LocationError) -> Self {
        Self::Location(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
