//! Application configuration parameters.
//!
//! All tunable parameters for boundy.  Defaults reproduce the stock
//! deployment; values can be overridden from a JSON file through the
//! [`ConfigPort`](crate::app::ports::ConfigPort).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::geofence::{GeoPoint, TargetZone};
use crate::tap::{DEFAULT_TAP_THRESHOLD, DEFAULT_TAP_WINDOW_MS};

/// Location provider priority, mirroring the usual fused-provider levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPriority {
    #[default]
    HighAccuracy,
    Balanced,
    LowPower,
    Passive,
}

/// Parameters handed to the location provider when updates start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRequest {
    pub interval_ms: u32,
    pub priority: LocationPriority,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            priority: LocationPriority::HighAccuracy,
        }
    }
}

/// Core application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // --- Target zone ---
    /// Zone center latitude (decimal degrees)
    pub target_latitude: f64,
    /// Zone center longitude (decimal degrees)
    pub target_longitude: f64,
    /// Zone radius in metres
    pub target_radius_m: f64,

    // --- Location ---
    pub location: LocationRequest,
    /// Request code used for the fine-location permission prompt
    pub permission_request_code: u16,

    // --- Tap gesture ---
    /// Debounce window between taps (milliseconds)
    pub tap_window_ms: u32,
    /// Taps needed to request the foreground
    pub tap_threshold: u8,

    // --- Launch targets ---
    /// Opened on arrival
    pub primary_uri: String,
    /// Opened when nothing can handle `primary_uri`
    pub fallback_uri: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            // Target zone
            target_latitude: 37.609_717_4,
            target_longitude: 126.998_012_2,
            target_radius_m: 100.0,

            // Location
            location: LocationRequest::default(),
            permission_request_code: 100,

            // Tap gesture
            tap_window_ms: DEFAULT_TAP_WINDOW_MS,
            tap_threshold: DEFAULT_TAP_THRESHOLD,

            // Launch targets
            primary_uri: "https://www.youtube.com".into(),
            fallback_uri: "https://www.instagram.com".into(),
        }
    }
}

impl AppConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !GeoPoint::new(self.target_latitude, self.target_longitude).is_valid() {
            return Err(ConfigError::ValidationFailed(
                "target latitude/longitude out of range",
            ));
        }
        if !self.target_radius_m.is_finite() || self.target_radius_m <= 0.0 {
            return Err(ConfigError::ValidationFailed("target_radius_m must be > 0"));
        }
        if self.location.interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "location.interval_ms must be > 0",
            ));
        }
        if self.tap_window_ms == 0 {
            return Err(ConfigError::ValidationFailed("tap_window_ms must be > 0"));
        }
        if self.tap_threshold == 0 {
            return Err(ConfigError::ValidationFailed("tap_threshold must be > 0"));
        }
        if self.primary_uri.trim().is_empty() || self.fallback_uri.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("launch URIs must not be empty"));
        }
        Ok(())
    }

    /// Build the immutable target zone described by this config.
    pub fn target_zone(&self) -> crate::error::Result<TargetZone> {
        TargetZone::new(
            GeoPoint::new(self.target_latitude, self.target_longitude),
            self.target_radius_m,
        )
    }
}
