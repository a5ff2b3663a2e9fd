//! Proximity sensor readings.
//!
//! Sensors report a raw distance and advertise a maximum range.  Binary
//! sensors report exactly `max_range` for "far" and something smaller for
//! "near", so any value below the maximum counts as a tap.

use serde::{Deserialize, Serialize};

/// One sensor change event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityReading {
    /// Raw distance reported by the sensor (usually centimetres).
    pub distance: f32,
    /// Maximum range advertised by the sensor.
    pub max_range: f32,
}

impl ProximityReading {
    pub const fn new(distance: f32, max_range: f32) -> Self {
        Self {
            distance,
            max_range,
        }
    }

    /// `true` when something is closer than the sensor's maximum range.
    pub fn is_trigger(&self) -> bool {
        self.distance < self.max_range
    }
}
