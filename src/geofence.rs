//! Geofence evaluation: one fixed target zone, one-shot arrival.
//!
//! Distances are geodesic on the WGS84 ellipsoid (Vincenty inverse), the
//! same computation mobile location stacks use for their `distanceBetween`
//! helpers.  The evaluator owns the arrival flag:
//!
//! ```text
//!   fix ──▶ classify ──▶ Inside? ──▶ arrived already? ──no──▶ ARRIVED (once)
//!                          │                 │
//!                       Outside             yes ──▶ (nothing)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// WGS84 semi-major axis (metres).
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 semi-minor axis (metres).
const WGS84_B: f64 = 6_356_752.314_2;
/// WGS84 flattening.
const WGS84_F: f64 = (WGS84_A - WGS84_B) / WGS84_A;
/// Mean Earth radius for the haversine fallback (metres).
const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

const VINCENTY_MAX_ITERS: usize = 20;
const VINCENTY_TOLERANCE: f64 = 1.0e-12;

// ---------------------------------------------------------------------------
// GeoPoint
// ---------------------------------------------------------------------------

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both coordinates are finite and inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl core::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.latitude, self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// Geodesic distance between two points in metres.
///
/// Uses Vincenty's inverse formula on WGS84.  Nearly antipodal pairs where
/// the iteration does not converge fall back to a haversine great-circle
/// distance.
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    vincenty_m(a, b).unwrap_or_else(|| haversine_m(a, b))
}

/// Vincenty inverse.  `None` when the iteration does not converge.
fn vincenty_m(a: GeoPoint, b: GeoPoint) -> Option<f64> {
    let l = (b.longitude - a.longitude).to_radians();
    let u1 = ((1.0 - WGS84_F) * a.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * b.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..VINCENTY_MAX_ITERS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // Coincident points.
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial line: cos²α = 0.
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));

        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < VINCENTY_TOLERANCE {
            let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
            return Some(WGS84_B * big_a * (sigma - delta_sigma));
        }
    }
    None
}

fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();
    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

// ---------------------------------------------------------------------------
// Target zone
// ---------------------------------------------------------------------------

/// Result of classifying a fix against the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    Inside,
    Outside,
}

/// Fixed circular zone around a center point.  Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetZone {
    center: GeoPoint,
    radius_m: f64,
}

impl TargetZone {
    /// Build a zone.  Rejects invalid centers and non-positive radii.
    pub fn new(center: GeoPoint, radius_m: f64) -> Result<Self> {
        if !center.is_valid() {
            return Err(Error::Config("target center out of range"));
        }
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(Error::Config("target radius must be > 0"));
        }
        Ok(Self { center, radius_m })
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Classify `point`; the boundary (distance == radius) counts as inside.
    pub fn classify(&self, point: GeoPoint) -> (Proximity, f64) {
        let distance = distance_m(point, self.center);
        let proximity = if distance <= self.radius_m {
            Proximity::Inside
        } else {
            Proximity::Outside
        };
        (proximity, distance)
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        self.classify(point).0 == Proximity::Inside
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Outcome of evaluating one fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub proximity: Proximity,
    pub distance_m: f64,
    /// `true` only for the fix that first put us inside the zone.
    pub arrived: bool,
}

/// Arrival detector.  The arrival flag is one-shot for the lifetime of the
/// evaluator and cannot be re-armed.
#[derive(Debug, Clone)]
pub struct GeofenceEvaluator {
    zone: TargetZone,
    arrived: bool,
}

impl GeofenceEvaluator {
    pub fn new(zone: TargetZone) -> Self {
        Self {
            zone,
            arrived: false,
        }
    }

    pub fn evaluate(&mut self, point: GeoPoint) -> Evaluation {
        let (proximity, distance_m) = self.zone.classify(point);
        let arrived = proximity == Proximity::Inside && !self.arrived;
        if arrived {
            self.arrived = true;
        }
        Evaluation {
            proximity,
            distance_m,
            arrived,
        }
    }

    pub fn has_arrived(&self) -> bool {
        self.arrived
    }

    pub fn zone(&self) -> &TargetZone {
        &self.zone
    }
}
