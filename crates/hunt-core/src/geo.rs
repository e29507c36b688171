//! Geodesic math between GPS coordinates.
//!
//! Pure functions only: no side effects, deterministic safe values for
//! coincident and antipodal inputs, and never NaN for valid points.

use crate::error::HuntError;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated WGS84 coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, HuntError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(HuntError::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(HuntError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(HuntError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Normalize an angle into `[0, 360)`.
#[inline]
pub fn normalize_deg(deg: f64) -> f64 {
    let d = deg % 360.0;
    if d < 0.0 {
        d + 360.0
    } else {
        d
    }
}

/// Normalize an angle into `(-180, 180]`.
#[inline]
pub fn normalize_deg_signed(deg: f64) -> f64 {
    let d = normalize_deg(deg);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Signed shortest-arc rotation carrying `from` onto `to`, in
/// `(-180, 180]`. Crossing 0/360 takes the short way: 350 -> 10 is +20.
#[inline]
pub fn shortest_arc_deg(from: f64, to: f64) -> f64 {
    normalize_deg_signed(to - from)
}

/// Initial compass bearing from one point toward another, in `[0, 360)`.
/// Coincident points yield 0.
#[inline]
pub fn bearing_deg(from: GeoPoint, to: GeoPoint) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let d_lambda = (to.longitude - from.longitude).to_radians();
    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    if y == 0.0 && x == 0.0 {
        return 0.0;
    }
    normalize_deg(y.atan2(x).to_degrees())
}

/// Haversine great-circle distance in meters. Symmetric; the `asin`
/// argument is clamped so float overshoot near antipodes cannot
/// produce NaN.
#[inline]
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();
    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().clamp(-1.0, 1.0).asin()
}
