//! Egocentric position mapping.
//!
//! Converts a target's geodesic bearing/distance into a viewer-relative
//! offset: +X right/east of the facing direction, +Y up, +Z forward.
//! Close to a target, raw GPS distance is too noisy to drive placement,
//! so the mapper switches to a fixed comfortable viewing distance (the
//! "materialized" regime) and leaves the true distance to the radar
//! indicator. Geodesic recomputes are throttled on wall-clock time,
//! independent of the tick rate.

use glam::Vec3;

use crate::config::EngineConfig;
use crate::constants::{BAND_FAR_M, BAND_HERE_M, BAND_NEAR_M};
use crate::geo::{bearing_deg, distance_m, normalize_deg_signed, GeoPoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceMode {
    /// Placement reflects true geodesic distance.
    FarField,
    /// Placement uses the fixed viewing distance; true distance is
    /// still reported for indicators.
    Materialized,
}

/// Coarse radar classification of true distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceBand {
    Here,
    Near,
    Far,
    OutOfRange,
}

#[inline]
pub fn distance_band(distance_m: f64) -> DistanceBand {
    if distance_m <= BAND_HERE_M {
        DistanceBand::Here
    } else if distance_m <= BAND_NEAR_M {
        DistanceBand::Near
    } else if distance_m <= BAND_FAR_M {
        DistanceBand::Far
    } else {
        DistanceBand::OutOfRange
    }
}

/// Bearing from player to target relative to the egocentric frame's
/// forward axis, in `(-180, 180]`. `frame_heading_deg` is the current
/// stabilized heading (seeded from the session baseline).
#[inline]
pub fn relative_bearing_deg(player: GeoPoint, target: GeoPoint, frame_heading_deg: f64) -> f64 {
    normalize_deg_signed(bearing_deg(player, target) - frame_heading_deg)
}

/// Project a relative bearing and distance into the viewer frame.
#[inline]
pub fn egocentric_offset(relative_bearing_deg: f64, distance_m: f64, height_offset: f32) -> Vec3 {
    let rb = relative_bearing_deg.to_radians();
    Vec3::new(
        (distance_m * rb.sin()) as f32,
        height_offset,
        (distance_m * rb.cos()) as f32,
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Viewer-relative candidate position (pre-lock).
    pub offset: Vec3,
    /// True geodesic distance, regardless of mode.
    pub true_distance_m: f64,
    pub relative_bearing_deg: f64,
    pub mode: DistanceMode,
}

/// Per-target mapper with wall-clock recompute throttling.
pub struct PositionMapper {
    recompute_interval_sec: f64,
    materialize_trigger_m: f64,
    materialized_distance_m: f64,
    last_recompute_sec: Option<f64>,
    cached: Option<Placement>,
}

impl PositionMapper {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            recompute_interval_sec: config.recompute_interval_sec,
            materialize_trigger_m: config.materialize_trigger_m,
            materialized_distance_m: config.materialized_distance_m,
            last_recompute_sec: None,
            cached: None,
        }
    }

    /// Drop the cache so the next `compute` runs the full geodesic
    /// path (target moved, session reset).
    pub fn invalidate(&mut self) {
        self.last_recompute_sec = None;
        self.cached = None;
    }

    pub fn compute(
        &mut self,
        now_sec: f64,
        player: GeoPoint,
        target: GeoPoint,
        frame_heading_deg: f64,
        height_offset: f32,
    ) -> Placement {
        if let (Some(last), Some(cached)) = (self.last_recompute_sec, self.cached) {
            if now_sec - last < self.recompute_interval_sec {
                return cached;
            }
        }

        let true_distance = distance_m(player, target);
        let rb = relative_bearing_deg(player, target, frame_heading_deg);
        let (mode, placed_distance) = if true_distance < self.materialize_trigger_m {
            (DistanceMode::Materialized, self.materialized_distance_m)
        } else {
            (DistanceMode::FarField, true_distance)
        };
        let placement = Placement {
            offset: egocentric_offset(rb, placed_distance, height_offset),
            true_distance_m: true_distance,
            relative_bearing_deg: rb,
            mode,
        };
        self.last_recompute_sec = Some(now_sec);
        self.cached = Some(placement);
        placement
    }
}
