use crate::constants::*;

/// Per-instance engine tuning. `Default` mirrors the crate constants;
/// the embedding shell overrides fields before constructing the engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub heading_tau_sec: f64,
    pub heading_confidence_floor: f64,
    pub baseline_min_confidence: f64,
    pub baseline_capture_deadline_sec: f64,

    pub recompute_interval_sec: f64,
    pub materialize_trigger_m: f64,
    pub materialized_distance_m: f64,
    pub lock_ease_tau_sec: f32,

    pub collection_range_m: f64,
    pub pick_sphere_radius_m: f32,
    pub max_detection_distance_m: f32,
    pub fov_y_radians: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            heading_tau_sec: HEADING_SMOOTHING_TAU_SEC,
            heading_confidence_floor: HEADING_CONFIDENCE_FLOOR,
            baseline_min_confidence: BASELINE_MIN_CONFIDENCE,
            baseline_capture_deadline_sec: BASELINE_CAPTURE_DEADLINE_SEC,
            recompute_interval_sec: PLACEMENT_RECOMPUTE_INTERVAL_SEC,
            materialize_trigger_m: MATERIALIZE_TRIGGER_M,
            materialized_distance_m: MATERIALIZED_VIEW_DISTANCE_M,
            lock_ease_tau_sec: LOCK_EASE_TAU_SEC,
            collection_range_m: COLLECTION_RANGE_M,
            pick_sphere_radius_m: PICK_SPHERE_RADIUS_M,
            max_detection_distance_m: MAX_DETECTION_DISTANCE_M,
            fov_y_radians: DEFAULT_FOV_Y_RADIANS,
        }
    }
}
