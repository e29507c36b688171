// Shared tuning constants for the targeting engine. EngineConfig
// defaults pull from these; the shell can override per instance.

// Heading stabilization
pub const HEADING_SMOOTHING_TAU_SEC: f64 = 0.3; // time constant for angular smoothing
pub const HEADING_CONFIDENCE_FLOOR: f64 = 0.05; // below this a sample is degenerate
pub const BASELINE_MIN_CONFIDENCE: f64 = 0.6; // required to capture the session baseline
pub const BASELINE_CAPTURE_DEADLINE_SEC: f64 = 2.0; // give up and default to 0 deg after this

// Placement
pub const PLACEMENT_RECOMPUTE_INTERVAL_SEC: f64 = 0.5; // geodesic recompute throttle
pub const MATERIALIZE_TRIGGER_M: f64 = 18.0; // closer than this, placement materializes
pub const MATERIALIZED_VIEW_DISTANCE_M: f64 = 12.0; // fixed comfortable viewing distance
pub const LOCK_EASE_TAU_SEC: f32 = 0.25; // damped ease toward the frozen point

// Interaction
pub const COLLECTION_RANGE_M: f64 = 25.0; // within this, a hovered target is collectable
pub const PICK_SPHERE_RADIUS_M: f32 = 1.5; // ray-sphere radius for hover/tap hits
pub const MAX_DETECTION_DISTANCE_M: f32 = 80.0; // world hits beyond this are ignored

// Camera
pub const DEFAULT_FOV_Y_RADIANS: f32 = std::f32::consts::FRAC_PI_4;

// Radar distance bands (meters)
pub const BAND_HERE_M: f64 = 25.0;
pub const BAND_NEAR_M: f64 = 100.0;
pub const BAND_FAR_M: f64 = 500.0;
