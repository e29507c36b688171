//! Offline replay harness: walks a simulated player toward a pair of
//! cached targets with noisy GPS and compass samples, drives the
//! targeting engine at a fixed tick, and logs every interaction event.
//! Deterministic for a given seed, so it doubles as a manual smoke
//! test for the whole pipeline.

use std::time::Duration;

use anyhow::Result;
use hunt_core::{
    EngineConfig, GeoPoint, HeadingSample, HuntEngine, HuntEvent, InteractionState, PlayerPose,
    PointerEvent, PointerPhase, SharedHeadingSlot, Target, Viewport,
};
use rand::prelude::*;

const TICK: Duration = Duration::from_millis(50);
const WALK_SPEED_MPS: f64 = 1.4;
const SIM_SECONDS: f64 = 180.0;

// Meters per degree of latitude on the spherical model.
const M_PER_DEG_LAT: f64 = 111_194.93;

fn offset_point(origin: GeoPoint, north_m: f64, east_m: f64) -> Result<GeoPoint> {
    let lat = origin.latitude + north_m / M_PER_DEG_LAT;
    let lon = origin.longitude + east_m / (M_PER_DEG_LAT * origin.latitude.to_radians().cos());
    GeoPoint::new(lat, lon).map_err(Into::into)
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let start = GeoPoint::new(51.5074, -0.1278)?;
    let viewport = Viewport::new(1080.0, 1920.0);
    let mut engine = HuntEngine::new(EngineConfig::default(), viewport);

    // Fallback chain: absolute compass first, last camera facing as
    // the terminal fallback.
    let compass = SharedHeadingSlot::new("absolute-compass");
    let camera_facing = SharedHeadingSlot::new("camera-facing");
    engine.add_heading_source(Box::new(compass.clone()));
    engine.add_heading_source(Box::new(camera_facing.clone()));

    // Two cached targets: one collectable straight ahead, one too
    // valuable for the current ceiling off to the east.
    engine.set_eligibility_ceiling(10);
    engine.upsert_target(Target {
        id: 1,
        point: offset_point(start, 140.0, 0.0)?,
        acquisition_value: 5,
        height_offset: 0.0,
    });
    engine.upsert_target(Target {
        id: 2,
        point: offset_point(start, 60.0, 220.0)?,
        acquisition_value: 50,
        height_offset: 1.0,
    });

    let mut rng = StdRng::seed_from_u64(42);
    let mut events: Vec<HuntEvent> = Vec::new();
    let mut now_sec = 0.0_f64;
    let mut walked_m = 0.0_f64;
    let mut tapped = false;
    let mut collected = false;

    log::info!("replay start: walking north at {WALK_SPEED_MPS} m/s");

    while now_sec < SIM_SECONDS && !collected {
        now_sec += TICK.as_secs_f64();
        walked_m += WALK_SPEED_MPS * TICK.as_secs_f64();

        // Noisy GPS fix around the true path.
        let jitter_n = rng.gen_range(-2.0..2.0);
        let jitter_e = rng.gen_range(-2.0..2.0);
        engine.set_pose(PlayerPose {
            point: offset_point(start, walked_m + jitter_n, jitter_e)?,
        });

        // Noisy compass, facing the walk direction (north).
        compass.publish(HeadingSample {
            degrees: rng.gen_range(-6.0..6.0),
            confidence: 0.9,
        });

        // Tap the reticle once the lead target becomes collectable.
        if !tapped && engine.interaction_state(1) == Some(InteractionState::InRange) {
            engine.push_pointer_event(PointerEvent {
                position: viewport.reticle(),
                phase: PointerPhase::Begin,
            });
            tapped = true;
        }

        events.clear();
        engine.tick(TICK, now_sec, &mut events);
        for event in &events {
            log::info!("t={now_sec:6.1}s  {event:?}");
            if let HuntEvent::Selected(id) = event {
                // The feed owns target lifetime: collection removes it.
                engine.remove_target(*id);
                collected = true;
            }
        }
    }

    if let Some(placement) = engine.placement(2) {
        log::info!(
            "remaining target 2: {:.0} m away ({:?}, {:?})",
            placement.true_distance_m,
            placement.band,
            placement.lock_state,
        );
    }
    log::info!(
        "replay done: walked {:.0} m in {:.0} sim-seconds, collected = {}",
        walked_m,
        now_sec,
        collected
    );
    Ok(())
}
