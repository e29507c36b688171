//! Engine orchestration.
//!
//! Single-threaded, cooperative per-frame tick: the shell feeds pose,
//! sensor, feed, and pointer samples between ticks, then calls
//! [`HuntEngine::tick`] which drives stabilizer -> mapper -> lock ->
//! arbiter -> state machines in order and pushes interaction events
//! into the caller's `Vec`. State updates are pure functions of the
//! previous state and the new samples, so a recorded sample sequence
//! replays deterministically.

use std::time::Duration;

use fnv::FnvHashMap;
use glam::Vec3;
use smallvec::SmallVec;

use crate::config::EngineConfig;
use crate::error::HuntError;
use crate::events::{HuntEvent, PlayerPose, Target, TargetId};
use crate::heading::{HeadingBaseline, HeadingEstimate, HeadingSource, HeadingStabilizer};
use crate::interaction::{InteractionState, SelectOutcome, TargetStateMachine};
use crate::lock::{LockState, PositionLock};
use crate::mapper::{distance_band, DistanceBand, DistanceMode, Placement, PositionMapper};
use crate::picking::{
    HitTestArbiter, OverlayId, OverlayRegion, PointerEvent, PointerPhase, PointerResolution,
    Viewport,
};

/// Per-target view the presentation layer reads after a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetPlacement {
    /// Viewer-relative position after lock damping; what gets rendered.
    pub position: Vec3,
    /// True geodesic distance, for the radar indicator.
    pub true_distance_m: f64,
    pub mode: DistanceMode,
    pub band: DistanceBand,
    pub lock_state: LockState,
}

struct TrackedTarget {
    target: Target,
    mapper: PositionMapper,
    lock: PositionLock,
    machine: TargetStateMachine,
    candidate: Option<Placement>,
}

pub struct HuntEngine {
    config: EngineConfig,
    stabilizer: HeadingStabilizer,
    arbiter: HitTestArbiter,
    targets: FnvHashMap<TargetId, TrackedTarget>,
    /// Registration order; drives iteration and hit-test tie-breaks.
    order: Vec<TargetId>,
    pose: Option<PlayerPose>,
    viewport: Viewport,
    eligibility_ceiling: u32,
    tracking_available: bool,
    tracking_reported: bool,
    last_estimate: Option<HeadingEstimate>,
    pointer_queue: SmallVec<[PointerEvent; 8]>,
    /// Events produced by feed mutations between ticks; drained first.
    queued_events: Vec<HuntEvent>,
}

impl HuntEngine {
    pub fn new(config: EngineConfig, viewport: Viewport) -> Self {
        let stabilizer = HeadingStabilizer::new(&config);
        let arbiter = HitTestArbiter::new(&config);
        Self {
            config,
            stabilizer,
            arbiter,
            targets: FnvHashMap::default(),
            order: Vec::new(),
            pose: None,
            viewport,
            eligibility_ceiling: 0,
            tracking_available: true,
            tracking_reported: true,
            last_estimate: None,
            pointer_queue: SmallVec::new(),
            queued_events: Vec::new(),
        }
    }

    // ---------------- inputs ----------------

    pub fn add_heading_source(&mut self, source: Box<dyn HeadingSource>) {
        self.stabilizer.add_source(source);
    }

    pub fn register_overlay(&mut self, region: OverlayRegion) {
        self.arbiter.register_overlay(region);
    }

    pub fn remove_overlay(&mut self, id: OverlayId) -> bool {
        self.arbiter.remove_overlay(id)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_pose(&mut self, pose: PlayerPose) {
        self.pose = Some(pose);
    }

    pub fn set_eligibility_ceiling(&mut self, ceiling: u32) {
        self.eligibility_ceiling = ceiling;
    }

    pub fn set_tracking_available(&mut self, available: bool) {
        self.tracking_available = available;
    }

    pub fn push_pointer_event(&mut self, event: PointerEvent) {
        self.pointer_queue.push(event);
    }

    /// The feed added or updated a target. A moved target releases its
    /// placement lock and recomputes from live GPS.
    pub fn upsert_target(&mut self, target: Target) {
        match self.targets.get_mut(&target.id) {
            Some(tracked) => {
                if tracked.target.point != target.point {
                    tracked.lock.unlock();
                    tracked.mapper.invalidate();
                }
                tracked.target = target;
            }
            None => {
                self.targets.insert(
                    target.id,
                    TrackedTarget {
                        target,
                        mapper: PositionMapper::new(&self.config),
                        lock: PositionLock::new(self.config.lock_ease_tau_sec),
                        machine: TargetStateMachine::new(target.id),
                        candidate: None,
                    },
                );
                self.order.push(target.id);
            }
        }
    }

    /// The feed removed a target (collected, expired, out of radius).
    /// An in-flight hover on it exits immediately.
    pub fn remove_target(&mut self, id: TargetId) {
        let Some(tracked) = self.targets.remove(&id) else {
            return;
        };
        self.order.retain(|&t| t != id);
        if self.arbiter.notify_removed(id) {
            self.queued_events.push(HuntEvent::HoverExit(id));
            if tracked.machine.state() == InteractionState::InRange {
                self.queued_events.push(HuntEvent::InRangeChanged(id, false));
            }
        }
    }

    /// Recapture the session baseline and release every placement lock.
    pub fn reset_session(&mut self, now_sec: f64) {
        self.stabilizer.reset_session(now_sec);
        for tracked in self.targets.values_mut() {
            tracked.lock.unlock();
            tracked.mapper.invalidate();
        }
    }

    /// Explicit select/collect request (e.g. a collect button). The
    /// resulting event is emitted on the next tick.
    pub fn select(&mut self, id: TargetId) -> Result<SelectOutcome, HuntError> {
        let tracked = self.targets.get(&id).ok_or(HuntError::UnknownTarget(id))?;
        let outcome = tracked.machine.select();
        Self::emit_select(&mut self.queued_events, id, outcome);
        Ok(outcome)
    }

    // ---------------- queries ----------------

    pub fn target_ids(&self) -> &[TargetId] {
        &self.order
    }

    pub fn placement(&self, id: TargetId) -> Option<TargetPlacement> {
        let tracked = self.targets.get(&id)?;
        let candidate = tracked.candidate?;
        Some(TargetPlacement {
            position: tracked.lock.emitted()?,
            true_distance_m: candidate.true_distance_m,
            mode: candidate.mode,
            band: distance_band(candidate.true_distance_m),
            lock_state: tracked.lock.state(),
        })
    }

    pub fn interaction_state(&self, id: TargetId) -> Option<InteractionState> {
        self.targets.get(&id).map(|t| t.machine.state())
    }

    pub fn hovered(&self) -> Option<TargetId> {
        self.arbiter.hovered()
    }

    pub fn heading_estimate(&self) -> Option<HeadingEstimate> {
        self.last_estimate
    }

    pub fn baseline(&self) -> Option<HeadingBaseline> {
        self.stabilizer.baseline()
    }

    // ---------------- tick ----------------

    pub fn tick(&mut self, dt: Duration, now_sec: f64, out_events: &mut Vec<HuntEvent>) {
        let dt_sec = dt.as_secs_f64();
        out_events.append(&mut self.queued_events);

        if self.tracking_available != self.tracking_reported {
            self.tracking_reported = self.tracking_available;
            if self.tracking_available {
                log::info!("tracking restored");
                out_events.push(HuntEvent::TrackingRestored);
            } else {
                log::warn!("tracking lost");
                out_events.push(HuntEvent::TrackingLost);
            }
            for tracked in self.targets.values_mut() {
                tracked.machine.set_tracking(self.tracking_available);
            }
        }

        let estimate = self.stabilizer.tick(dt_sec, now_sec);
        self.last_estimate = Some(estimate);

        self.update_placements(now_sec, dt_sec as f32, estimate.degrees);

        // Candidates in registration order, post-lock positions.
        let candidates: Vec<(TargetId, Vec3)> = self
            .order
            .iter()
            .filter_map(|&id| {
                let tracked = self.targets.get(&id)?;
                Some((id, tracked.lock.emitted()?))
            })
            .collect();

        let overlay_consumed = self.drain_pointer_events(&candidates, out_events);

        // A consumed gesture owns the whole tick: no fresh hover may
        // arrive from underneath the overlay it struck.
        if self.tracking_available && !overlay_consumed {
            let change = self.arbiter.update_hover(self.viewport, &candidates);
            if let Some(id) = change.exited {
                if let Some(tracked) = self.targets.get_mut(&id) {
                    let was_in_range = tracked.machine.on_hover_exit();
                    out_events.push(HuntEvent::HoverExit(id));
                    if was_in_range {
                        out_events.push(HuntEvent::InRangeChanged(id, false));
                    }
                }
            }
            if let Some(id) = change.entered {
                if let Some(tracked) = self.targets.get_mut(&id) {
                    tracked.machine.on_hover_enter();
                    out_events.push(HuntEvent::HoverEnter(id));
                }
            }
        }

        if self.tracking_available {
            self.update_ranges(out_events);
        }
    }

    fn update_placements(&mut self, now_sec: f64, dt_sec: f32, frame_heading_deg: f64) {
        let (Some(pose), Some(_baseline)) = (self.pose, self.stabilizer.baseline()) else {
            // Placement waits for the initialization barrier: a player
            // pose and a captured baseline.
            return;
        };
        for id in &self.order {
            let Some(tracked) = self.targets.get_mut(id) else {
                continue;
            };
            let candidate = tracked.mapper.compute(
                now_sec,
                pose.point,
                tracked.target.point,
                frame_heading_deg,
                tracked.target.height_offset,
            );
            if candidate.mode == DistanceMode::Materialized && !tracked.lock.is_locked() {
                log::debug!(
                    "target {}: materialized at {:.1} m, placement locked",
                    id,
                    candidate.true_distance_m
                );
                tracked.lock.lock_at(candidate.offset);
            }
            tracked.lock.step(candidate.offset, dt_sec);
            tracked.candidate = Some(candidate);
        }
    }

    /// Arbitrate queued pointer events. Returns true when any `Begin`
    /// was consumed by an overlay this tick.
    fn drain_pointer_events(
        &mut self,
        candidates: &[(TargetId, Vec3)],
        out_events: &mut Vec<HuntEvent>,
    ) -> bool {
        let mut overlay_consumed = false;
        let queue = std::mem::take(&mut self.pointer_queue);
        for event in queue {
            if event.phase != PointerPhase::Begin {
                continue;
            }
            match self
                .arbiter
                .resolve_begin(self.viewport, event.position, candidates)
            {
                PointerResolution::Overlay(overlay_id) => {
                    log::debug!("pointer consumed by overlay {}", overlay_id);
                    overlay_consumed = true;
                }
                PointerResolution::WorldTarget(id) => {
                    if let Some(tracked) = self.targets.get(&id) {
                        let outcome = tracked.machine.select();
                        Self::emit_select(out_events, id, outcome);
                    }
                }
                PointerResolution::EmptySpace => {
                    log::debug!("pointer hit empty space");
                }
            }
        }
        overlay_consumed
    }

    fn update_ranges(&mut self, out_events: &mut Vec<HuntEvent>) {
        for id in &self.order {
            let Some(tracked) = self.targets.get_mut(id) else {
                continue;
            };
            let Some(candidate) = tracked.candidate else {
                continue;
            };
            let within = candidate.true_distance_m <= self.config.collection_range_m;
            let eligible = tracked.target.acquisition_value <= self.eligibility_ceiling;
            if let Some(in_range) = tracked.machine.update_range(within, eligible) {
                out_events.push(HuntEvent::InRangeChanged(*id, in_range));
            }
        }
    }

    fn emit_select(out_events: &mut Vec<HuntEvent>, id: TargetId, outcome: SelectOutcome) {
        match outcome {
            SelectOutcome::Selected => {
                log::info!("target {} selected", id);
                out_events.push(HuntEvent::Selected(id));
            }
            SelectOutcome::Denied => {
                log::info!("target {} selection denied (above eligibility ceiling)", id);
                out_events.push(HuntEvent::SelectionDenied(id));
            }
            SelectOutcome::Ignored => {}
        }
    }
}
