//! Placement lock.
//!
//! Once a target materializes, its visual position freezes instead of
//! chasing every GPS/heading wobble. The emitted position only eases
//! toward its goal with a tau-damped step, so lock and unlock both
//! happen without a visible teleport.

use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Locked,
}

pub struct PositionLock {
    ease_tau_sec: f32,
    state: LockState,
    emitted: Option<Vec3>,
    frozen: Vec3,
}

// Within this squared distance of the goal the emitted position snaps,
// so a settled lock is bit-for-bit immune to candidate noise.
const SNAP_EPSILON_SQ: f32 = 1e-6;

impl PositionLock {
    pub fn new(ease_tau_sec: f32) -> Self {
        Self {
            ease_tau_sec,
            state: LockState::Unlocked,
            emitted: None,
            frozen: Vec3::ZERO,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    /// Last emitted position, if any step has run.
    pub fn emitted(&self) -> Option<Vec3> {
        self.emitted
    }

    /// Freeze placement at `point`. No-op when already locked.
    pub fn lock_at(&mut self, point: Vec3) {
        if self.state == LockState::Unlocked {
            self.state = LockState::Locked;
            self.frozen = point;
        }
    }

    /// Resume live tracking. The next steps ease from the frozen
    /// position toward the candidate.
    pub fn unlock(&mut self) {
        self.state = LockState::Unlocked;
    }

    /// Advance one tick toward the goal position and return what the
    /// presentation layer should show. While locked the candidate is
    /// ignored entirely.
    pub fn step(&mut self, candidate: Vec3, dt_sec: f32) -> Vec3 {
        let goal = match self.state {
            LockState::Locked => self.frozen,
            LockState::Unlocked => candidate,
        };
        let next = match self.emitted {
            None => goal,
            Some(current) => {
                if current.distance_squared(goal) <= SNAP_EPSILON_SQ {
                    goal
                } else {
                    let alpha = 1.0 - (-dt_sec / self.ease_tau_sec).exp();
                    current + (goal - current) * alpha
                }
            }
        };
        self.emitted = Some(next);
        next
    }
}
