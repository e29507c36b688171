//! Per-target interaction state machine.
//!
//! One instance per active target. Combines hover transitions from the
//! arbiter with distance and eligibility into a single state, and gates
//! the select/collect action. Every `(state, event)` pair has a defined
//! next state; a tracking outage parks the machine in `NoTracking` and
//! restores the prior state on recovery instead of resetting it, so an
//! active hover survives a brief sensor dropout.

use crate::events::TargetId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    /// Visible, not under the reticle.
    Normal,
    /// Under the reticle, out of collection range.
    Hovering,
    /// Under the reticle, in range, eligible: selectable.
    InRange,
    /// Under the reticle, in range, but worth more than the caller may
    /// collect: visible, not selectable.
    TargetingLocked,
    /// Orientation/tracking subsystem unavailable.
    NoTracking,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    Denied,
    Ignored,
}

pub struct TargetStateMachine {
    id: TargetId,
    state: InteractionState,
    /// State to resume when tracking comes back.
    resume: InteractionState,
}

impl TargetStateMachine {
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            state: InteractionState::Normal,
            resume: InteractionState::Normal,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn on_hover_enter(&mut self) {
        if self.state == InteractionState::Normal {
            self.set_state(InteractionState::Hovering);
        }
    }

    /// Leave any hovered state. Returns true when the machine was in
    /// `InRange`, so the caller can emit the range-change notification.
    pub fn on_hover_exit(&mut self) -> bool {
        let was_in_range = self.state == InteractionState::InRange;
        match self.state {
            InteractionState::Hovering
            | InteractionState::InRange
            | InteractionState::TargetingLocked => self.set_state(InteractionState::Normal),
            InteractionState::Normal | InteractionState::NoTracking => {}
        }
        was_in_range
    }

    /// Feed the per-tick distance/eligibility sample. Returns
    /// `Some(in_range_now)` when `InRange` membership changed.
    pub fn update_range(&mut self, within_range: bool, eligible: bool) -> Option<bool> {
        match self.state {
            InteractionState::Hovering if within_range && eligible => {
                self.set_state(InteractionState::InRange);
                Some(true)
            }
            InteractionState::Hovering if within_range => {
                self.set_state(InteractionState::TargetingLocked);
                None
            }
            InteractionState::InRange if !within_range => {
                self.set_state(InteractionState::Hovering);
                Some(false)
            }
            InteractionState::InRange if !eligible => {
                // Ceiling dropped mid-hover.
                self.set_state(InteractionState::TargetingLocked);
                Some(false)
            }
            InteractionState::TargetingLocked if !within_range => {
                self.set_state(InteractionState::Hovering);
                None
            }
            InteractionState::TargetingLocked if eligible => {
                self.set_state(InteractionState::InRange);
                Some(true)
            }
            _ => None,
        }
    }

    /// Tracking availability changed. Losing tracking parks the current
    /// state; regaining it resumes exactly where the interaction left
    /// off.
    pub fn set_tracking(&mut self, available: bool) {
        if !available && self.state != InteractionState::NoTracking {
            self.resume = self.state;
            self.set_state(InteractionState::NoTracking);
        } else if available && self.state == InteractionState::NoTracking {
            let resume = self.resume;
            self.set_state(resume);
        }
    }

    /// Attempt to select/collect. Only `InRange` accepts; a locked
    /// target surfaces the denial, anything else is a no-op.
    pub fn select(&self) -> SelectOutcome {
        match self.state {
            InteractionState::InRange => SelectOutcome::Selected,
            InteractionState::TargetingLocked => SelectOutcome::Denied,
            InteractionState::Normal
            | InteractionState::Hovering
            | InteractionState::NoTracking => SelectOutcome::Ignored,
        }
    }

    fn set_state(&mut self, next: InteractionState) {
        if next != self.state {
            log::debug!("target {}: {:?} -> {:?}", self.id, self.state, next);
            self.state = next;
        }
    }
}
