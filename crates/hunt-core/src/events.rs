//! Feed-facing data types and the interaction events this engine emits.
//!
//! The target feed is authoritative: it owns target identity and
//! lifetime, the engine only holds derived transient state. Events are
//! pushed into the caller's `Vec` each tick (collection/economy and
//! presentation collaborators drain it), which keeps replay from a
//! recorded sample sequence fully deterministic.

use crate::geo::GeoPoint;

pub type TargetId = u64;

/// A point of interest reported by the external feed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub point: GeoPoint,
    /// Worth of the target; compared against the caller's eligibility
    /// ceiling to decide whether it is selectable.
    pub acquisition_value: u32,
    /// Vertical placement offset in meters (e.g. a chest on a ledge).
    pub height_offset: f32,
}

/// The current player sample, updated every tick from the external
/// location service. No identity beyond "current".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPose {
    pub point: GeoPoint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HuntEvent {
    HoverEnter(TargetId),
    HoverExit(TargetId),
    InRangeChanged(TargetId, bool),
    Selected(TargetId),
    SelectionDenied(TargetId),
    TrackingLost,
    TrackingRestored,
}
