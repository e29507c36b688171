use hunt_core::{InteractionState, SelectOutcome, TargetStateMachine};

use InteractionState::*;

fn hovered_machine() -> TargetStateMachine {
    let mut m = TargetStateMachine::new(1);
    m.on_hover_enter();
    m
}

#[test]
fn starts_normal_and_hover_enters() {
    let mut m = TargetStateMachine::new(1);
    assert_eq!(m.state(), Normal);
    m.on_hover_enter();
    assert_eq!(m.state(), Hovering);
    // Re-entering while hovered is defined and harmless.
    m.on_hover_enter();
    assert_eq!(m.state(), Hovering);
}

#[test]
fn range_updates_outside_hover_do_nothing() {
    let mut m = TargetStateMachine::new(1);
    assert_eq!(m.update_range(true, true), None);
    assert_eq!(m.state(), Normal, "must be hovered before ranging in");
}

#[test]
fn eligible_target_in_range_becomes_selectable() {
    let mut m = hovered_machine();
    assert_eq!(m.update_range(true, true), Some(true));
    assert_eq!(m.state(), InRange);

    // Walking back out drops to Hovering and notifies.
    assert_eq!(m.update_range(false, true), Some(false));
    assert_eq!(m.state(), Hovering);
}

#[test]
fn overvalued_target_locks_instead_of_arming() {
    let mut m = hovered_machine();
    assert_eq!(m.update_range(true, false), None);
    assert_eq!(m.state(), TargetingLocked);

    // Ceiling rises (level up mid-hover): lock opens.
    assert_eq!(m.update_range(true, true), Some(true));
    assert_eq!(m.state(), InRange);
}

#[test]
fn ceiling_drop_while_in_range_relocks() {
    let mut m = hovered_machine();
    m.update_range(true, true);
    assert_eq!(m.update_range(true, false), Some(false));
    assert_eq!(m.state(), TargetingLocked);
}

#[test]
fn hover_exit_returns_to_normal_from_any_hovered_state() {
    for (within, eligible, expect_in_range) in
        [(false, true, false), (true, true, true), (true, false, false)]
    {
        let mut m = hovered_machine();
        m.update_range(within, eligible);
        let was_in_range = m.on_hover_exit();
        assert_eq!(m.state(), Normal);
        assert_eq!(was_in_range, expect_in_range);
    }
}

#[test]
fn select_is_gated_on_in_range() {
    let m = TargetStateMachine::new(1);
    assert_eq!(m.select(), SelectOutcome::Ignored);

    let m = hovered_machine();
    assert_eq!(m.select(), SelectOutcome::Ignored);

    let mut m = hovered_machine();
    m.update_range(true, true);
    assert_eq!(m.select(), SelectOutcome::Selected);

    let mut m = hovered_machine();
    m.update_range(true, false);
    assert_eq!(
        m.select(),
        SelectOutcome::Denied,
        "locked target surfaces the denial"
    );
}

#[test]
fn tracking_outage_parks_and_restores_the_state() {
    let mut m = hovered_machine();
    m.update_range(true, true);
    assert_eq!(m.state(), InRange);

    m.set_tracking(false);
    assert_eq!(m.state(), NoTracking);
    assert_eq!(m.select(), SelectOutcome::Ignored, "no selection while blind");
    assert_eq!(m.update_range(true, true), None, "ranging suspended");

    m.set_tracking(true);
    assert_eq!(m.state(), InRange, "outage must not reset the interaction");
}

#[test]
fn tracking_flags_are_idempotent() {
    let mut m = hovered_machine();
    m.set_tracking(false);
    m.set_tracking(false);
    assert_eq!(m.state(), NoTracking);
    m.set_tracking(true);
    m.set_tracking(true);
    assert_eq!(m.state(), Hovering);
}
