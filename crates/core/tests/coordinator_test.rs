use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use slotswap_core::coordinator::{
    cancel_swap, mark, request_swap, resolve_swap, set_busy, set_swappable, validate_time_range,
    SlotRef,
};
use slotswap_core::errors::SlotError;
use slotswap_core::models::event::Status;
use slotswap_core::models::swap::SwapStatus;
use uuid::Uuid;

fn slot(owner: Uuid, status: Status) -> SlotRef {
    SlotRef::new(Uuid::new_v4(), owner, status)
}

#[test]
fn test_set_swappable_from_busy() {
    let owner = Uuid::new_v4();
    let event = slot(owner, Status::Busy);

    let next = set_swappable(&event, owner).expect("owner may offer a busy event");
    assert_eq!(next, Status::Swappable);
}

#[test]
fn test_set_swappable_requires_ownership() {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let event = slot(owner, Status::Busy);

    let err = set_swappable(&event, stranger).unwrap_err();
    assert!(matches!(err, SlotError::Forbidden(_)));
}

#[rstest]
#[case(Status::Swappable)]
#[case(Status::SwapPending)]
fn test_set_swappable_rejects_non_busy(#[case] status: Status) {
    let owner = Uuid::new_v4();
    let event = slot(owner, status);

    let err = set_swappable(&event, owner).unwrap_err();
    assert!(matches!(err, SlotError::InvalidState(_)));
}

#[test]
fn test_set_busy_from_swappable() {
    let owner = Uuid::new_v4();
    let event = slot(owner, Status::Swappable);

    let next = set_busy(&event, owner).expect("owner may withdraw a swappable event");
    assert_eq!(next, Status::Busy);
}

#[test]
fn test_set_busy_rejects_pending_event() {
    // A pending event is locked under a live swap request and must not be
    // silently withdrawn from under the counterparty.
    let owner = Uuid::new_v4();
    let event = slot(owner, Status::SwapPending);

    let err = set_busy(&event, owner).unwrap_err();
    assert!(matches!(err, SlotError::InvalidState(_)));
}

#[test]
fn test_mark_rejects_direct_swap_pending() {
    let owner = Uuid::new_v4();
    let event = slot(owner, Status::Busy);

    let err = mark(&event, owner, Status::SwapPending).unwrap_err();
    assert!(matches!(err, SlotError::Validation(_)));
}

#[test]
fn test_mark_toggles_both_ways() {
    let owner = Uuid::new_v4();

    let busy = slot(owner, Status::Busy);
    assert_eq!(mark(&busy, owner, Status::Swappable).unwrap(), Status::Swappable);

    let swappable = slot(owner, Status::Swappable);
    assert_eq!(mark(&swappable, owner, Status::Busy).unwrap(), Status::Busy);
}

#[test]
fn test_request_swap_between_swappable_events() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, Status::Swappable);
    let target = slot(a, Status::Swappable);

    request_swap(&offered, &target, b).expect("both events swappable, distinct owners");
}

#[test]
fn test_request_swap_requires_offered_ownership() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, Status::Swappable);
    let target = slot(a, Status::Swappable);

    let err = request_swap(&offered, &target, a).unwrap_err();
    assert!(matches!(err, SlotError::Forbidden(_)));
}

#[test]
fn test_request_swap_rejects_self_swap() {
    let a = Uuid::new_v4();
    let offered = slot(a, Status::Swappable);
    let target = slot(a, Status::Swappable);

    let err = request_swap(&offered, &target, a).unwrap_err();
    assert!(matches!(err, SlotError::SelfSwap(_)));
}

#[rstest]
#[case(Status::Busy, Status::Swappable)]
#[case(Status::SwapPending, Status::Swappable)]
#[case(Status::Swappable, Status::Busy)]
#[case(Status::Swappable, Status::SwapPending)]
fn test_request_swap_requires_both_swappable(
    #[case] offered_status: Status,
    #[case] target_status: Status,
) {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, offered_status);
    let target = slot(a, target_status);

    let err = request_swap(&offered, &target, b).unwrap_err();
    assert!(matches!(err, SlotError::InvalidState(_)));
}

#[test]
fn test_accept_exchanges_ownership_and_parks_events_busy() {
    // User B offered their event against user A's event; A accepts.
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, Status::SwapPending);
    let target = slot(a, Status::SwapPending);

    let resolution = resolve_swap(SwapStatus::SwapPending, &offered, &target, a, true).unwrap();

    assert_eq!(resolution.offered_owner_id, a);
    assert_eq!(resolution.target_owner_id, b);
    assert_eq!(resolution.event_status, Status::Busy);
    assert_eq!(resolution.request_status, SwapStatus::Accepted);
}

#[test]
fn test_reject_restores_swappable_and_keeps_ownership() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, Status::SwapPending);
    let target = slot(a, Status::SwapPending);

    let resolution = resolve_swap(SwapStatus::SwapPending, &offered, &target, a, false).unwrap();

    assert_eq!(resolution.offered_owner_id, b);
    assert_eq!(resolution.target_owner_id, a);
    assert_eq!(resolution.event_status, Status::Swappable);
    assert_eq!(resolution.request_status, SwapStatus::Rejected);
}

#[test]
fn test_resolve_requires_target_ownership() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, Status::SwapPending);
    let target = slot(a, Status::SwapPending);

    // The requestor cannot resolve their own request.
    let err = resolve_swap(SwapStatus::SwapPending, &offered, &target, b, true).unwrap_err();
    assert!(matches!(err, SlotError::Forbidden(_)));
}

#[rstest]
#[case(SwapStatus::Accepted)]
#[case(SwapStatus::Rejected)]
#[case(SwapStatus::Cancelled)]
fn test_resolve_terminal_request_is_invalid_state(#[case] status: SwapStatus) {
    // Idempotence guard: a second resolution must fail, never re-apply the
    // ownership exchange.
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, Status::Busy);
    let target = slot(a, Status::Busy);

    let err = resolve_swap(status, &offered, &target, a, true).unwrap_err();
    assert!(matches!(err, SlotError::InvalidState(_)));
}

#[test]
fn test_resolve_rejects_inconsistent_event_state() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, Status::Swappable);
    let target = slot(a, Status::SwapPending);

    let err = resolve_swap(SwapStatus::SwapPending, &offered, &target, a, true).unwrap_err();
    assert!(matches!(err, SlotError::InvalidState(_)));
}

#[test]
fn test_cancel_releases_both_events() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, Status::SwapPending);
    let target = slot(a, Status::SwapPending);

    let resolution = cancel_swap(SwapStatus::SwapPending, b, &offered, &target, b).unwrap();

    assert_eq!(resolution.offered_owner_id, b);
    assert_eq!(resolution.target_owner_id, a);
    assert_eq!(resolution.event_status, Status::Swappable);
    assert_eq!(resolution.request_status, SwapStatus::Cancelled);
}

#[test]
fn test_cancel_requires_requestor() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, Status::SwapPending);
    let target = slot(a, Status::SwapPending);

    let err = cancel_swap(SwapStatus::SwapPending, b, &offered, &target, a).unwrap_err();
    assert!(matches!(err, SlotError::Forbidden(_)));
}

#[test]
fn test_cancel_terminal_request_is_invalid_state() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let offered = slot(b, Status::Busy);
    let target = slot(a, Status::Busy);

    let err = cancel_swap(SwapStatus::Cancelled, b, &offered, &target, b).unwrap_err();
    assert!(matches!(err, SlotError::InvalidState(_)));
}

#[test]
fn test_full_accept_scenario() {
    // User A creates "Shift 1" (BUSY), marks it SWAPPABLE; user B requests a
    // swap offering their own swappable event; A accepts.
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    let mut e1 = slot(a, Status::Busy);
    e1.status = set_swappable(&e1, a).unwrap();
    let mut e2 = slot(b, Status::Swappable);

    request_swap(&e2, &e1, b).unwrap();
    e1.status = Status::SwapPending;
    e2.status = Status::SwapPending;

    let resolution = resolve_swap(SwapStatus::SwapPending, &e2, &e1, a, true).unwrap();
    e2.owner_id = resolution.offered_owner_id;
    e1.owner_id = resolution.target_owner_id;
    e1.status = resolution.event_status;
    e2.status = resolution.event_status;

    assert_eq!(e1.owner_id, b);
    assert_eq!(e2.owner_id, a);
    assert_eq!(e1.status, Status::Busy);
    assert_eq!(e2.status, Status::Busy);
    assert_eq!(resolution.request_status, SwapStatus::Accepted);
}

#[test]
fn test_full_reject_scenario() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    let e1 = slot(a, Status::SwapPending);
    let e2 = slot(b, Status::SwapPending);

    let resolution = resolve_swap(SwapStatus::SwapPending, &e2, &e1, a, false).unwrap();

    assert_eq!(resolution.offered_owner_id, b);
    assert_eq!(resolution.target_owner_id, a);
    assert_eq!(resolution.event_status, Status::Swappable);
    assert_eq!(resolution.request_status, SwapStatus::Rejected);
}

#[test]
fn test_validate_time_range() {
    let start = Utc::now();
    assert!(validate_time_range(start, start + Duration::hours(8)).is_ok());

    let err = validate_time_range(start, start).unwrap_err();
    assert!(matches!(err, SlotError::Validation(_)));

    let err = validate_time_range(start, start - Duration::minutes(1)).unwrap_err();
    assert!(matches!(err, SlotError::Validation(_)));
}
