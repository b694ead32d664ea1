//! Handler-level tests over the mock repositories, exercising the swap
//! workflow's contract without a live database.

use chrono::{Duration, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use slotswap_core::errors::SlotError;
use slotswap_core::models::swap::SwapStatus;
use slotswap_db::mock::repositories::{MockEventRepo, MockSwapRepo};
use slotswap_db::models::{DbEvent, DbSwapRequest, DbSwapRequestDetail};
use uuid::Uuid;

fn db_event(user_id: Uuid, status: &str) -> DbEvent {
    let now = Utc::now();
    DbEvent {
        event_id: Uuid::new_v4(),
        user_id,
        title: "Shift 1".to_string(),
        start_time: now,
        end_time: now + Duration::hours(8),
        status: status.to_string(),
        created_at: now,
    }
}

fn pending_request(requestor: Uuid, target_user: Uuid) -> DbSwapRequest {
    DbSwapRequest {
        request_id: Uuid::new_v4(),
        requestor_id: requestor,
        target_user_id: target_user,
        offered_event_id: Uuid::new_v4(),
        target_event_id: Uuid::new_v4(),
        status: "SWAP_PENDING".to_string(),
        created_at: Utc::now(),
    }
}

fn request_detail(target_user: Uuid, created_offset_mins: i64) -> DbSwapRequestDetail {
    let now = Utc::now();
    DbSwapRequestDetail {
        request_id: Uuid::new_v4(),
        requestor_id: Uuid::new_v4(),
        target_user_id: target_user,
        offered_event_id: Uuid::new_v4(),
        target_event_id: Uuid::new_v4(),
        status: "SWAP_PENDING".to_string(),
        created_at: now - Duration::minutes(created_offset_mins),
        offered_title: "Offered shift".to_string(),
        offered_start_time: now,
        offered_end_time: now + Duration::hours(4),
        target_title: "Target shift".to_string(),
        target_start_time: now,
        target_end_time: now + Duration::hours(4),
    }
}

#[tokio::test]
async fn test_place_swap_request_returns_pending_request() {
    let requestor = Uuid::new_v4();
    let target_user = Uuid::new_v4();
    let request = pending_request(requestor, target_user);
    let offered = request.offered_event_id;
    let target = request.target_event_id;

    let mut repo = MockSwapRepo::new();
    repo.expect_place_swap_request()
        .with(
            predicate::eq(requestor),
            predicate::eq(offered),
            predicate::eq(target),
        )
        .times(1)
        .return_once(move |_, _, _| Ok(request));

    let placed = repo
        .place_swap_request(requestor, offered, target)
        .await
        .expect("Failed to place swap request");

    assert_eq!(placed.requestor_id, requestor);
    assert_eq!(placed.target_user_id, target_user);
    assert_eq!(placed.status().unwrap(), SwapStatus::SwapPending);
}

#[tokio::test]
async fn test_second_request_against_locked_pair_fails() {
    let requestor = Uuid::new_v4();
    let offered = Uuid::new_v4();
    let target = Uuid::new_v4();

    let mut repo = MockSwapRepo::new();
    repo.expect_place_swap_request().times(1).returning(|_, _, _| {
        Err(SlotError::InvalidState(
            "offered event is SWAP_PENDING, not SWAPPABLE".to_string(),
        ))
    });

    let err = repo
        .place_swap_request(requestor, offered, target)
        .await
        .unwrap_err();
    assert!(matches!(err, SlotError::InvalidState(_)));
}

#[tokio::test]
async fn test_process_request_is_not_idempotent_on_retry() {
    // First resolution accepts; the retry must fail instead of re-applying
    // the ownership exchange.
    let responder = Uuid::new_v4();
    let request_id = Uuid::new_v4();

    let mut seq = mockall::Sequence::new();
    let mut repo = MockSwapRepo::new();
    repo.expect_process_swap_request()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(SwapStatus::Accepted));
    repo.expect_process_swap_request()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| {
            Err(SlotError::InvalidState(
                "swap request is already ACCEPTED".to_string(),
            ))
        });

    let first = repo
        .process_swap_request(responder, request_id, true)
        .await
        .unwrap();
    assert_eq!(first, SwapStatus::Accepted);

    let second = repo
        .process_swap_request(responder, request_id, true)
        .await
        .unwrap_err();
    assert!(matches!(second, SlotError::InvalidState(_)));
}

#[tokio::test]
async fn test_incoming_requests_preserve_newest_first_order() {
    let target_user = Uuid::new_v4();
    let rows = vec![
        request_detail(target_user, 0),
        request_detail(target_user, 10),
        request_detail(target_user, 60),
    ];

    let mut repo = MockSwapRepo::new();
    repo.expect_get_incoming_requests()
        .with(predicate::eq(target_user))
        .times(1)
        .return_once(move |_| Ok(rows));

    let listed = repo.get_incoming_requests(target_user).await.unwrap();
    let responses: Vec<_> = listed
        .into_iter()
        .map(|row| row.into_response().unwrap())
        .collect();

    assert_eq!(responses.len(), 3);
    assert!(responses[0].created_at >= responses[1].created_at);
    assert!(responses[1].created_at >= responses[2].created_at);
    assert_eq!(responses[0].offered_event.title, "Offered shift");
    assert_eq!(responses[0].target_event.title, "Target shift");
}

#[tokio::test]
async fn test_mark_event_surfaces_coordinator_errors() {
    let owner = Uuid::new_v4();
    let event = db_event(owner, "SWAP_PENDING");
    let event_id = event.event_id;

    let mut repo = MockEventRepo::new();
    repo.expect_mark_event()
        .with(
            predicate::eq(event_id),
            predicate::eq(owner),
            predicate::always(),
        )
        .times(1)
        .returning(|_, _, _| {
            Err(SlotError::InvalidState(
                "event cannot be withdrawn while SWAP_PENDING".to_string(),
            ))
        });

    let err = repo
        .mark_event(event_id, owner, slotswap_core::models::event::Status::Busy)
        .await
        .unwrap_err();
    assert!(matches!(err, SlotError::InvalidState(_)));
}

#[tokio::test]
async fn test_swappable_listing_excludes_caller_rows() {
    let caller = Uuid::new_v4();
    let other = Uuid::new_v4();
    let rows = vec![db_event(other, "SWAPPABLE"), db_event(other, "SWAPPABLE")];

    let mut repo = MockEventRepo::new();
    repo.expect_get_swappable_events_excluding()
        .with(predicate::eq(caller))
        .times(1)
        .return_once(move |_| Ok(rows));

    let listed = repo.get_swappable_events_excluding(caller).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|e| e.user_id != caller));
    assert!(listed.iter().all(|e| e.status == "SWAPPABLE"));
}
