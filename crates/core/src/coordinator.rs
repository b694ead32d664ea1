//! Slot & Swap Coordinator.
//!
//! Pure transition rules for the event status state machine and the
//! swap-request resolution protocol. The persistence layer loads the affected
//! rows under row locks, applies these functions, and persists the outcome in
//! the same transaction, so every rule here is enforced atomically.
//!
//! Event state machine:
//!
//! ```text
//! BUSY ──set_swappable──> SWAPPABLE ──request_swap──> SWAP_PENDING
//!  ^                          ^                            │
//!  └──────set_busy────────────┘◄────reject / cancel────────┤
//!   ◄──────────────accept (ownership moves)────────────────┘
//! ```
//!
//! Swap requests go `SWAP_PENDING -> {ACCEPTED, REJECTED, CANCELLED}`, all
//! three terminal.

use uuid::Uuid;

use crate::errors::{SlotError, SlotResult};
use crate::models::event::Status;
use crate::models::swap::SwapStatus;

/// The slice of an event the coordinator rules need: identity, owner, status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub event_id: Uuid,
    pub owner_id: Uuid,
    pub status: Status,
}

impl SlotRef {
    pub fn new(event_id: Uuid, owner_id: Uuid, status: Status) -> Self {
        Self {
            event_id,
            owner_id,
            status,
        }
    }
}

/// Outcome of resolving a swap request: the owner and status each event must
/// be persisted with, plus the request's terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapResolution {
    pub offered_owner_id: Uuid,
    pub target_owner_id: Uuid,
    pub event_status: Status,
    pub request_status: SwapStatus,
}

/// Marks an owner's `BUSY` event as `SWAPPABLE`.
pub fn set_swappable(slot: &SlotRef, actor: Uuid) -> SlotResult<Status> {
    if actor != slot.owner_id {
        return Err(SlotError::Forbidden(format!(
            "user {} does not own event {}",
            actor, slot.event_id
        )));
    }
    match slot.status {
        Status::Busy => Ok(Status::Swappable),
        other => Err(SlotError::InvalidState(format!(
            "event {} cannot be offered while {}",
            slot.event_id, other
        ))),
    }
}

/// Withdraws an owner's `SWAPPABLE` event back to `BUSY`.
///
/// A `SWAP_PENDING` event is refused: it is locked under a live swap request
/// and must be released by resolving or cancelling that request.
pub fn set_busy(slot: &SlotRef, actor: Uuid) -> SlotResult<Status> {
    if actor != slot.owner_id {
        return Err(SlotError::Forbidden(format!(
            "user {} does not own event {}",
            actor, slot.event_id
        )));
    }
    match slot.status {
        Status::Swappable => Ok(Status::Busy),
        other => Err(SlotError::InvalidState(format!(
            "event {} cannot be withdrawn while {}",
            slot.event_id, other
        ))),
    }
}

/// Dispatches an owner-requested status toggle.
///
/// Owners may only ask for `BUSY` or `SWAPPABLE`; `SWAP_PENDING` is reserved
/// for the coordinator itself.
pub fn mark(slot: &SlotRef, actor: Uuid, requested: Status) -> SlotResult<Status> {
    match requested {
        Status::Swappable => set_swappable(slot, actor),
        Status::Busy => set_busy(slot, actor),
        Status::SwapPending => Err(SlotError::Validation(
            "SWAP_PENDING cannot be set directly".to_string(),
        )),
    }
}

/// Validates a new swap request between two swappable events.
///
/// On success both events must be persisted as `SWAP_PENDING`, locking them
/// from being offered elsewhere or toggled until resolution.
pub fn request_swap(offered: &SlotRef, target: &SlotRef, requestor: Uuid) -> SlotResult<()> {
    if requestor != offered.owner_id {
        return Err(SlotError::Forbidden(format!(
            "user {} does not own offered event {}",
            requestor, offered.event_id
        )));
    }
    if offered.owner_id == target.owner_id {
        return Err(SlotError::SelfSwap(format!(
            "events {} and {} share an owner",
            offered.event_id, target.event_id
        )));
    }
    if offered.status != Status::Swappable {
        return Err(SlotError::InvalidState(format!(
            "offered event {} is {}, not SWAPPABLE",
            offered.event_id, offered.status
        )));
    }
    if target.status != Status::Swappable {
        return Err(SlotError::InvalidState(format!(
            "target event {} is {}, not SWAPPABLE",
            target.event_id, target.status
        )));
    }
    Ok(())
}

/// Resolves a pending swap request.
///
/// Accepting exchanges ownership of the two events and parks both as `BUSY`;
/// freshly swapped slots are not automatically re-offered. Rejecting leaves
/// ownership alone and returns both events to `SWAPPABLE`.
pub fn resolve_swap(
    request_status: SwapStatus,
    offered: &SlotRef,
    target: &SlotRef,
    responder: Uuid,
    accept: bool,
) -> SlotResult<SwapResolution> {
    if request_status.is_terminal() {
        return Err(SlotError::InvalidState(format!(
            "swap request is already {}",
            request_status
        )));
    }
    if responder != target.owner_id {
        return Err(SlotError::Forbidden(format!(
            "user {} does not own target event {}",
            responder, target.event_id
        )));
    }
    // Both events were locked as SWAP_PENDING when the request was placed;
    // anything else means the stored state is inconsistent with the request.
    for slot in [offered, target] {
        if slot.status != Status::SwapPending {
            return Err(SlotError::InvalidState(format!(
                "event {} is {}, not SWAP_PENDING",
                slot.event_id, slot.status
            )));
        }
    }

    if accept {
        Ok(SwapResolution {
            offered_owner_id: target.owner_id,
            target_owner_id: offered.owner_id,
            event_status: Status::Busy,
            request_status: SwapStatus::Accepted,
        })
    } else {
        Ok(SwapResolution {
            offered_owner_id: offered.owner_id,
            target_owner_id: target.owner_id,
            event_status: Status::Swappable,
            request_status: SwapStatus::Rejected,
        })
    }
}

/// Withdraws a pending swap request on behalf of its requestor.
///
/// Both events return to `SWAPPABLE`, ownership untouched.
pub fn cancel_swap(
    request_status: SwapStatus,
    requestor_id: Uuid,
    offered: &SlotRef,
    target: &SlotRef,
    actor: Uuid,
) -> SlotResult<SwapResolution> {
    if request_status.is_terminal() {
        return Err(SlotError::InvalidState(format!(
            "swap request is already {}",
            request_status
        )));
    }
    if actor != requestor_id {
        return Err(SlotError::Forbidden(format!(
            "user {} did not place this swap request",
            actor
        )));
    }
    Ok(SwapResolution {
        offered_owner_id: offered.owner_id,
        target_owner_id: target.owner_id,
        event_status: Status::Swappable,
        request_status: SwapStatus::Cancelled,
    })
}

/// Validates the time range of a new or edited event.
pub fn validate_time_range(
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
) -> SlotResult<()> {
    if start < end {
        Ok(())
    } else {
        Err(SlotError::Validation(
            "startTime must be before endTime".to_string(),
        ))
    }
}
