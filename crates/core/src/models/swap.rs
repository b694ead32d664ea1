use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a swap request.
///
/// `Accepted`, `Rejected` and `Cancelled` are terminal; a resolved request is
/// retained rather than deleted so a repeated resolution attempt can be
/// detected and refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    SwapPending,
    Accepted,
    Rejected,
    Cancelled,
}

impl SwapStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SwapStatus::SwapPending)
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SwapStatus::SwapPending => "SWAP_PENDING",
            SwapStatus::Accepted => "ACCEPTED",
            SwapStatus::Rejected => "REJECTED",
            SwapStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SwapStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SWAP_PENDING" => Ok(SwapStatus::SwapPending),
            "ACCEPTED" => Ok(SwapStatus::Accepted),
            "REJECTED" => Ok(SwapStatus::Rejected),
            "CANCELLED" => Ok(SwapStatus::Cancelled),
            other => Err(format!("unknown swap status: {}", other)),
        }
    }
}

/// One user's offer to exchange their swappable event for another user's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub request_id: Uuid,
    pub requestor_id: Uuid,
    pub target_user_id: Uuid,
    pub offered_event_id: Uuid,
    pub target_event_id: Uuid,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
}

/// Condensed event details embedded in swap-request listings so the
/// notifications view can render without a second round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub event_id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestResponse {
    pub request_id: Uuid,
    pub requestor_id: Uuid,
    pub target_user_id: Uuid,
    pub offered_event: EventSnapshot,
    pub target_event: EventSnapshot,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /events/swap-request`.
///
/// Carries the two event ids, not user ids: the requestor and target users
/// are derived from event ownership on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSwapRequest {
    pub offered_event_id: Uuid,
    pub target_event_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSwapRequest {
    pub swap_request_id: Uuid,
    pub acceptance_status: bool,
}
