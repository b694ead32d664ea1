use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotswap_core::coordinator::SlotRef;
use slotswap_core::errors::{SlotError, SlotResult};
use slotswap_core::models::event::{Event, Status};
use slotswap_core::models::swap::{EventSnapshot, SwapRequest, SwapRequestResponse, SwapStatus};
use slotswap_core::models::user::User;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

// Statuses are stored as text; a row that fails to parse is corrupt data,
// surfaced as a database error rather than a panic.
fn parse_status(raw: &str) -> SlotResult<Status> {
    raw.parse()
        .map_err(|e: String| SlotError::Database(eyre::eyre!(e)))
}

fn parse_swap_status(raw: &str) -> SlotResult<SwapStatus> {
    raw.parse()
        .map_err(|e: String| SlotError::Database(eyre::eyre!(e)))
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEvent {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbEvent {
    pub fn status(&self) -> SlotResult<Status> {
        parse_status(&self.status)
    }

    /// Projection used by the coordinator rules.
    pub fn slot_ref(&self) -> SlotResult<SlotRef> {
        Ok(SlotRef::new(self.event_id, self.user_id, self.status()?))
    }

    pub fn into_event(self) -> SlotResult<Event> {
        let status = self.status()?;
        Ok(Event {
            event_id: self.event_id,
            user_id: self.user_id,
            title: self.title,
            start_time: self.start_time,
            end_time: self.end_time,
            status,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSwapRequest {
    pub request_id: Uuid,
    pub requestor_id: Uuid,
    pub target_user_id: Uuid,
    pub offered_event_id: Uuid,
    pub target_event_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbSwapRequest {
    pub fn status(&self) -> SlotResult<SwapStatus> {
        parse_swap_status(&self.status)
    }

    pub fn into_swap_request(self) -> SlotResult<SwapRequest> {
        let status = self.status()?;
        Ok(SwapRequest {
            request_id: self.request_id,
            requestor_id: self.requestor_id,
            target_user_id: self.target_user_id,
            offered_event_id: self.offered_event_id,
            target_event_id: self.target_event_id,
            status,
            created_at: self.created_at,
        })
    }
}

/// A swap request joined with both referenced events, as returned by the
/// request-listing queries.
#[derive(Debug, Clone, FromRow)]
pub struct DbSwapRequestDetail {
    pub request_id: Uuid,
    pub requestor_id: Uuid,
    pub target_user_id: Uuid,
    pub offered_event_id: Uuid,
    pub target_event_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub offered_title: String,
    pub offered_start_time: DateTime<Utc>,
    pub offered_end_time: DateTime<Utc>,
    pub target_title: String,
    pub target_start_time: DateTime<Utc>,
    pub target_end_time: DateTime<Utc>,
}

impl DbSwapRequestDetail {
    pub fn into_response(self) -> SlotResult<SwapRequestResponse> {
        let status = parse_swap_status(&self.status)?;
        Ok(SwapRequestResponse {
            request_id: self.request_id,
            requestor_id: self.requestor_id,
            target_user_id: self.target_user_id,
            offered_event: EventSnapshot {
                event_id: self.offered_event_id,
                title: self.offered_title,
                start_time: self.offered_start_time,
                end_time: self.offered_end_time,
            },
            target_event: EventSnapshot {
                event_id: self.target_event_id,
                title: self.target_title,
                start_time: self.target_start_time,
                end_time: self.target_end_time,
            },
            status,
            created_at: self.created_at,
        })
    }
}
