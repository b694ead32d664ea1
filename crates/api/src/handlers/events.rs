use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use slotswap_core::{
    errors::{SlotError, SlotResult},
    models::event::{
        ConfirmationResponse, CreateEventRequest, Event, MarkEventRequest, UpdateEventRequest,
    },
};

use crate::{
    middleware::{auth::AuthUser, error_handling::AppError},
    ApiState,
};

fn into_events(rows: Vec<slotswap_db::models::DbEvent>) -> SlotResult<Vec<Event>> {
    rows.into_iter().map(|row| row.into_event()).collect()
}

/// GET /events/swappable/{user_id}
///
/// Other users' events currently offered for exchange, excluding the given
/// user's own.
#[axum::debug_handler]
pub async fn list_swappable(
    State(state): State<Arc<ApiState>>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Event>>, AppError> {
    let rows =
        slotswap_db::repositories::event::get_swappable_events_excluding(&state.db_pool, user_id)
            .await?;

    Ok(Json(into_events(rows)?))
}

/// GET /events/user-events/{user_id}
#[axum::debug_handler]
pub async fn get_user_events(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Event>>, AppError> {
    if user_id != auth.id {
        return Err(AppError(SlotError::Forbidden(
            "cannot list another user's events".to_string(),
        )));
    }

    let rows =
        slotswap_db::repositories::event::get_events_by_owner(&state.db_pool, user_id).await?;

    Ok(Json(into_events(rows)?))
}

/// POST /events/create-event
///
/// The owner is the authenticated user; status starts BUSY.
#[axum::debug_handler]
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<Event>, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError(SlotError::Validation(
            "title must not be empty".to_string(),
        )));
    }

    let row = slotswap_db::repositories::event::create_event(
        &state.db_pool,
        auth.id,
        &payload.title,
        payload.start_time,
        payload.end_time,
    )
    .await?;

    Ok(Json(row.into_event()?))
}

/// POST /events/mark-event/{event_id}
///
/// Owner-requested BUSY/SWAPPABLE toggle; the coordinator refuses anything
/// touching a SWAP_PENDING event.
#[axum::debug_handler]
pub async fn mark_event(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<MarkEventRequest>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let updated = slotswap_db::repositories::event::mark_event(
        &state.db_pool,
        event_id,
        auth.id,
        payload.status,
    )
    .await?;

    Ok(Json(ConfirmationResponse {
        message: format!("Event marked {}", updated.status),
    }))
}

/// PUT /events/update-event
///
/// Field edit only; status transitions go through mark-event or the swap
/// workflow.
#[axum::debug_handler]
pub async fn update_event(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            return Err(AppError(SlotError::Validation(
                "title must not be empty".to_string(),
            )));
        }
    }

    let row = slotswap_db::repositories::event::update_event(
        &state.db_pool,
        auth.id,
        payload.event_id,
        payload.title.as_deref(),
        payload.start_time,
        payload.end_time,
    )
    .await?;

    Ok(Json(row.into_event()?))
}
