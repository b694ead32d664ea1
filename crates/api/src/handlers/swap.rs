use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use slotswap_core::{
    errors::{SlotError, SlotResult},
    models::event::ConfirmationResponse,
    models::swap::{PlaceSwapRequest, ProcessSwapRequest, SwapRequestResponse, SwapStatus},
};

use crate::{
    middleware::{auth::AuthUser, error_handling::AppError},
    ApiState,
};

fn into_responses(
    rows: Vec<slotswap_db::models::DbSwapRequestDetail>,
) -> SlotResult<Vec<SwapRequestResponse>> {
    rows.into_iter().map(|row| row.into_response()).collect()
}

/// GET /events/swap-requests/{user_id}
///
/// Pending requests made against the given user's events, newest first.
#[axum::debug_handler]
pub async fn list_incoming_requests(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<SwapRequestResponse>>, AppError> {
    if user_id != auth.id {
        return Err(AppError(SlotError::Forbidden(
            "cannot list another user's swap requests".to_string(),
        )));
    }

    let rows =
        slotswap_db::repositories::swap::get_incoming_requests(&state.db_pool, user_id).await?;

    Ok(Json(into_responses(rows)?))
}

/// GET /events/outgoing-requests/{user_id}
///
/// Pending requests the given user has placed, newest first.
#[axum::debug_handler]
pub async fn list_outgoing_requests(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<SwapRequestResponse>>, AppError> {
    if user_id != auth.id {
        return Err(AppError(SlotError::Forbidden(
            "cannot list another user's swap requests".to_string(),
        )));
    }

    let rows =
        slotswap_db::repositories::swap::get_outgoing_requests(&state.db_pool, user_id).await?;

    Ok(Json(into_responses(rows)?))
}

/// POST /events/swap-request
///
/// The body carries the two event ids; the requestor is the authenticated
/// user and must own the offered event.
#[axum::debug_handler]
pub async fn place_swap_request(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Json(payload): Json<PlaceSwapRequest>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let request = slotswap_db::repositories::swap::place_swap_request(
        &state.db_pool,
        auth.id,
        payload.offered_event_id,
        payload.target_event_id,
    )
    .await?;

    Ok(Json(ConfirmationResponse {
        message: format!("Swap request {} placed successfully", request.request_id),
    }))
}

/// POST /events/process-request
///
/// Accepts or rejects a pending request; only the target event's owner may
/// respond.
#[axum::debug_handler]
pub async fn process_swap_request(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Json(payload): Json<ProcessSwapRequest>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let status = slotswap_db::repositories::swap::process_swap_request(
        &state.db_pool,
        auth.id,
        payload.swap_request_id,
        payload.acceptance_status,
    )
    .await?;

    let message = match status {
        SwapStatus::Accepted => "Swap request accepted; event ownership exchanged",
        _ => "Swap request rejected; events released",
    };

    Ok(Json(ConfirmationResponse {
        message: message.to_string(),
    }))
}

/// POST /events/cancel-request/{request_id}
///
/// The requestor withdraws a pending request before the target responds.
#[axum::debug_handler]
pub async fn cancel_swap_request(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    slotswap_db::repositories::swap::cancel_swap_request(&state.db_pool, auth.id, request_id)
        .await?;

    Ok(Json(ConfirmationResponse {
        message: "Swap request cancelled".to_string(),
    }))
}
