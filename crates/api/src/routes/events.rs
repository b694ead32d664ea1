use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/events/swappable/:user_id",
            get(handlers::events::list_swappable),
        )
        .route(
            "/events/user-events/:user_id",
            get(handlers::events::get_user_events),
        )
        .route("/events/create-event", post(handlers::events::create_event))
        .route(
            "/events/mark-event/:event_id",
            post(handlers::events::mark_event),
        )
        .route("/events/update-event", put(handlers::events::update_event))
        .route(
            "/events/swap-requests/:user_id",
            get(handlers::swap::list_incoming_requests),
        )
        .route(
            "/events/outgoing-requests/:user_id",
            get(handlers::swap::list_outgoing_requests),
        )
        .route(
            "/events/swap-request",
            post(handlers::swap::place_swap_request),
        )
        .route(
            "/events/process-request",
            post(handlers::swap::process_swap_request),
        )
        .route(
            "/events/cancel-request/:request_id",
            post(handlers::swap::cancel_swap_request),
        )
}
