use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/users", post(handlers::users::signup))
        .route("/users/login", post(handlers::users::login))
}
