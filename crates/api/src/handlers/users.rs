use axum::{extract::State, Json};
use std::sync::Arc;

use slotswap_core::{
    errors::SlotError,
    models::user::{LoginRequest, LoginResponse, SignupRequest, User},
};

use crate::{
    middleware::{auth, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn signup(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<User>, AppError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError(SlotError::Validation(
            "name and email must not be empty".to_string(),
        )));
    }
    if payload.password.is_empty() {
        return Err(AppError(SlotError::Validation(
            "password must not be empty".to_string(),
        )));
    }

    let password_hash = auth::hash_password(&payload.password)?;

    let db_user = slotswap_db::repositories::user::create_user(
        &state.db_pool,
        &payload.name,
        &payload.email,
        &password_hash,
    )
    .await?;

    Ok(Json(db_user.into()))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let db_user = slotswap_db::repositories::user::get_user_by_email(&state.db_pool, &payload.email)
        .await?
        .ok_or_else(|| SlotError::Unauthenticated("Invalid credentials".to_string()))?;

    // Same error for unknown email and wrong password
    if !auth::verify_password(&payload.password, &db_user.password_hash)? {
        return Err(AppError(SlotError::Unauthenticated(
            "Invalid credentials".to_string(),
        )));
    }

    let token = auth::issue_token(&state.jwt_secret, db_user.id, &db_user.email)?;

    Ok(Json(LoginResponse {
        token,
        id: db_user.id,
        email: db_user.email,
        name: db_user.name,
    }))
}
