//! # Authentication Module
//!
//! Password hashing and bearer-token handling for the SlotSwap API.
//!
//! Passwords are hashed with Argon2 before storage. Logins are exchanged for
//! an HS256 JWT whose subject is the user id; every `/events/*` handler
//! receives the authenticated user through the [`AuthUser`] extractor and
//! uses it as the acting party, never a client-supplied id.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use slotswap_core::errors::{SlotError, SlotResult};

use crate::{middleware::error_handling::AppError, ApiState};

/// Token lifetime. Expired tokens are rejected by the extractor.
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims embedded in access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user id
    pub sub: String,
    /// User email
    pub email: String,
    /// Expiry (unix timestamp)
    pub exp: i64,
    /// Issued at (unix timestamp)
    pub iat: i64,
}

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated per password; the result is a PHC string
/// carrying algorithm, parameters, salt, and hash.
pub fn hash_password(password: &str) -> SlotResult<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    // Create default Argon2 instance
    let argon2 = Argon2::default();

    // Hash the password with salt
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SlotError::Internal(format!("Error hashing password: {}", e).into()))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a password against a stored Argon2 hash
pub fn verify_password(password: &str, hash: &str) -> SlotResult<bool> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| SlotError::Internal(format!("Invalid password hash: {}", e).into()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Issues a signed bearer token for the given user
pub fn issue_token(secret: &str, user_id: Uuid, email: &str) -> SlotResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| SlotError::Internal(format!("Error signing token: {}", e).into()))
}

/// Decodes and validates a bearer token, returning its claims
pub fn decode_token(secret: &str, token: &str) -> SlotResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(jsonwebtoken::Algorithm::HS256),
    )
    .map_err(|e| SlotError::Unauthenticated(format!("Invalid token: {}", e)))?;

    Ok(data.claims)
}

/// The authenticated user extracted from the Authorization header
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError(SlotError::Unauthenticated(
                    "Missing Authorization header".to_string(),
                ))
            })?;

        let token = header_value.strip_prefix("Bearer ").ok_or_else(|| {
            AppError(SlotError::Unauthenticated(
                "Authorization header must be a bearer token".to_string(),
            ))
        })?;

        let claims = decode_token(&state.jwt_secret, token)?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AppError(SlotError::Unauthenticated(
                "Token subject is not a valid user id".to_string(),
            ))
        })?;

        Ok(AuthUser {
            id,
            email: claims.email,
        })
    }
}
