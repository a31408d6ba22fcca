// --- File: crates/mentora_booking/src/auth.rs ---
//! Admin login and bearer-token middleware.
//!
//! Credentials are a single fixed admin login held in `ADMIN_USERNAME` /
//! `ADMIN_PASSWORD`; a successful login issues a short-lived HS256 token
//! signed with `JWT_SECRET`. The middleware guards every `/admin` route.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::BookingError;

const ADMIN_ROLE: &str = "admin";

/// Claims carried by the admin bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

fn jwt_secret() -> Result<String, BookingError> {
    std::env::var("JWT_SECRET")
        .map_err(|_| BookingError::Config("JWT_SECRET is not set".to_string()))
}

/// Compare a login attempt against the fixed admin credentials.
///
/// Both comparisons always run so timing reveals nothing about which of
/// the two fields was wrong.
pub fn verify_admin_credentials(username: &str, password: &str) -> Result<(), BookingError> {
    let expected_user = std::env::var("ADMIN_USERNAME")
        .map_err(|_| BookingError::Config("ADMIN_USERNAME is not set".to_string()))?;
    let expected_pass = std::env::var("ADMIN_PASSWORD")
        .map_err(|_| BookingError::Config("ADMIN_PASSWORD is not set".to_string()))?;

    let user_ok = constant_time_eq(username.as_bytes(), expected_user.as_bytes());
    let pass_ok = constant_time_eq(password.as_bytes(), expected_pass.as_bytes());
    if user_ok & pass_ok {
        Ok(())
    } else {
        Err(BookingError::Auth("invalid credentials".to_string()))
    }
}

/// Issue an admin token; returns the token and its lifetime in seconds.
pub fn issue_admin_token(username: &str, ttl_minutes: i64) -> Result<(String, i64), BookingError> {
    let expires_in = ttl_minutes * 60;
    let exp = (Utc::now() + Duration::minutes(ttl_minutes)).timestamp() as usize;
    let claims = AdminClaims {
        sub: username.to_string(),
        role: ADMIN_ROLE.to_string(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret()?.as_bytes()),
    )
    .map_err(|e| BookingError::Internal(format!("failed to sign token: {}", e)))?;
    Ok((token, expires_in))
}

/// Validate a bearer token string into its claims.
pub fn decode_admin_token(token: &str) -> Result<AdminClaims, BookingError> {
    let data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret()?.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| BookingError::Auth("invalid or expired token".to_string()))?;
    if data.claims.role != ADMIN_ROLE {
        return Err(BookingError::Auth("not an admin token".to_string()));
    }
    Ok(data.claims)
}

/// Axum middleware guarding the admin surface.
pub async fn admin_auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = headers
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    match decode_admin_token(token) {
        Ok(_claims) => Ok(next.run(request).await),
        Err(e) => {
            warn!("Rejected admin request: {}", e);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
