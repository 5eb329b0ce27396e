//! Authentication extractor.
//!
//! Sessions are issued by the application's auth layer, not by this service.
//! It hands us an HS256 JWT signed with the shared `AUTH_SECRET` whose `sub`
//! is the user id.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use creditpack_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims this service reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    /// User email, if the auth layer includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiry (Unix seconds).
    pub exp: i64,
}

/// An authenticated user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
    /// Email from the token, if present.
    pub email: Option<String>,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let secret = state.config.auth_secret.as_deref().ok_or_else(|| {
            tracing::error!("AUTH_SECRET not configured - rejecting authenticated request");
            ApiError::Unavailable("authentication is not configured".into())
        })?;

        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let claims = validate_token(token, secret)?;

        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

/// Validate an HS256 token and return its claims.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` for bad signatures, expired tokens or
/// malformed claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        ApiError::Unauthorized
    })
}
