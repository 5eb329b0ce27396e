//! Credit balance handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use creditpack_core::UserId;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// The user.
    pub user_id: UserId,
    /// Current credit balance.
    pub credits: i64,
}

/// Get the current user's credit balance.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let record = state
        .store
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {}", user.user_id)))?;

    Ok(Json(BalanceResponse {
        user_id: record.id,
        credits: record.credits,
    }))
}
