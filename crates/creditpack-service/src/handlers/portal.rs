//! Customer portal handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::polar::RedirectResponse;
use crate::state::AppState;

/// Open a Polar customer portal session for the current user.
pub async fn customer_portal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<RedirectResponse>, ApiError> {
    let session = state
        .polar()?
        .create_customer_session(user.user_id.as_str())
        .await?;

    tracing::debug!(user_id = %user.user_id, "Customer portal session created");

    Ok(Json(RedirectResponse::to(session.customer_portal_url)))
}
