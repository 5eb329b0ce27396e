//! Customer registration handler.
//!
//! Called by the application right after sign-up. Registers the user with a
//! zero balance and creates the Polar customer that later orders point back
//! to through its external id. Repeated calls are safe: an existing Polar
//! customer is looked up instead of created again.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use creditpack_core::{User, UserId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::polar::{Customer, CustomerCreate, PolarClient, PolarError};
use crate::state::AppState;

/// Registration request.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterCustomerRequest {
    /// Email; falls back to the token's email claim.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Registration response.
#[derive(Debug, Serialize)]
pub struct RegisterCustomerResponse {
    /// The registered user.
    pub user_id: UserId,
    /// Polar customer ID.
    pub polar_customer_id: String,
    /// Whether the local user record was created by this call.
    pub created: bool,
}

/// Register the current user locally and with Polar.
pub async fn register_customer(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<RegisterCustomerRequest>,
) -> Result<(StatusCode, Json<RegisterCustomerResponse>), ApiError> {
    let email = req
        .email
        .or(user.email)
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("email is required".into()))?;

    let polar = state.polar()?;

    let created = state
        .store
        .insert_user(&User::new(user.user_id.clone(), Some(email.clone())))
        .await?;

    if created {
        tracing::info!(user_id = %user.user_id, "User registered");
    } else {
        tracing::debug!(user_id = %user.user_id, "User already registered");
    }

    let input = CustomerCreate {
        email,
        name: req.name,
        external_id: user.user_id.to_string(),
    };
    let customer = ensure_polar_customer(polar, &input, !created).await?;

    tracing::info!(
        user_id = %user.user_id,
        polar_customer_id = %customer.id,
        "Polar customer linked"
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(RegisterCustomerResponse {
            user_id: user.user_id,
            polar_customer_id: customer.id,
            created,
        }),
    ))
}

/// Find or create the Polar customer for `input.external_id`.
///
/// Existing users are looked up first. A create that Polar rejects as a
/// duplicate falls back to the lookup as well.
async fn ensure_polar_customer(
    polar: &PolarClient,
    input: &CustomerCreate,
    look_up_first: bool,
) -> Result<Customer, PolarError> {
    if look_up_first {
        if let Some(customer) = polar.get_customer_by_external_id(&input.external_id).await? {
            return Ok(customer);
        }
    }

    match polar.create_customer(input).await {
        Err(PolarError::Api { status, .. }) if is_duplicate_rejection(status) => {
            tracing::debug!(
                external_id = %input.external_id,
                status,
                "Polar customer already exists"
            );
            polar
                .get_customer_by_external_id(&input.external_id)
                .await?
                .ok_or_else(|| PolarError::Api {
                    status,
                    error_type: None,
                    message: "customer rejected as duplicate but not found".into(),
                })
        }
        other => other,
    }
}

fn is_duplicate_rejection(status: u16) -> bool {
    matches!(status, 409 | 422)
}
