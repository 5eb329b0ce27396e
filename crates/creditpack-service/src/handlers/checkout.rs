//! Checkout handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use creditpack_core::CreditPack;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::polar::{CheckoutCreate, RedirectResponse};
use crate::state::AppState;

/// Checkout request. Either field selects the pack; `slug` wins if both are set.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    /// Pack slug: `small`, `medium` or `large`.
    #[serde(default)]
    pub slug: Option<String>,
    /// Polar product id of one of the configured packs.
    #[serde(default)]
    pub product_id: Option<String>,
}

/// Start a Polar checkout for a credit pack.
pub async fn create_checkout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<RedirectResponse>, ApiError> {
    let catalog = state.provisioner.catalog();

    let pack = match (req.slug.as_deref(), req.product_id.as_deref()) {
        (Some(slug), _) => CreditPack::from_slug(slug)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown pack slug: {slug}")))?,
        (None, Some(product_id)) => match catalog.resolve(product_id) {
            CreditPack::Unknown => {
                return Err(ApiError::BadRequest(format!(
                    "Unknown product: {product_id}"
                )))
            }
            pack => pack,
        },
        (None, None) => {
            return Err(ApiError::BadRequest(
                "Either slug or product_id is required".into(),
            ))
        }
    };

    let product_id = catalog.product_id(pack).ok_or_else(|| {
        ApiError::BadRequest(format!("Pack {pack:?} is not available for purchase"))
    })?;

    let polar = state.polar()?;

    tracing::info!(
        user_id = %user.user_id,
        pack = ?pack,
        product_id = %product_id,
        "Creating checkout"
    );

    let checkout = polar
        .create_checkout(&CheckoutCreate {
            products: vec![product_id.to_string()],
            external_customer_id: Some(user.user_id.to_string()),
            customer_email: user.email,
            success_url: Some(state.config.checkout_success_url()),
        })
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        checkout_id = %checkout.id,
        "Checkout created"
    );

    Ok(Json(RedirectResponse::to(checkout.url)))
}
