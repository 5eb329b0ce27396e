//! Polar webhook handler.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use creditpack_core::{PolarEventType, WebhookEvent};

use crate::crypto::{verify_webhook, SignatureError};
use crate::error::ApiError;
use crate::state::AppState;

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the webhook was processed.
    pub received: bool,
    /// Credits granted, for `order.paid` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_granted: Option<u32>,
}

/// Handle Polar webhooks.
pub async fn polar_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), ApiError> {
    if let Some(secret) = &state.config.polar_webhook_secret {
        verify_polar_signature(&headers, &body, secret).map_err(|e| {
            tracing::warn!(error = %e, "Invalid Polar webhook signature");
            ApiError::InvalidSignature
        })?;
    } else {
        // No webhook_secret configured - skip verification (development mode)
        tracing::warn!("Polar webhook_secret not configured - skipping signature verification");
    }

    let event = WebhookEvent::from_bytes(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(
        event_type = %event.event_type,
        webhook_id = ?header_str(&headers, "webhook-id"),
        "Received Polar webhook"
    );

    let credits_granted = match event.typed_event_type() {
        PolarEventType::OrderPaid => Some(handle_order_paid(&state, &event).await?),
        other => {
            tracing::debug!(event_type = %event.event_type, typed = ?other, "Unhandled Polar event");
            None
        }
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(WebhookResponse {
            received: true,
            credits_granted,
        }),
    ))
}

async fn handle_order_paid(state: &AppState, event: &WebhookEvent) -> Result<u32, ApiError> {
    let order = event
        .as_order()
        .map_err(|e| ApiError::BadRequest(format!("invalid order payload: {e}")))?;

    let grant = state.provisioner.on_order_paid(&order).await.map_err(|e| {
        tracing::error!(order_id = %order.id, error = %e, "Failed to provision credits");
        ApiError::from(e)
    })?;

    Ok(grant.credits)
}

// ============================================================================
// Signature Verification Helpers
// ============================================================================

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Verify the Standard Webhooks headers Polar sends.
fn verify_polar_signature(
    headers: &HeaderMap,
    body: &[u8],
    secret: &str,
) -> Result<(), SignatureError> {
    let msg_id =
        header_str(headers, "webhook-id").ok_or(SignatureError::MissingHeader("webhook-id"))?;
    let timestamp = header_str(headers, "webhook-timestamp")
        .ok_or(SignatureError::MissingHeader("webhook-timestamp"))?;
    let signatures = header_str(headers, "webhook-signature")
        .ok_or(SignatureError::MissingHeader("webhook-signature"))?;

    verify_webhook(
        secret,
        msg_id,
        timestamp,
        signatures,
        body,
        chrono::Utc::now().timestamp(),
    )
}
