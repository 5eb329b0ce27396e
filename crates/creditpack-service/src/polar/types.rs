//! Polar API types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/checkouts/`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutCreate {
    /// Products offered in the checkout. The first is preselected.
    pub products: Vec<String>,
    /// Our user id; Polar links the resulting customer to it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_customer_id: Option<String>,
    /// Prefilled customer email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Redirect after successful payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
}

/// Polar checkout session object.
#[derive(Debug, Clone, Deserialize)]
pub struct Checkout {
    /// Checkout ID.
    pub id: String,
    /// Hosted checkout URL to redirect the user to.
    pub url: String,
    /// Checkout status (open, confirmed, succeeded, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Selected product.
    #[serde(default)]
    pub product_id: Option<String>,
}

/// Request body for `POST /v1/customers/`.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerCreate {
    /// Customer email. Required by Polar.
    pub email: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Our user id.
    pub external_id: String,
}

/// Polar customer object.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Polar customer ID.
    pub id: String,
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub name: Option<String>,
    /// Our user id, if linked.
    #[serde(default)]
    pub external_id: Option<String>,
}

/// Request body for `POST /v1/customer-sessions/`.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSessionCreate {
    /// Our user id.
    pub external_customer_id: String,
}

/// Polar customer session object.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerSession {
    /// Session ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Pre-authenticated portal URL.
    pub customer_portal_url: String,
    /// Session expiry (RFC 3339).
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Polar API error response.
///
/// `detail` is a string for most errors and a list of field errors for
/// validation failures.
#[derive(Debug, Clone, Deserialize)]
pub struct PolarErrorResponse {
    /// Error type, e.g. `ResourceNotFound`.
    #[serde(default)]
    pub error: Option<String>,
    /// Error detail.
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl PolarErrorResponse {
    /// Human-readable detail.
    #[must_use]
    pub fn detail_message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "no detail".to_string(),
            other => other.to_string(),
        }
    }
}

/// Response for checkout and portal endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct RedirectResponse {
    /// Where to send the user.
    pub url: String,
    /// Always `true`; tells the frontend to navigate.
    pub redirect: bool,
}

impl RedirectResponse {
    /// Redirect to `url`.
    #[must_use]
    pub fn to(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            redirect: true,
        }
    }
}
