//! Polar webhook payloads.
//!
//! Polar delivers snake_case JSON. The camelCase spellings used by Polar's
//! JavaScript SDK are accepted as aliases so payloads relayed from that SDK
//! decode the same way.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, UserId};

/// Webhook event types this service distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolarEventType {
    /// An order was created (not necessarily paid).
    OrderCreated,
    /// An order was paid. Triggers credit provisioning.
    OrderPaid,
    /// An order was refunded.
    OrderRefunded,
    /// A checkout was created.
    CheckoutCreated,
    /// A checkout was updated.
    CheckoutUpdated,
    /// A customer was created.
    CustomerCreated,
    /// Any other event type.
    Unknown,
}

impl FromStr for PolarEventType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "order.created" => Self::OrderCreated,
            "order.paid" => Self::OrderPaid,
            "order.refunded" => Self::OrderRefunded,
            "checkout.created" => Self::CheckoutCreated,
            "checkout.updated" => Self::CheckoutUpdated,
            "customer.created" => Self::CustomerCreated,
            _ => Self::Unknown,
        })
    }
}

impl PolarEventType {
    /// Wire name of the event type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "order.created",
            Self::OrderPaid => "order.paid",
            Self::OrderRefunded => "order.refunded",
            Self::CheckoutCreated => "checkout.created",
            Self::CheckoutUpdated => "checkout.updated",
            Self::CustomerCreated => "customer.created",
            Self::Unknown => "unknown",
        }
    }
}

/// Generic webhook envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event type, e.g. `order.paid`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// When Polar emitted the event (RFC 3339), if present.
    #[serde(default)]
    pub timestamp: Option<String>,

    /// Event object. Decoded further once the type is known.
    pub data: serde_json::Value,
}

impl WebhookEvent {
    /// Parse an envelope from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a valid envelope.
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// The typed event type.
    #[must_use]
    pub fn typed_event_type(&self) -> PolarEventType {
        self.event_type
            .parse()
            .unwrap_or(PolarEventType::Unknown)
    }

    /// Decode `data` as an order.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is not an order object.
    pub fn as_order(&self) -> serde_json::Result<Order> {
        Order::deserialize(&self.data)
    }
}

/// A Polar order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order ID.
    pub id: String,

    /// Product that was bought.
    #[serde(alias = "productId")]
    pub product_id: String,

    /// The purchasing customer. Absent or `null` means no identity.
    #[serde(default)]
    pub customer: Option<OrderCustomer>,

    /// Order status, e.g. `paid`.
    #[serde(default)]
    pub status: Option<String>,

    /// Total amount in the smallest currency unit.
    #[serde(default, alias = "totalAmount")]
    pub total_amount: Option<i64>,

    /// ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
}

impl Order {
    /// The customer's external id, if one is set.
    ///
    /// Blank values count as missing.
    #[must_use]
    pub fn external_customer_id(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .and_then(|customer| customer.external_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    /// The user this order belongs to.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingIdentity` if the customer carries no external id.
    pub fn user_id(&self) -> crate::Result<UserId> {
        let external_id = self
            .external_customer_id()
            .ok_or_else(|| CoreError::MissingIdentity {
                order_id: self.id.clone(),
            })?;
        Ok(external_id.parse()?)
    }
}

/// The customer attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    /// Polar customer ID.
    #[serde(default)]
    pub id: Option<String>,

    /// The application's user id, as registered with Polar.
    #[serde(default, alias = "externalId")]
    pub external_id: Option<String>,

    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
}
