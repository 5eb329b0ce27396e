//! Polar integration for checkout, customers and the customer portal.
//!
//! Polar handles:
//! - Customer registration (keyed by our user id as external id)
//! - Credit pack purchases via hosted Checkout
//! - The self-service customer portal
//! - Webhooks for order events (see `handlers::webhooks`)

pub mod client;
pub mod types;

pub use client::PolarClient;
pub use client::PolarError;
pub use types::*;
