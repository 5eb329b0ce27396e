//! API handlers.

pub mod checkout;
pub mod credits;
pub mod customers;
pub mod health;
pub mod portal;
pub mod webhooks;
