//! Creditpack HTTP API Service.
//!
//! This crate sells credit packs through Polar and credits users when Polar
//! reports an order as paid:
//!
//! - Customer registration with Polar
//! - Checkout for the small, medium and large packs
//! - Customer portal sessions
//! - `order.paid` webhooks turned into atomic credit increments
//!
//! # Authentication
//!
//! User-facing routes take an HS256 bearer JWT issued by the application's
//! auth layer. Webhooks are authenticated by their Standard Webhooks signature.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod polar;
pub mod provisioning;
pub mod routes;
pub mod state;

pub use config::{PolarServer, ServiceConfig};
pub use error::ApiError;
pub use polar::{PolarClient, PolarError};
pub use provisioning::{CreditGrant, CreditProvisioner, ProvisionError};
pub use routes::create_router;
pub use state::AppState;
