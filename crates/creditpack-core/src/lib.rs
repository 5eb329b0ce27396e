//! Core types for creditpack.
//!
//! This crate provides the foundational types shared by the store and the service:
//!
//! - **Identifiers**: `UserId`, `ProductId`
//! - **Packs**: `CreditPack`, `ProductCatalog`
//! - **Users**: `User`
//! - **Polar events**: `WebhookEvent`, `PolarEventType`, `Order`, `OrderCustomer`
//!
//! # Credits
//!
//! A credit is a whole, abstract unit of balance. Users buy them in packs of
//! 50, 200 or 400 and spend them elsewhere in the application.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod order;
pub mod pack;
pub mod user;

pub use error::{CoreError, Result};
pub use ids::{IdError, ProductId, UserId};
pub use order::{Order, OrderCustomer, PolarEventType, WebhookEvent};
pub use pack::{
    CreditPack, ProductCatalog, LARGE_PACK_CREDITS, MEDIUM_PACK_CREDITS, SMALL_PACK_CREDITS,
};
pub use user::User;
