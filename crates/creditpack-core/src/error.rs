//! Error types for creditpack.

use crate::ids::IdError;

/// Result type for creditpack core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while interpreting billing events.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The order's customer has no external id, so it cannot be tied to a user.
    #[error("no external customer id on order {order_id}")]
    MissingIdentity {
        /// The order that could not be attributed.
        order_id: String,
    },

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
