//! User records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A user as seen by the credit store.
///
/// Only the fields this service reads or writes are modeled. The auth layer
/// owns everything else about a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The user ID (also the Polar customer's external id).
    pub id: UserId,

    /// Email address, if known.
    pub email: Option<String>,

    /// Current credit balance. Never negative.
    pub credits: i64,

    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with zero credits.
    #[must_use]
    pub fn new(id: UserId, email: Option<String>) -> Self {
        Self {
            id,
            email,
            credits: 0,
            created_at: Utc::now(),
        }
    }

    /// Builder-style setter for the starting balance.
    #[must_use]
    pub fn with_credits(mut self, credits: i64) -> Self {
        self.credits = credits;
        self
    }
}
