//! Storage layer for creditpack.
//!
//! This crate owns the user credit balance. The rest of the service talks to
//! it only through [`UserCreditStore`], whose single mutation is an atomic
//! increment.
//!
//! # Backends
//!
//! - [`PgStore`]: PostgreSQL via `sqlx` (feature `postgres`, on by default).
//!   Increments are a single `UPDATE ... SET credits = credits + $1`.
//! - [`MemoryStore`]: in-process map, for development and tests.
//!
//! # Example
//!
//! ```no_run
//! use creditpack_core::{User, UserId};
//! use creditpack_store::{MemoryStore, UserCreditStore};
//!
//! # async fn example() -> creditpack_store::Result<()> {
//! let store = MemoryStore::new();
//! let user_id: UserId = "u1".parse().unwrap();
//! store.insert_user(&User::new(user_id.clone(), None)).await?;
//!
//! let balance = store.increment_credits(&user_id, 50).await?;
//! assert_eq!(balance, 50);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;

use async_trait::async_trait;
use creditpack_core::{User, UserId};

/// The storage trait for user credit balances.
///
/// Implementations must make [`increment_credits`](Self::increment_credits)
/// atomic: concurrent increments for the same user never lose an update.
#[async_trait]
pub trait UserCreditStore: Send + Sync {
    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// Insert a user unless one with the same ID already exists.
    ///
    /// Returns `true` if the user was inserted. Existing users are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn insert_user(&self, user: &User) -> Result<bool>;

    /// Atomically add `amount` credits to a user's balance.
    ///
    /// Returns the new balance. An `amount` of zero still requires the user to exist.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::Database` if the database operation fails.
    async fn increment_credits(&self, user_id: &UserId, amount: u32) -> Result<i64>;
}
