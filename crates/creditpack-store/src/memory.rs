//! In-memory storage implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use creditpack_core::{User, UserId};

use crate::error::{Result, StoreError};
use crate::UserCreditStore;

/// Map-backed store. Every mutation runs under one write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no users.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserCreditStore for MemoryStore {
    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<bool> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Ok(false);
        }
        users.insert(user.id.clone(), user.clone());
        Ok(true)
    }

    async fn increment_credits(&self, user_id: &UserId, amount: u32) -> Result<i64> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::user_not_found(user_id.as_str()))?;

        user.credits += i64::from(amount);
        Ok(user.credits)
    }
}
