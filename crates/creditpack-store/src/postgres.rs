//! PostgreSQL storage implementation.
//!
//! Users live in the `"user"` table shared with the auth layer. This store
//! only reads `id`, `email`, `credits` and `created_at`, and only ever
//! writes `credits` (plus whole rows for users it registers itself).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use creditpack_core::{User, UserId};

use crate::error::{Result, StoreError};
use crate::UserCreditStore;

/// Default maximum number of pooled connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL-backed storage implementation.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database at `database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    fn user_from_row(row: &PgRow) -> Result<User> {
        let id: String = row.try_get("id")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        Ok(User {
            id: id
                .parse()
                .map_err(|e| StoreError::Corrupt(format!("user id {id:?}: {e}")))?,
            email: row.try_get("email")?,
            credits: row.try_get("credits")?,
            created_at,
        })
    }
}

#[async_trait]
impl UserCreditStore for PgStore {
    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query(r#"SELECT id, email, credits, created_at FROM "user" WHERE id = $1"#)
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::user_from_row).transpose()
    }

    async fn insert_user(&self, user: &User) -> Result<bool> {
        let result = sqlx::query(
            r#"INSERT INTO "user" (id, email, credits, created_at)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (id) DO NOTHING"#,
        )
        .bind(user.id.as_str())
        .bind(user.email.as_deref())
        .bind(user.credits)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn increment_credits(&self, user_id: &UserId, amount: u32) -> Result<i64> {
        let balance: Option<i64> = sqlx::query_scalar(
            r#"UPDATE "user" SET credits = credits + $1 WHERE id = $2 RETURNING credits"#,
        )
        .bind(i64::from(amount))
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        balance.ok_or_else(|| StoreError::user_not_found(user_id.as_str()))
    }
}
