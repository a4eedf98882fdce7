use crate::domain::session::ActiveSession;
use crate::error::Result;
use crate::storage::records::session::ActiveSessionRecord;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a new session row.
    /// Note: We store the HASH of the bearer token, not the raw token.
    pub async fn create(&self, token_hash: &str, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<()> {
        sqlx::query("INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token_hash)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Looks up a session by token hash, joined with its user. Expiry is
    /// not checked here; the service layer decides what stale means and
    /// deletes accordingly.
    pub async fn find_with_user(&self, token_hash: &str) -> Result<Option<ActiveSession>> {
        let record = sqlx::query_as::<_, ActiveSessionRecord>(
            r#"
            SELECT s.user_id, s.expires_at,
                   u.email, u.name, u.password_hash, u.current_budget, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    /// Deletes every session matching the token. Covers both explicit
    /// sign-out and the lazy removal of an expired row during lookup.
    pub async fn delete_by_token(&self, token_hash: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
