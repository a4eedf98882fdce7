use crate::domain::user::User;
use crate::error::Result;
use crate::storage::records::user::UserRecord;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, email: &str, name: Option<&str>, password_hash: &str) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, current_budget, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, name, password_hash, current_budget, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    /// Replaces the user's monthly budget. Returns the number of rows
    /// touched; zero means the user no longer exists.
    pub async fn update_budget(&self, user_id: Uuid, budget: Decimal) -> Result<u64> {
        let result = sqlx::query("UPDATE users SET current_budget = $2 WHERE id = $1")
            .bind(user_id)
            .bind(budget)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
