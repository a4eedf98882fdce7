use crate::domain::expense::Expense;
use crate::error::Result;
use crate::storage::records::expense::ExpenseRecord;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        amount: Decimal,
        note: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> Result<Expense> {
        let record = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            INSERT INTO expenses (user_id, amount, note, occurred_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, amount, note, occurred_at
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(note)
        .bind(occurred_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    /// Expenses owned by the user inside the half-open `[start, end)`
    /// range, newest first.
    pub async fn find_in_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>> {
        let records = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            SELECT id, user_id, amount, note, occurred_at
            FROM expenses
            WHERE user_id = $1 AND occurred_at >= $2 AND occurred_at < $3
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Single conditional delete scoped by both id and owner. A concurrent
    /// duplicate delete simply touches zero rows.
    pub async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Timestamps of every expense the user owns, newest first. The
    /// service buckets these into the distinct months for the sidebar.
    pub async fn list_occurrences(&self, user_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let rows: Vec<(DateTime<Utc>,)> = sqlx::query_as(
            r#"
            SELECT occurred_at
            FROM expenses
            WHERE user_id = $1
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(occurred_at,)| occurred_at).collect())
    }
}
