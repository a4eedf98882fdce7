use crate::domain::expense::Expense;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct ExpenseRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl From<ExpenseRecord> for Expense {
    fn from(record: ExpenseRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            amount: record.amount,
            note: record.note,
            occurred_at: record.occurred_at,
        }
    }
}
