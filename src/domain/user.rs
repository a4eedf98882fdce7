use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub(crate) password_hash: String,
    pub current_budget: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}
