use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct NewExpense {
    /// Raw user input; validated and parsed into an exact decimal server-side.
    pub amount: String,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    pub id: Uuid,
    pub amount: Decimal,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    /// Short display-timezone label, e.g. "Feb 3, 1:05 PM".
    pub occurred_label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOverviewResponse {
    pub month: String,
    pub title: String,
    pub total: Decimal,
    pub budget: Decimal,
    pub remaining: Decimal,
    pub items: Vec<ExpenseItem>,
}
