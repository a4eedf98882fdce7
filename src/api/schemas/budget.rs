use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct BudgetUpdate {
    /// Raw user input; validated and parsed into an exact decimal server-side.
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    pub budget: Decimal,
}
