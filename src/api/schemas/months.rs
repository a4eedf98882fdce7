use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MonthLinkResponse {
    pub id: String,
    pub label: String,
}
