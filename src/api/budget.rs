use crate::api::AppState;
use crate::api::middleware::CurrentUser;
use crate::api::schemas::budget::{BudgetResponse, BudgetUpdate};
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};

pub async fn get_budget(current: CurrentUser) -> Json<BudgetResponse> {
    Json(BudgetResponse { budget: current.user.current_budget })
}

pub async fn update_budget(
    current: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<impl IntoResponse> {
    let budget = state.account_service.update_budget(current.user.id, &payload.amount).await?;
    Ok(Json(BudgetResponse { budget }))
}
