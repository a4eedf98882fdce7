use crate::api::AppState;
use crate::api::middleware::CurrentUser;
use crate::api::schemas::expenses::{ExpenseItem, MonthOverviewResponse, NewExpense};
use crate::api::schemas::months::MonthQuery;
use crate::domain::expense::Expense;
use crate::error::Result;
use crate::services::month_resolver::MonthResolver;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

pub async fn month_overview(
    current: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse> {
    let overview = state.expense_service.month_overview(&current.user, query.month.as_deref()).await?;

    let resolver = *state.expense_service.resolver();
    let items = overview.items.into_iter().map(|e| expense_item(e, &resolver)).collect();

    Ok(Json(MonthOverviewResponse {
        month: overview.month.to_string(),
        title: overview.title,
        total: overview.total,
        budget: overview.budget,
        remaining: overview.remaining,
        items,
    }))
}

pub async fn create_expense(
    current: CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<NewExpense>,
) -> Result<impl IntoResponse> {
    let expense = state
        .expense_service
        .create_expense(current.user.id, &payload.amount, payload.note.as_deref())
        .await?;

    let item = expense_item(expense, state.expense_service.resolver());
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn delete_expense(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.expense_service.delete_expense(current.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn expense_item(expense: Expense, resolver: &MonthResolver) -> ExpenseItem {
    ExpenseItem {
        id: expense.id,
        amount: expense.amount,
        note: expense.note,
        occurred_label: resolver.expense_timestamp(expense.occurred_at),
        occurred_at: expense.occurred_at,
    }
}
