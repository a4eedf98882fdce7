use crate::api::AppState;
use crate::api::middleware::CurrentUser;
use crate::api::schemas::months::{MonthLinkResponse, MonthQuery};
use crate::domain::month::MonthId;
use crate::error::Result;
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

/// The sidebar index: every month with expenses plus the current month,
/// newest first. A valid `month` query parameter is included even when it
/// holds no expenses yet; an invalid one is ignored.
pub async fn month_index(
    current: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse> {
    let requested = query.month.as_deref().and_then(|raw| raw.parse::<MonthId>().ok());
    let links = state.expense_service.month_index(current.user.id, requested).await?;

    let response: Vec<MonthLinkResponse> = links
        .into_iter()
        .map(|link| MonthLinkResponse { id: link.id.to_string(), label: link.label })
        .collect();

    Ok(Json(response))
}
