use crate::api::MgmtState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn livez() -> StatusCode {
    StatusCode::OK
}

pub async fn readyz(State(state): State<MgmtState>) -> Response {
    match state.health_service.check_db().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(reason) => {
            tracing::warn!(reason = %reason, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, reason).into_response()
        }
    }
}
