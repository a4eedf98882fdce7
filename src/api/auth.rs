use crate::api::AppState;
use crate::api::middleware::{build_clearing_cookie, build_session_cookie, session_token};
use crate::api::schemas::auth::{Registration, SignIn, UserResponse};
use crate::error::Result;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Registration>,
) -> Result<impl IntoResponse> {
    let (user, issued) = state
        .account_service
        .register(&payload.email, &payload.password, payload.name.as_deref())
        .await?;

    let headers = session_headers(&issued.token, &state)?;
    Ok((StatusCode::CREATED, headers, Json(UserResponse::from(user))))
}

pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SignIn>,
) -> Result<impl IntoResponse> {
    let existing = session_token(&headers, &state.config.auth.cookie_name);
    let (user, issued) = state
        .account_service
        .sign_in(&payload.email, &payload.password, existing.as_deref())
        .await?;

    let headers = session_headers(&issued.token, &state)?;
    Ok((StatusCode::OK, headers, Json(UserResponse::from(user))))
}

pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    let token = session_token(&headers, &state.config.auth.cookie_name);
    state.account_service.sign_out(token.as_deref()).await?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        SET_COOKIE,
        cookie_header_value(&build_clearing_cookie(&state.config.auth.cookie_name))?,
    );
    Ok((StatusCode::NO_CONTENT, response_headers))
}

fn session_headers(token: &str, state: &AppState) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie_header_value(&build_session_cookie(token, &state.config.auth))?);
    Ok(headers)
}

fn cookie_header_value(cookie: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(cookie).map_err(|_| crate::error::AppError::Internal)
}
