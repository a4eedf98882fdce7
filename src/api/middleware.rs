use crate::api::AppState;
use crate::config::AuthConfig;
use crate::domain::user::User;
use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderValue, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// The authenticated user for the current request, inserted by
/// [`require_session`] and pulled out by handlers as an extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or(AppError::AuthError)
    }
}

/// Validates the session cookie and attaches the owning user to the
/// request. When the cookie references a session that is gone or expired,
/// the 401 response also clears the cookie so the browser self-heals
/// instead of replaying a dead token on every request.
pub async fn require_session(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(token) = session_token(request.headers(), &state.config.auth.cookie_name) else {
        return AppError::AuthError.into_response();
    };

    match state.session_service.get_session(&token).await {
        Ok(Some(active)) => {
            request.extensions_mut().insert(CurrentUser { user: active.user });
            next.run(request).await
        }
        Ok(None) => {
            let mut response = AppError::AuthError.into_response();
            if let Ok(value) = HeaderValue::from_str(&build_clearing_cookie(&state.config.auth.cookie_name)) {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            response
        }
        Err(e) => e.into_response(),
    }
}

/// Reads the session token out of the Cookie header, if present.
#[must_use]
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    let prefix = format!("{cookie_name}=");
    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&prefix) {
            return Some(value.to_string());
        }
    }

    None
}

/// Builds the Set-Cookie value arming the session cookie: `HttpOnly`,
/// `SameSite=Lax`, whole-application path, expiry matching the stored
/// session, `Secure` when configured for production.
#[must_use]
pub fn build_session_cookie(token: &str, config: &AuthConfig) -> String {
    let max_age = config.session_ttl_days * 24 * 60 * 60;
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={token}; Path=/; Max-Age={max_age}; SameSite=Lax; HttpOnly{secure}",
        config.cookie_name
    )
}

/// Builds the Set-Cookie value that removes the session cookie.
#[must_use]
pub fn build_clearing_cookie(cookie_name: &str) -> String {
    format!("{cookie_name}=; Path=/; Max-Age=0; SameSite=Lax; HttpOnly")
}

/// Request-id source for `SetRequestIdLayer`: a fresh UUID whenever the
/// inbound request did not already carry one.
#[derive(Clone, Copy, Debug)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_config(secure: bool) -> AuthConfig {
        AuthConfig {
            session_ttl_days: 90,
            cookie_name: "budget_session".to_string(),
            cookie_secure: secure,
        }
    }

    #[test]
    fn session_cookie_carries_required_flags() {
        let cookie = build_session_cookie("tok123", &auth_config(false));
        assert!(cookie.starts_with("budget_session=tok123; "));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=7776000"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));

        let secure_cookie = build_session_cookie("tok123", &auth_config(true));
        assert!(secure_cookie.ends_with("; Secure"));
    }

    #[test]
    fn clearing_cookie_expires_immediately() {
        let cookie = build_clearing_cookie("budget_session");
        assert!(cookie.starts_with("budget_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn session_token_parses_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; budget_session=abc123; other=1"),
        );
        assert_eq!(session_token(&headers, "budget_session"), Some("abc123".to_string()));
        assert_eq!(session_token(&headers, "missing"), None);
        assert_eq!(session_token(&HeaderMap::new(), "budget_session"), None);
    }
}
