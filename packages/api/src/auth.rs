// ABOUTME: Admin login/logout/session endpoints and the admin route gate
// ABOUTME: Session tokens travel in an HTTP-only cookie or the X-Admin-Token header

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use storefront_security::SecurityError;
use tracing::{debug, info};

use crate::error::{ApiJson, ApiResult, AppError};
use crate::response::ApiResponse;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "admin-token";
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionStatus {
    fn signed_in(username: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            authenticated: true,
            username: Some(username),
            expires_at: Some(expires_at),
        }
    }

    fn anonymous() -> Self {
        Self {
            authenticated: false,
            username: None,
            expires_at: None,
        }
    }
}

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
}

/// Token presented by the caller: cookie first, then the header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string());

    from_cookie
        .or_else(|| {
            headers
                .get(ADMIN_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}

fn session_cookie(token: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age.num_seconds().max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn cleared_cookie(secure: bool) -> String {
    session_cookie("", Duration::zero(), secure)
}

fn with_cookie(mut response: Response, cookie: String) -> ApiResult<Response> {
    let value = HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(e.into()))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(response)
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Response> {
    info!("Admin login attempt for '{}'", request.username.trim());

    let session = state
        .auth
        .login(&request.username, &request.password)
        .await?;

    let cookie = session_cookie(
        &session.token,
        session.expires_at - Utc::now(),
        state.secure_cookies,
    );
    let body = ApiResponse::success(SessionStatus::signed_in(
        session.username,
        session.expires_at,
    ));

    with_cookie(Json(body).into_response(), cookie)
}

/// Always succeeds and always clears the cookie
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Some(token) = session_token(&headers) {
        state.auth.logout(&token).await?;
    }

    let body = ApiResponse::success(SessionStatus::anonymous());
    with_cookie(Json(body).into_response(), cleared_cookie(state.secure_cookies))
}

pub async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<SessionStatus>>> {
    let Some(token) = session_token(&headers) else {
        return Ok(Json(ApiResponse::success(SessionStatus::anonymous())));
    };

    let status = match state.auth.authenticate(&token).await {
        Ok(admin) => SessionStatus::signed_in(admin.username, admin.expires_at),
        Err(SecurityError::Unauthorized) => SessionStatus::anonymous(),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ApiResponse::success(status)))
}

/// Gate for `/api/admin/*`. The verified admin is stored in request
/// extensions for handlers that want it.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let admin = state.auth.authenticate(&token).await?;

    debug!(
        path = %request.uri().path(),
        admin = %admin.username,
        "Admin request authorized"
    );

    request.extensions_mut().insert(admin);
    Ok(next.run(request).await)
}
