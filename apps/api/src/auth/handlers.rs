use axum::{
    extract::{Path, State},
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};
use time::Duration;
use tracing::warn;

use crate::auth::middleware::SESSION_COOKIE;
use crate::errors::AppError;
use crate::models::user::AuthUser;
use crate::state::AppState;

const SESSION_MAX_AGE: Duration = Duration::days(60);

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub code: String,
}

/// GET /api/oauth/:provider/redirect_url
pub async fn get_oauth_redirect_url(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Json<Value>, AppError> {
    let redirect_url = state
        .users
        .oauth_redirect_url(&provider)
        .await
        .map_err(|e| AppError::Auth(e.to_string()))?;

    Ok(Json(json!({ "redirectUrl": redirect_url })))
}

/// POST /api/sessions
///
/// Exchanges an OAuth authorization code for a session token and sets the
/// session cookie.
pub async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if request.code.trim().is_empty() {
        return Err(AppError::Validation(
            "No authorization code provided".to_string(),
        ));
    }

    let token = state
        .users
        .exchange_code(&request.code)
        .await
        .map_err(|e| AppError::Auth(e.to_string()))?;

    let jar = jar.add(session_cookie(token, SESSION_MAX_AGE));
    Ok((jar, Json(json!({ "success": true }))))
}

/// GET /api/users/me
pub async fn get_current_user(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}

/// GET /api/logout
///
/// Best-effort deletion of the session upstream; always clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE).filter(|c| !c.value().is_empty()) {
        if let Err(e) = state.users.delete_session(cookie.value()).await {
            warn!("session deletion failed: {e}");
        }
    }

    let jar = jar.add(session_cookie(String::new(), Duration::ZERO));
    Ok((jar, Json(json!({ "success": true }))))
}

fn session_cookie(token: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::None)
        .secure(true)
        .max_age(max_age)
        .build()
}
