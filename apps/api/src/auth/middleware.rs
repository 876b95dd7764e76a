use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "talentgate_session";

/// Validates the session cookie against the users service and injects the
/// resolved `AuthUser` as a request extension for downstream handlers.
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE).filter(|c| !c.value().is_empty()) else {
        warn!("session cookie missing, authentication denied");
        return Err(AppError::Unauthorized);
    };

    match state.users.validate_session(cookie.value()).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Ok(None) => {
            warn!("session token invalid, authentication denied");
            Err(AppError::Unauthorized)
        }
        Err(e) => Err(AppError::Auth(e.to_string())),
    }
}
