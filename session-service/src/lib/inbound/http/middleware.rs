use std::fmt;

use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use super::cookies::value_of;
use super::cookies::CSRF_HEADER;
use super::cookies::SESSION_COOKIE;
use super::cookies::USERNAME_COOKIE;
use super::handlers::ApiError;
use super::handlers::INVALID_SESSION;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthorizeCommand;
use crate::inbound::http::router::AppState;

/// Extension type carrying the caller whose session was just authorized
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub username: String,
    pub session_token: String,
}

impl fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Middleware that authorizes the session cookies against the CSRF header
/// and adds the caller to request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());
    let username = value_of(&jar, USERNAME_COOKIE);
    let session_token = value_of(&jar, SESSION_COOKIE);
    let csrf_token = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let cancel = state.shutdown.child_token();
    state
        .auth_service
        .authorize(
            AuthorizeCommand::new(username.clone(), session_token.clone(), csrf_token),
            &cancel,
        )
        .await
        .map_err(|e| match e {
            AuthError::Validation(_) | AuthError::NotFound(_) | AuthError::Unauthorized => {
                tracing::debug!(username = %username, error = %e, "Session rejected");
                ApiError::Unauthorized(INVALID_SESSION.to_string())
            }
            _ => ApiError::from(e),
        })?;

    req.extensions_mut().insert(AuthenticatedUser {
        username: username.trim().to_string(),
        session_token,
    });

    Ok(next.run(req).await)
}
