use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::LoginCommand;
use crate::inbound::http::router::AppState;

/// Log in and hand the session back as cookies.
///
/// The CSRF token is also returned in the body; protected routes expect it in
/// the `X-CSRF-Token` header.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequestBody>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let cancel = state.shutdown.child_token();

    let result = state
        .auth_service
        .login(LoginCommand::new(body.username, body.password), &cancel)
        .await?;

    let jar = state.cookies.issue(jar, &result);

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                username: result.username.to_string(),
                csrf_token: result.csrf_token,
                expires_at: result.expires_at,
            },
        ),
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub username: String,
    pub csrf_token: String,
    pub expires_at: DateTime<Utc>,
}
