use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Describe the caller behind an authorized session.
pub async fn current_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let cancel = state.shutdown.child_token();

    let user = state
        .auth_service
        .get_user(&user.username, &cancel)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData {
            username: user.username.to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub username: String,
}
