use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum_extra::extract::CookieJar;

use super::ApiError;
use super::ApiMessageData;
use super::ApiSuccess;
use crate::domain::auth::models::LogoutCommand;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<ApiMessageData>), ApiError> {
    let cancel = state.shutdown.child_token();

    state
        .auth_service
        .logout(
            LogoutCommand::new(user.username, user.session_token),
            &cancel,
        )
        .await?;

    Ok((
        state.cookies.clear(jar),
        ApiSuccess::new(
            StatusCode::OK,
            ApiMessageData {
                message: "Logged out".to_string(),
            },
        ),
    ))
}
