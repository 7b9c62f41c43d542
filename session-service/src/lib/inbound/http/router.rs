use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::CookieSettings;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::register::register;
use super::handlers::session::current_session;
use super::middleware::require_session;
use crate::domain::auth::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub cookies: CookieSettings,
    /// Parent of every per-request cancellation token
    pub shutdown: CancellationToken,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    cookies: CookieSettings,
    shutdown: CancellationToken,
) -> Router {
    let state = AppState {
        auth_service,
        cookies,
        shutdown,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/api/auth/session", get(current_session))
        .route("/api/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    // Headers are left out of the span: they carry session cookies
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use auth::Authenticator;
    use axum::http::header;
    use axum::http::StatusCode;
    use serde_json::json;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::auth::models::SessionSettings;
    use crate::domain::auth::service::AuthService;
    use crate::inbound::http::cookies::CSRF_HEADER;
    use crate::stores::InMemoryDocumentStore;

    fn router() -> Router {
        let service = AuthService::new(
            Arc::new(InMemoryDocumentStore::new()),
            Authenticator::new(),
            SessionSettings::default(),
        );
        create_router(
            Arc::new(service),
            CookieSettings::new(false),
            CancellationToken::new(),
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `Cookie` header echoing every `Set-Cookie` pair of `response`.
    fn cookie_header(response: &Response<Body>) -> String {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .collect::<Vec<_>>()
            .join("; ")
    }

    #[tokio::test]
    async fn test_session_route_requires_cookies() {
        let response = router()
            .oneshot(
                Request::get("/api/auth/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["data"]["message"],
            "Invalid or expired session"
        );
    }

    #[tokio::test]
    async fn test_utf8_username_round_trips_through_cookies() {
        let app = router();
        let credentials = json!({ "username": "josé garcia", "password": "correct horse" });

        let response = app
            .clone()
            .oneshot(post_json("/api/auth/register", credentials.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(post_json("/api/auth/login", credentials))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookies = cookie_header(&response);
        assert!(cookies.contains("username=jos%C3%A9%20garcia"));
        let body = body_json(response).await;
        let csrf_token = body["data"]["csrf_token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::get("/api/auth/session")
                    .header(header::COOKIE, cookies)
                    .header(CSRF_HEADER, csrf_token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["username"], "josé garcia");
    }
}
