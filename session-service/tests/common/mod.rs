#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use reqwest::StatusCode;
use serde_json::json;
use session_service::domain::auth::models::SessionSettings;
use session_service::domain::auth::service::AuthService;
use session_service::inbound::http::cookies::CookieSettings;
use session_service::inbound::http::cookies::CSRF_HEADER;
use session_service::inbound::http::router::create_router;
use session_service::stores::InMemoryDocumentStore;
use tokio_util::sync::CancellationToken;

pub const USERNAME: &str = "alice_wonder";
pub const PASSWORD: &str = "correct horse battery";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryDocumentStore>,
    pub api_client: reqwest::Client,
    shutdown: CancellationToken,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryDocumentStore::new());
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&store),
            Authenticator::new(),
            SessionSettings::default(),
        ));

        let shutdown = CancellationToken::new();
        let router = create_router(auth_service, CookieSettings::new(false), shutdown.clone());

        // Spawn server in background
        let signal = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { signal.cancelled().await })
                .await
                .expect("Server error");
        });

        Self {
            address,
            port,
            store,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            shutdown,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request carrying the CSRF header
    pub fn get_protected(&self, path: &str, csrf_token: &str) -> reqwest::RequestBuilder {
        self.get(path).header(CSRF_HEADER, csrf_token)
    }

    /// Helper to make POST request carrying the CSRF header
    pub fn post_protected(&self, path: &str, csrf_token: &str) -> reqwest::RequestBuilder {
        self.post(path).header(CSRF_HEADER, csrf_token)
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in the default user, returning the CSRF token
    pub async fn logged_in(&self) -> String {
        assert_eq!(
            self.register(USERNAME, PASSWORD).await.status(),
            StatusCode::CREATED
        );

        let response = self.login(USERNAME, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["csrf_token"]
            .as_str()
            .expect("Missing csrf_token")
            .to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
