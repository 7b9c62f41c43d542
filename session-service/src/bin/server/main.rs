use std::sync::Arc;

use auth::Authenticator;
use session_service::config::Config;
use session_service::config::StoreBackend;
use session_service::domain::auth::models::SessionSettings;
use session_service::domain::auth::ports::AuthServicePort;
use session_service::domain::auth::reaper::SessionReaper;
use session_service::domain::auth::service::AuthService;
use session_service::domain::store::DocumentStore;
use session_service::inbound::http::cookies::CookieSettings;
use session_service::inbound::http::router::create_router;
use session_service::stores::InMemoryDocumentStore;
use session_service::stores::PostgresDocumentStore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "session-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let settings = config.sessions.settings()?;

    tracing::info!(
        http_port = config.server.http_port,
        store = ?config.store.backend,
        session_ttl_hours = config.sessions.ttl_hours,
        operation_timeout_ms = config.sessions.operation_timeout_ms,
        "Configuration loaded"
    );

    let shutdown = CancellationToken::new();

    let (auth_service, reaper, postgres) = match config.store.backend {
        StoreBackend::Postgres => {
            let store = PostgresDocumentStore::open(
                &config.database.url,
                config.database.max_connections,
            )
            .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(store.pool()).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let store = Arc::new(store);
            let (service, reaper) = wire(Arc::clone(&store), &config, settings, &shutdown);
            (service, reaper, Some(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; all data is lost on exit");
            let (service, reaper) = wire(
                Arc::new(InMemoryDocumentStore::new()),
                &config,
                settings,
                &shutdown,
            );
            (service, reaper, None)
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        auth_service,
        CookieSettings::new(config.cookies.secure),
        shutdown.clone(),
    );

    let signal = shutdown.clone();
    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    if let Some(reaper) = reaper {
        if let Err(e) = reaper.await {
            tracing::error!(error = %e, "Session reaper task failed");
        }
    }
    if let Some(store) = postgres {
        store.close().await;
        tracing::info!(database = "postgresql", "Database connection pool closed");
    }

    tracing::info!("Server exited successfully");

    Ok(())
}

/// Build the auth service over `store` and start the session reaper if enabled.
fn wire<DS>(
    store: Arc<DS>,
    config: &Config,
    settings: SessionSettings,
    shutdown: &CancellationToken,
) -> (Arc<dyn AuthServicePort>, Option<JoinHandle<()>>)
where
    DS: DocumentStore,
{
    let reaper = config.sessions.reap_interval().map(|interval| {
        tracing::info!(interval_secs = interval.as_secs(), "Session reaper started");
        SessionReaper::new(Arc::clone(&store)).spawn(interval, shutdown.child_token())
    });

    let service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
        store,
        Authenticator::new(),
        settings,
    ));

    (service, reaper)
}
