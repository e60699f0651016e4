use std::sync::Arc;

use auth::Authenticator;
use auth::TokenCodec;
use identity_service::config::Config;
use identity_service::domain::identity::gate::AuthGate;
use identity_service::domain::identity::ports::Clock;
use identity_service::domain::identity::ports::CredentialStore;
use identity_service::domain::identity::ports::SystemClock;
use identity_service::domain::identity::service::SessionService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::mail::HttpMailer;
use identity_service::outbound::repositories::InMemoryCredentialStore;
use identity_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database_configured = config.database.url.is_some(),
        access_ttl_minutes = config.jwt.access_ttl_minutes,
        refresh_ttl_hours = config.jwt.refresh_ttl_hours,
        mailer_endpoint = %config.mailer.endpoint,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(TokenCodec::new(
        config.jwt.secret.as_bytes(),
        config.jwt.access_ttl(),
        config.jwt.refresh_ttl(),
    )));
    let mailer = Arc::new(HttpMailer::new(&config.mailer)?);

    match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(config.database.acquire_timeout())
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let store = Arc::new(PostgresCredentialStore::new(pg_pool));
            serve(&config, store, mailer, authenticator).await
        }
        None => {
            tracing::warn!("No database.url configured, credentials are kept in memory");
            let store = Arc::new(InMemoryCredentialStore::new());
            serve(&config, store, mailer, authenticator).await
        }
    }
}

async fn serve<CS>(
    config: &Config,
    store: Arc<CS>,
    mailer: Arc<HttpMailer>,
    authenticator: Arc<Authenticator>,
) -> Result<(), anyhow::Error>
where
    CS: CredentialStore,
{
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session_service = Arc::new(
        SessionService::new(
            Arc::clone(&store),
            mailer,
            Arc::clone(&authenticator),
            config.session.settings(),
        )
        .with_clock(Arc::clone(&clock)),
    );
    let auth_gate = Arc::new(AuthGate::new(store, authenticator).with_clock(Arc::clone(&clock)));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        session_service,
        auth_gate,
        clock,
        config.server.request_timeout(),
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
