use std::sync::Arc;

use auth::Authenticator;
use social_service::config::Config;
use social_service::content::ports::ContentServicePort;
use social_service::content::service::ContentService;
use social_service::identity::ports::AuthenticationServicePort;
use social_service::identity::service::AuthenticationService;
use social_service::inbound::http::router::create_router;
use social_service::repositories::PostgresContentRepository;
use social_service::repositories::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "social_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "social-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_ttl_ms = config.jwt.expiration_ms,
        refresh_ttl_ms = config.jwt.refresh_expiration_ms,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(config.jwt.token_config()?)?);

    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool.clone()));
    let content_repository = Arc::new(PostgresContentRepository::new(pg_pool));

    let auth_service: Arc<dyn AuthenticationServicePort> = Arc::new(AuthenticationService::new(
        identity_repository,
        Arc::clone(&content_repository),
        authenticator,
    ));
    let content_service: Arc<dyn ContentServicePort> =
        Arc::new(ContentService::new(content_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, content_service);
    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
