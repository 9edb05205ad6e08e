use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rust_clientes_api::config::Config;
use rust_clientes_api::db::Database;
use rust_clientes_api::db_storage::PgCustomerRepository;
use rust_clientes_api::handlers::AppState;
use rust_clientes_api::routes::{api_routes, with_request_counter};
use rust_clientes_api::services::CustomerService;

/// Maximum accepted request body (1 MiB).
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Database connection and `customers` table bootstrap.
/// - HTTP routes and middleware (CORS, Rate Limiting, Body limit).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_clientes_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(config.database.connect_options()?, config.db_max_connections).await?;
    tracing::info!("Database connection pool established");
    db.ensure_customers_table().await?;

    let repository = Arc::new(PgCustomerRepository::new(db.pool.clone()));
    let app_state = Arc::new(AppState::new(CustomerService::new(repository)));

    // Configure rate limiter per client IP
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let request_counter = app_state.request_counter.clone();
    let limited = api_routes(app_state).layer(
        ServiceBuilder::new()
            // Request size limit (prevents memory exhaustion)
            .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
            .layer(GovernorLayer {
                config: governor_conf,
            }),
    );

    // Counted outside the limiters so rejected requests still show up in /status
    let app = with_request_counter(limited, request_counter)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Peer address is the rate limiter's fallback key when no proxy headers are present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
