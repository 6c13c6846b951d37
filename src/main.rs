use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use companies_house_lookup::app;
use companies_house_lookup::config::Config;

/// Main entry point for the application.
///
/// Initializes logging, loads configuration, builds the registry client and
/// lookup service, then serves the HTTP API until the process is stopped.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "companies_house_lookup=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let port = config.port;

    let app_state = app::build_state(config)?;
    tracing::info!("Registry client and lookup service initialized");

    // Configure rate limiter: 5 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(5)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    // Throttles inbound callers only; upstream usage is not metered
    let lookup_routes = app::lookup_routes().layer(ServiceBuilder::new().layer(GovernorLayer {
        config: governor_conf,
    }));

    let app = app::build_router(app_state, lookup_routes);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
