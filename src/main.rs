//! Freight quote server binary.

use anyhow::Context;
use freight_quote::api::rest::{AppState, create_router};
use freight_quote::application::services::{MetricsService, QuoteService};
use freight_quote::infrastructure::config::AppConfig;
use freight_quote::infrastructure::persistence::postgres::PostgresQuoteRepository;
use freight_quote::infrastructure::provider::FreteRapidoClient;
use freight_quote::infrastructure::telemetry::init_tracing;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(config.log_format).context("failed to install tracing subscriber")?;

    info!(
        port = config.server.port,
        provider = %config.provider.base_url,
        "starting freight-quote"
    );

    let connect_options = config
        .database
        .connect_options()
        .context("invalid database settings")?;
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(connect_options)
        .await
        .context("failed to connect to PostgreSQL")?;

    let repository = PostgresQuoteRepository::new(pool);
    repository
        .ensure_schema()
        .await
        .context("failed to apply database schema")?;
    let repository = Arc::new(repository);

    let provider =
        FreteRapidoClient::new(&config.provider).context("failed to build provider client")?;

    let request_timeout = Duration::from_millis(config.server.request_timeout_ms);
    let quote_service =
        QuoteService::new(repository.clone(), Arc::new(provider)).with_timeout(request_timeout);
    let metrics_service = MetricsService::new(repository).with_timeout(request_timeout);

    let router = create_router(AppState::new(quote_service, metrics_service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
