use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use menu_builder_api::{
    app,
    config::Config,
    jobs::{ExpireTrialsJob, JobScheduler, PoolMetricsJob, RateLimitCleanupJob},
    middleware,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    middleware::logging::init_logging(&config.logging)
        .context("Failed to initialize logging")?;
    middleware::init_metrics().context("Failed to initialize metrics")?;

    info!("Starting Menu Builder API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database_config())
        .await
        .context("Failed to connect to database")?;

    persistence::db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let addr = config.socket_addr().context("Invalid server address")?;
    let jobs_enabled = config.jobs.enabled;
    let expiry_sweep_minutes = config.jobs.expiry_sweep_minutes;
    let state = app::build_state(config, pool.clone()).context("Failed to build application")?;

    let mut scheduler = JobScheduler::new();
    if jobs_enabled {
        scheduler.register(ExpireTrialsJob::new(pool.clone(), expiry_sweep_minutes));
        scheduler.register(PoolMetricsJob::new(pool));
    }
    // Pruned regardless of jobs.enabled
    if let Some(limiter) = state.rate_limiter.clone() {
        scheduler.register(RateLimitCleanupJob::new(limiter));
    }
    if scheduler.job_count() > 0 {
        scheduler.start();
    }

    let app = app::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
