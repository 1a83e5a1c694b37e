//! solarsim exporter
//!
//! - Periodic generator writing per-farm gauges
//! - Prometheus endpoint: GET /metrics
//! - Graceful shutdown on Ctrl-C (readyz flips to 503, generator stops)

use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use solarsim_core::error::{Result, SolarSimError};
use solarsim_exporter::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, kind = e.kind(), "solarsim-exporter failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let state = AppState::new(config::load()?);
    let listen = state.cfg().server.listen_addr()?;
    let period = state.cfg().simulation.tick_interval();

    let generator = state.generator().spawn(period);
    let app = router::build_router(state.clone());

    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| SolarSimError::Io(format!("failed to bind {listen}: {e}")))?;
    tracing::info!(
        %listen,
        farms = state.farms().len(),
        tick_interval_ms = period.as_millis() as u64,
        "solarsim-exporter started, metrics at /metrics"
    );

    let drain_state = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutdown requested, draining");
            drain_state.set_draining();
        })
        .await
        .map_err(|e| SolarSimError::Internal(format!("server failed: {e}")))?;

    generator.shutdown().await
}
