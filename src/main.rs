use anyhow::{Context, Result};
use fleetsim::{api, config, scenario::Scenario, sim::SimulationEngine};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetsim=info".into()),
        )
        .init();

    info!("fleetsim starting...");

    let config = config::from_env()?;

    let scenario = Scenario::load(&config.simulation.scenario_path)?;
    info!(
        path = %config.simulation.scenario_path.display(),
        vehicles = scenario.vehicles.len(),
        "Scenario loaded"
    );

    let engine = Arc::new(SimulationEngine::new(scenario)?);
    let driver = if config.simulation.autostart {
        Some(engine.start()?)
    } else {
        info!("Autostart disabled, clock idle");
        None
    };

    let app = api::create_app(
        Arc::clone(&engine),
        &config.server,
        config.simulation.subscriber_buffer,
    )?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    if let Some(driver) = driver {
        driver.stop().await;
    }

    info!("fleetsim stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
