//! Accretion — black hole mass simulation service and play runner.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! starts the web service, and (when enabled) turns the terminal into a
//! Play button: each Enter runs one simulation and renders its chart.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::info;

use accretion::config::AppConfig;
use accretion::runner::console::{run_terminal, ConsoleControl, ConsoleNotifier, LoopExit};
use accretion::runner::http::HttpSimulationService;
use accretion::runner::surface::JsonChartRenderer;
use accretion::runner::SimulationRunner;
use accretion::web::{self, routes::ServiceState};

type TerminalRunner =
    SimulationRunner<HttpSimulationService, JsonChartRenderer, ConsoleControl, ConsoleNotifier>;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = AppConfig::resolve_path();
    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    info!(
        config = %config_path,
        planets = cfg.simulation.planets,
        max_steps = cfg.simulation.max_steps,
        "Accretion starting up"
    );

    // -- Web service -----------------------------------------------------

    let state = Arc::new(ServiceState::new(cfg.simulation.clone()));
    let addr = web::spawn_server(state, &cfg.bind_addr()).await?;
    info!("Open http://{addr}/ and press Play");

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    if !cfg.client.enabled {
        shutdown.await;
        info!("Shutdown signal received.");
        return Ok(());
    }

    // -- Terminal runner -------------------------------------------------

    let service = HttpSimulationService::new(
        &cfg.client.base_url,
        Duration::from_secs(cfg.client.request_timeout_secs),
    )?;
    let runner: Arc<TerminalRunner> = Arc::new(SimulationRunner::new(
        service,
        JsonChartRenderer::new(&cfg.client.chart_surface),
        ConsoleControl::new(),
        ConsoleNotifier,
    ));

    println!("Press Enter to play, `q` to quit.");
    let input = BufReader::new(tokio::io::stdin());
    match run_terminal(runner.clone(), input, shutdown).await? {
        LoopExit::Quit => info!("Quit requested."),
        LoopExit::Shutdown => info!("Shutdown signal received."),
    }

    runner.release_chart();
    info!("Accretion shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("accretion=info"));

    if std::env::var("ACCRETION_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
