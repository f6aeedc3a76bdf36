//! Web route handlers.
//!
//! `/simulate` runs the absorption model on the blocking pool and returns
//! the mass series as JSON. State is shared via `Arc<ServiceState>`.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::simulation::{run_simulation, SimulationParams};
use crate::types::SimulationResult;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ServiceState {
    pub params: SimulationParams,
    pub last_run: RwLock<Option<RunSummary>>,
}

impl ServiceState {
    pub fn new(params: SimulationParams) -> Self {
        Self {
            params,
            last_run: RwLock::new(None),
        }
    }
}

pub type AppState = Arc<ServiceState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Bookkeeping for the most recent completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub completed_at: DateTime<Utc>,
    pub samples: usize,
    pub steps: u32,
    pub planets_absorbed: usize,
    pub final_mass: f64,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /simulate
pub async fn simulate(
    State(state): State<AppState>,
) -> Result<Json<SimulationResult>, (StatusCode, String)> {
    let params = state.params.clone();
    let run = tokio::task::spawn_blocking(move || run_simulation(&params))
        .await
        .map_err(|e| {
            error!(error = %e, "Simulation task panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "Simulation task failed".to_string())
        })?
        .map_err(|e| {
            error!(error = %e, "Simulation rejected its parameters");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    let summary = RunSummary {
        completed_at: Utc::now(),
        samples: run.result.len(),
        steps: run.steps,
        planets_absorbed: run.planets_absorbed,
        final_mass: run.result.final_mass().unwrap_or_default(),
    };
    info!(
        samples = summary.samples,
        steps = summary.steps,
        absorbed = summary.planets_absorbed,
        final_mass = summary.final_mass,
        "Simulation served"
    );
    *state.last_run.write().await = Some(summary);

    Ok(Json(run.result))
}

/// GET /api/last-run
pub async fn last_run(State(state): State<AppState>) -> Response {
    match state.last_run.read().await.clone() {
        Some(summary) => Json(summary).into_response(),
        None => (StatusCode::NOT_FOUND, "No simulation has run yet").into_response(),
    }
}

/// GET /static/js/scripts.js
pub async fn page_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        super::PAGE_SCRIPT,
    )
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
