//! HTTP simulation service client.
//!
//! Calls `GET {base_url}/simulate` and decodes the `{time, mass}` body.
//! Connection failures, timeouts and non-2xx statuses are transport
//! errors; a body of the wrong shape is a decode error.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::SimulationService;
use crate::types::{RunError, SimulationResult};

const SIMULATE_PATH: &str = "/simulate";

/// `SimulationService` backed by the web endpoint.
pub struct HttpSimulationService {
    http: Client,
    endpoint: String,
}

impl HttpSimulationService {
    /// Create a client for the service at `base_url`.
    ///
    /// `timeout` bounds the whole request, so a hung server surfaces as a
    /// transport error instead of leaving the control disabled forever.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("accretion/0.1.0")
            .build()
            .context("Failed to build HTTP client for simulation service")?;

        Ok(Self {
            http,
            endpoint: format!("{}{SIMULATE_PATH}", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SimulationService for HttpSimulationService {
    async fn fetch(&self) -> Result<SimulationResult, RunError> {
        debug!(url = %self.endpoint, "Requesting simulation");

        let resp = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| RunError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RunError::Transport(format!("{status}: {body}")));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| RunError::Transport(e.to_string()))?;
        let result: SimulationResult =
            serde_json::from_slice(&bytes).map_err(|e| RunError::Decode(e.to_string()))?;
        result.validate()?;

        debug!(points = result.len(), "Simulation received");
        Ok(result)
    }
}
