//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The simulation section maps straight onto [`SimulationParams`], so the
//! web service can hand it to the model without further conversion.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::simulation::SimulationParams;

/// Default config path, overridable with `ACCRETION_CONFIG`.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub simulation: SimulationParams,
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Drive a terminal runner alongside the server.
    pub enabled: bool,
    /// Base URL of the simulation service, without trailing slash.
    pub base_url: String,
    /// Client-side timeout for one `/simulate` request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// File the terminal runner renders the chart onto.
    pub chart_surface: String,
}

fn default_request_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Resolve the config path from the environment, falling back to the default.
    pub fn resolve_path() -> String {
        std::env::var("ACCRETION_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
