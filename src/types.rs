//! Shared types for Accretion.
//!
//! The simulation result travels from the model through the web service
//! to the runner; the chart specification travels from the runner to the
//! renderer. Both are plain serde types so every layer agrees on the wire
//! shape.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Simulation result
// ---------------------------------------------------------------------------

/// Black hole mass sampled over time.
///
/// `time` and `mass` are parallel sequences: `mass[i]` was observed at
/// `time[i]`. The JSON shape is exactly `{"time": [...], "mass": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimulationResult {
    /// Sample times in seconds (x-axis labels).
    pub time: Vec<f64>,
    /// Black hole mass in kilograms at each sample (y-axis values).
    pub mass: Vec<f64>,
}

impl SimulationResult {
    pub fn new(time: Vec<f64>, mass: Vec<f64>) -> Self {
        Self { time, mass }
    }

    /// Number of (time, mass) points.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Check the parallel-series invariant.
    pub fn validate(&self) -> Result<(), RunError> {
        if self.time.len() != self.mass.len() {
            return Err(RunError::SeriesLength {
                time: self.time.len(),
                mass: self.mass.len(),
            });
        }
        Ok(())
    }

    /// Last sampled mass, if any.
    pub fn final_mass(&self) -> Option<f64> {
        self.mass.last().copied()
    }
}

// ---------------------------------------------------------------------------
// Trigger state
// ---------------------------------------------------------------------------

/// State of the activation control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TriggerState {
    #[default]
    Idle,
    Running,
}

impl fmt::Display for TriggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerState::Idle => write!(f, "IDLE"),
            TriggerState::Running => write!(f, "RUNNING"),
        }
    }
}

// ---------------------------------------------------------------------------
// Chart specification
// ---------------------------------------------------------------------------

pub const CHART_TITLE: &str = "Black Hole Mass Simulation";
pub const DATASET_LABEL: &str = "Mass Over Time";
pub const X_AXIS_TITLE: &str = "Time";
pub const Y_AXIS_TITLE: &str = "Mass";
const BORDER_COLOR: &str = "rgba(255, 0, 0, 1)";
const BACKGROUND_COLOR: &str = "rgba(255, 0, 0, 0.2)";

/// A line chart description in the Chart.js configuration shape.
///
/// Serialising a `ChartSpec` yields a document that can be handed
/// directly to `new Chart(ctx, config)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<f64>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
    pub fill: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub scales: Scales,
    pub plugins: Plugins,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugins {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub display: bool,
    pub text: String,
}

impl Title {
    fn shown(text: &str) -> Self {
        Self {
            display: true,
            text: text.to_string(),
        }
    }
}

impl ChartSpec {
    /// The mass-over-time line chart for a simulation result.
    pub fn mass_over_time(result: &SimulationResult) -> Self {
        Self {
            kind: "line".to_string(),
            data: ChartData {
                labels: result.time.clone(),
                datasets: vec![Dataset {
                    label: DATASET_LABEL.to_string(),
                    data: result.mass.clone(),
                    border_color: BORDER_COLOR.to_string(),
                    background_color: BACKGROUND_COLOR.to_string(),
                    fill: true,
                }],
            },
            options: ChartOptions {
                scales: Scales {
                    x: Axis { title: Title::shown(X_AXIS_TITLE) },
                    y: Axis { title: Title::shown(Y_AXIS_TITLE) },
                },
                plugins: Plugins {
                    title: Title::shown(CHART_TITLE),
                },
            },
        }
    }

    /// Number of plotted points.
    pub fn point_count(&self) -> usize {
        self.data.labels.len()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failure of a single simulation run as seen by the runner.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Series length mismatch: {time} time labels, {mass} mass values")]
    SeriesLength { time: usize, mass: usize },

    #[error("Render error: {0}")]
    Render(String),
}

impl RunError {
    /// Short category name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Transport(_) => "transport",
            RunError::Decode(_) | RunError::SeriesLength { .. } => "decode",
            RunError::Render(_) => "render",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
