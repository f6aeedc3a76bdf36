//! JSON chart surface.
//!
//! Renders a chart by writing its Chart.js configuration to a file. The
//! file is the display surface: there is only ever one, and a chart is
//! destroyed by removing it.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ChartRenderer;
use crate::types::ChartSpec;

/// Handle to the chart currently written to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
    pub id: Uuid,
    path: PathBuf,
}

/// What lands on the surface file.
#[derive(Serialize)]
struct SurfaceDocument<'a> {
    chart_id: String,
    config: &'a ChartSpec,
}

/// `ChartRenderer` writing to a single JSON file.
pub struct JsonChartRenderer {
    surface: PathBuf,
}

impl JsonChartRenderer {
    pub fn new(surface: impl Into<PathBuf>) -> Self {
        Self {
            surface: surface.into(),
        }
    }

    pub fn surface(&self) -> &Path {
        &self.surface
    }
}

impl ChartRenderer for JsonChartRenderer {
    type Handle = ChartHandle;

    fn render(&self, spec: &ChartSpec) -> Result<ChartHandle> {
        let id = Uuid::new_v4();
        let doc = SurfaceDocument {
            chart_id: id.to_string(),
            config: spec,
        };
        let json = serde_json::to_string_pretty(&doc).context("Failed to serialise chart")?;
        fs::write(&self.surface, json)
            .with_context(|| format!("Failed to write chart to {}", self.surface.display()))?;

        info!(
            chart_id = %id,
            points = spec.point_count(),
            surface = %self.surface.display(),
            "Chart rendered"
        );
        Ok(ChartHandle {
            id,
            path: self.surface.clone(),
        })
    }

    fn destroy(&self, handle: ChartHandle) {
        // Only clear the surface if it still shows this handle's chart.
        match fs::read_to_string(&handle.path) {
            Ok(text) if text.contains(&handle.id.to_string()) => {
                if let Err(e) = fs::remove_file(&handle.path) {
                    warn!(chart_id = %handle.id, error = %e, "Failed to clear chart surface");
                } else {
                    debug!(chart_id = %handle.id, "Chart destroyed");
                }
            }
            _ => debug!(chart_id = %handle.id, "Chart surface already cleared"),
        }
    }
}
