//! Black hole absorption model.
//!
//! A headless, deterministic run of planets falling into a growing black
//! hole. The black hole's mass is sampled over time and returned as a
//! [`SimulationResult`], which is what `GET /simulate` serves.

pub mod bodies;

use serde::Deserialize;
use tracing::debug;

use crate::types::SimulationResult;
use bodies::{BlackHole, Planet};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Field size in pixels; the black hole sits at its centre.
const FIELD_WIDTH: f64 = 1820.0;
const FIELD_HEIGHT: f64 = 1050.0;

const BLACK_HOLE_RADIUS: f64 = 15.0;
const BLACK_HOLE_MASS: f64 = 1e15;
const PLANET_RADIUS: f64 = 10.0;

/// Steps per simulated second.
pub const STEPS_PER_SECOND: f64 = 60.0;

/// Tunable parameters of a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Number of planets placed on the starting ring.
    pub planets: u32,
    /// Distance of the starting ring from the black hole, in pixels.
    pub orbit_radius: f64,
    /// Initial tangential speed of each planet, in pixels per step.
    pub orbital_speed: f64,
    /// Hard cap on the number of steps.
    pub max_steps: u32,
    /// Record a sample every this many steps.
    pub sample_every: u32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            planets: 12,
            orbit_radius: 400.0,
            orbital_speed: 4.0,
            max_steps: 3600,
            sample_every: 30,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.max_steps == 0 {
            return Err(SimulationError::InvalidParam("max_steps must be positive"));
        }
        if self.sample_every == 0 {
            return Err(SimulationError::InvalidParam("sample_every must be positive"));
        }
        if !self.orbit_radius.is_finite() || self.orbit_radius < 0.0 {
            return Err(SimulationError::InvalidParam(
                "orbit_radius must be finite and non-negative",
            ));
        }
        if !self.orbital_speed.is_finite() || self.orbital_speed < 0.0 {
            return Err(SimulationError::InvalidParam(
                "orbital_speed must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("Invalid simulation parameter: {0}")]
    InvalidParam(&'static str),
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Outcome of a run: the sampled series plus bookkeeping for the service.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub result: SimulationResult,
    pub steps: u32,
    pub planets_absorbed: usize,
}

/// Planets evenly spaced on a ring around the black hole, each moving
/// counter-clockwise at `orbital_speed`.
fn seed_planets(params: &SimulationParams, cx: f64, cy: f64) -> Vec<Planet> {
    (0..params.planets)
        .map(|i| {
            let angle = std::f64::consts::TAU * f64::from(i) / f64::from(params.planets);
            let (sin, cos) = angle.sin_cos();
            Planet::new(
                i,
                cx + params.orbit_radius * cos,
                cy + params.orbit_radius * sin,
                PLANET_RADIUS,
                -params.orbital_speed * sin,
                params.orbital_speed * cos,
            )
        })
        .collect()
}

/// Run the absorption model to completion.
///
/// Stops after `max_steps` or once every planet has been absorbed,
/// whichever comes first. The final step is always sampled.
pub fn run_simulation(params: &SimulationParams) -> Result<SimulationRun, SimulationError> {
    params.validate()?;

    let (cx, cy) = (FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
    let mut black_hole = BlackHole::new(cx, cy, BLACK_HOLE_RADIUS, BLACK_HOLE_MASS);
    let mut planets = seed_planets(params, cx, cy);

    let mut time = vec![0.0];
    let mut mass = vec![black_hole.mass];
    let mut absorbed = 0;
    let mut step = 0;

    while step < params.max_steps && !planets.is_empty() {
        step += 1;
        for planet in planets.iter_mut() {
            planet.advance(&black_hole);
        }
        absorbed += black_hole.attract(&mut planets);

        let last = step == params.max_steps || planets.is_empty();
        if step % params.sample_every == 0 || last {
            time.push(f64::from(step) / STEPS_PER_SECOND);
            mass.push(black_hole.mass);
        }
    }

    debug!(
        steps = step,
        absorbed,
        remaining = planets.len(),
        samples = time.len(),
        "Simulation finished"
    );

    Ok(SimulationRun {
        result: SimulationResult::new(time, mass),
        steps: step,
        planets_absorbed: absorbed,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
