//! Simulation runner — one Play activation, one request, one chart.
//!
//! Defines the collaborator traits (`SimulationService`, `ChartRenderer`,
//! `ActivationControl`, `Notifier`) and the `SimulationRunner` that drives
//! them through the idle → running → idle cycle:
//!
//! 1. mark the control as running and disable it,
//! 2. fetch a `SimulationResult` from the service,
//! 3. release the previous chart and render the new one,
//! 4. on any failure log the cause and alert the user,
//! 5. always return the control to idle.

pub mod console;
pub mod http;
pub mod surface;

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

use crate::types::{ChartSpec, RunError, SimulationResult, TriggerState};

/// Control label while idle.
pub const IDLE_LABEL: &str = "Play";

/// Control label while a request is in flight.
pub const RUNNING_LABEL: &str = "Running...";

/// The one message shown to the user for every failed run.
pub const FAILURE_MESSAGE: &str = "Failed to run the simulation. Please try again.";

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Source of simulation results (normally `GET /simulate`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimulationService: Send + Sync {
    /// Request one simulation run. Takes no parameters.
    async fn fetch(&self) -> Result<SimulationResult, RunError>;
}

/// Draws charts onto a single display surface.
pub trait ChartRenderer: Send + Sync {
    /// Ownership of one rendered chart.
    type Handle: Send;

    /// Render a chart and hand back its handle.
    fn render(&self, spec: &ChartSpec) -> anyhow::Result<Self::Handle>;

    /// Release a chart previously returned by `render`.
    fn destroy(&self, handle: Self::Handle);
}

/// The UI element the user activates to start a run.
pub trait ActivationControl: Send + Sync {
    fn set_disabled(&self, disabled: bool);
    fn set_label(&self, label: &str);
    fn is_disabled(&self) -> bool;
    fn label(&self) -> String;
}

/// Blocking, user-visible notification channel.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// What a call to [`SimulationRunner::on_activate`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// A chart with this many points is now on the surface.
    Completed { points: usize },
    /// The run failed; the user has been alerted.
    Failed(RunError),
    /// A run was already in flight; nothing happened.
    Ignored,
}

/// Coordinates at most one in-flight simulation request and owns the
/// chart currently on the display surface.
pub struct SimulationRunner<S, R, C, N>
where
    R: ChartRenderer,
{
    service: S,
    renderer: R,
    control: C,
    notifier: N,
    state: Mutex<TriggerState>,
    chart: Mutex<Option<R::Handle>>,
}

/// Lock a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the control to idle when dropped, on every exit path.
struct RunningGuard<'a, C: ActivationControl> {
    state: &'a Mutex<TriggerState>,
    control: &'a C,
}

impl<C: ActivationControl> Drop for RunningGuard<'_, C> {
    fn drop(&mut self) {
        *lock(self.state) = TriggerState::Idle;
        self.control.set_label(IDLE_LABEL);
        self.control.set_disabled(false);
    }
}

impl<S, R, C, N> SimulationRunner<S, R, C, N>
where
    S: SimulationService,
    R: ChartRenderer,
    C: ActivationControl,
    N: Notifier,
{
    /// Build a runner and put the control into its idle presentation.
    pub fn new(service: S, renderer: R, control: C, notifier: N) -> Self {
        control.set_label(IDLE_LABEL);
        control.set_disabled(false);
        Self {
            service,
            renderer,
            control,
            notifier,
            state: Mutex::new(TriggerState::Idle),
            chart: Mutex::new(None),
        }
    }

    pub fn state(&self) -> TriggerState {
        *lock(&self.state)
    }

    /// Whether a chart is currently live on the surface.
    pub fn has_chart(&self) -> bool {
        lock(&self.chart).is_some()
    }

    /// Destroy the live chart, if any.
    pub fn release_chart(&self) {
        if let Some(handle) = lock(&self.chart).take() {
            self.renderer.destroy(handle);
        }
    }

    /// Handle one activation of the control.
    ///
    /// No-op while a run is in flight. Otherwise runs fetch → render and
    /// returns the control to idle whatever the outcome.
    pub async fn on_activate(&self) -> Activation {
        let Some(_running) = self.begin() else {
            debug!("Activation ignored: simulation already running");
            return Activation::Ignored;
        };

        match self.run_cycle().await {
            Ok(points) => {
                info!(points, "Simulation chart rendered");
                Activation::Completed { points }
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "Error fetching simulation data");
                self.notifier.alert(FAILURE_MESSAGE);
                Activation::Failed(e)
            }
        }
    }

    /// Atomically move idle → running and update the control.
    fn begin(&self) -> Option<RunningGuard<'_, C>> {
        let mut state = lock(&self.state);
        if *state == TriggerState::Running {
            return None;
        }
        *state = TriggerState::Running;
        drop(state);

        self.control.set_disabled(true);
        self.control.set_label(RUNNING_LABEL);
        Some(RunningGuard {
            state: &self.state,
            control: &self.control,
        })
    }

    async fn run_cycle(&self) -> Result<usize, RunError> {
        let result = self.service.fetch().await?;
        result.validate()?;
        let spec = ChartSpec::mass_over_time(&result);

        let mut chart = lock(&self.chart);
        if let Some(previous) = chart.take() {
            self.renderer.destroy(previous);
        }
        let handle = self
            .renderer
            .render(&spec)
            .map_err(|e| RunError::Render(format!("{e:#}")))?;
        *chart = Some(handle);

        Ok(spec.point_count())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
