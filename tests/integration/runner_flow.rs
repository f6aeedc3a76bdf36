//! Full activation cycles: HTTP service → runner → JSON surface.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use accretion::runner::http::HttpSimulationService;
use accretion::runner::surface::JsonChartRenderer;
use accretion::runner::{
    Activation, ActivationControl, SimulationRunner, FAILURE_MESSAGE, IDLE_LABEL, RUNNING_LABEL,
};
use accretion::types::{RunError, TriggerState};

use crate::fakes::{scripted_server, temp_surface, FakeButton, RecordingNotifier, Script, ScriptState};

type Runner = SimulationRunner<HttpSimulationService, JsonChartRenderer, FakeButton, RecordingNotifier>;

struct Harness {
    runner: Arc<Runner>,
    button: FakeButton,
    notifier: RecordingNotifier,
    server: ScriptState,
    surface: PathBuf,
}

impl Harness {
    async fn new(script: Script) -> Self {
        let (base, server) = scripted_server(script).await;
        let button = FakeButton::default();
        let notifier = RecordingNotifier::default();
        let surface = temp_surface();
        let runner = Arc::new(SimulationRunner::new(
            HttpSimulationService::new(&base, Duration::from_secs(5)).unwrap(),
            JsonChartRenderer::new(&surface),
            button.clone(),
            notifier.clone(),
        ));
        Self {
            runner,
            button,
            notifier,
            server,
            surface,
        }
    }

    fn assert_idle(&self) {
        assert_eq!(self.runner.state(), TriggerState::Idle);
        assert!(!self.button.is_disabled());
        assert_eq!(self.button.label(), IDLE_LABEL);
    }

    fn surface_json(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(&self.surface).unwrap();
        serde_json::from_str(&text).unwrap()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.surface);
    }
}

#[tokio::test]
async fn test_scenario_a_renders_three_points() {
    let h = Harness::new(Script::Ok).await;

    assert_eq!(h.runner.on_activate().await, Activation::Completed { points: 3 });

    let chart = h.surface_json();
    assert_eq!(chart["config"]["data"]["labels"], serde_json::json!([0.0, 1.0, 2.0]));
    assert_eq!(
        chart["config"]["data"]["datasets"][0]["data"],
        serde_json::json!([10.0, 9.5, 9.1])
    );
    assert_eq!(chart["config"]["options"]["scales"]["x"]["title"]["text"], "Time");
    assert_eq!(chart["config"]["options"]["scales"]["y"]["title"]["text"], "Mass");
    assert!(h.notifier.alerts().is_empty());
    h.assert_idle();
}

#[tokio::test]
async fn test_scenario_b_http_error() {
    let h = Harness::new(Script::ServerError).await;

    let outcome = h.runner.on_activate().await;

    assert!(matches!(outcome, Activation::Failed(RunError::Transport(_))));
    assert_eq!(h.notifier.alerts(), vec![FAILURE_MESSAGE.to_string()]);
    assert!(!h.surface.exists());
    assert!(!h.runner.has_chart());
    h.assert_idle();
}

#[tokio::test]
async fn test_scenario_c_malformed_body_keeps_prior_chart() {
    let h = Harness::new(Script::Ok).await;
    h.runner.on_activate().await;
    let before = std::fs::read_to_string(&h.surface).unwrap();

    h.server.set(Script::MissingMass);
    let outcome = h.runner.on_activate().await;

    assert!(matches!(outcome, Activation::Failed(RunError::Decode(_))));
    assert_eq!(h.notifier.alerts().len(), 1);
    assert_eq!(std::fs::read_to_string(&h.surface).unwrap(), before);
    assert!(h.runner.has_chart());
    h.assert_idle();
}

#[tokio::test]
async fn test_scenario_d_rapid_activations_issue_one_request() {
    let h = Harness::new(Script::Gated).await;

    let first = tokio::spawn({
        let runner = h.runner.clone();
        async move { runner.on_activate().await }
    });
    while h.server.hits() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(h.button.is_disabled());
    assert_eq!(h.button.label(), RUNNING_LABEL);

    let (second, third) = futures::join!(h.runner.on_activate(), h.runner.on_activate());
    assert_eq!(second, Activation::Ignored);
    assert_eq!(third, Activation::Ignored);

    h.server.gate.notify_one();
    assert_eq!(first.await.unwrap(), Activation::Completed { points: 3 });
    assert_eq!(h.server.hits(), 1);
    h.assert_idle();
}

#[tokio::test]
async fn test_successive_runs_replace_chart() {
    let h = Harness::new(Script::Ok).await;

    h.runner.on_activate().await;
    let first_id = h.surface_json()["chart_id"].clone();
    h.runner.on_activate().await;
    let second_id = h.surface_json()["chart_id"].clone();

    assert_ne!(first_id, second_id);
    assert_eq!(h.server.hits(), 2);

    h.runner.release_chart();
    assert!(!h.surface.exists());
}

#[tokio::test]
async fn test_recovers_after_failure() {
    let h = Harness::new(Script::ServerError).await;
    assert!(matches!(h.runner.on_activate().await, Activation::Failed(_)));

    h.server.set(Script::Ok);
    assert_eq!(h.runner.on_activate().await, Activation::Completed { points: 3 });
    assert_eq!(h.notifier.alerts().len(), 1);
    h.assert_idle();
}
