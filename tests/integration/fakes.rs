//! Test doubles and a scripted simulation server.
//!
//! The fakes keep their state behind `Arc<Mutex<..>>` so tests can hand
//! a clone to the runner and still inspect what happened.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use accretion::runner::{ActivationControl, Notifier};

/// Records every alert shown to the user.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

/// An in-memory button.
#[derive(Clone, Default)]
pub struct FakeButton {
    disabled: Arc<Mutex<bool>>,
    label: Arc<Mutex<String>>,
}

impl ActivationControl for FakeButton {
    fn set_disabled(&self, disabled: bool) {
        *self.disabled.lock().unwrap() = disabled;
    }
    fn set_label(&self, label: &str) {
        *self.label.lock().unwrap() = label.to_string();
    }
    fn is_disabled(&self) -> bool {
        *self.disabled.lock().unwrap()
    }
    fn label(&self) -> String {
        self.label.lock().unwrap().clone()
    }
}

/// How the scripted server answers `/simulate`.
#[derive(Clone, Copy, Debug)]
pub enum Script {
    /// `{time: [0,1,2], mass: [10,9.5,9.1]}`
    Ok,
    /// HTTP 500.
    ServerError,
    /// Body without `mass`.
    MissingMass,
    /// Body whose series lengths differ.
    Mismatched,
    /// Wait for the gate, then answer like `Ok`.
    Gated,
}

#[derive(Clone)]
pub struct ScriptState {
    pub script: Arc<Mutex<Script>>,
    pub hits: Arc<Mutex<usize>>,
    pub gate: Arc<Notify>,
}

impl ScriptState {
    pub fn set(&self, script: Script) {
        *self.script.lock().unwrap() = script;
    }
    pub fn hits(&self) -> usize {
        *self.hits.lock().unwrap()
    }
}

async fn scripted(State(state): State<ScriptState>) -> impl IntoResponse {
    *state.hits.lock().unwrap() += 1;
    let script = *state.script.lock().unwrap();
    let ok = r#"{"time":[0,1,2],"mass":[10,9.5,9.1]}"#;
    match script {
        Script::Ok => (StatusCode::OK, ok),
        Script::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "simulation crashed"),
        Script::MissingMass => (StatusCode::OK, r#"{"time":[0,1,2]}"#),
        Script::Mismatched => (StatusCode::OK, r#"{"time":[0,1,2],"mass":[10]}"#),
        Script::Gated => {
            state.gate.notified().await;
            (StatusCode::OK, ok)
        }
    }
}

/// Start a server whose `/simulate` follows the script. Returns its base URL.
pub async fn scripted_server(script: Script) -> (String, ScriptState) {
    let state = ScriptState {
        script: Arc::new(Mutex::new(script)),
        hits: Arc::new(Mutex::new(0)),
        gate: Arc::new(Notify::new()),
    };
    let app = Router::new()
        .route("/simulate", get(scripted))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

/// A unique chart surface path under the temp dir.
pub fn temp_surface() -> std::path::PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("accretion_it_chart_{}.json", uuid::Uuid::new_v4()));
    p
}
