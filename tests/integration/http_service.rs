//! `HttpSimulationService` against scripted and real servers.

use std::sync::Arc;
use std::time::Duration;

use accretion::runner::http::HttpSimulationService;
use accretion::runner::SimulationService;
use accretion::simulation::SimulationParams;
use accretion::types::RunError;
use accretion::web::{self, routes::ServiceState};

use crate::fakes::{scripted_server, Script};

fn client(base: &str) -> HttpSimulationService {
    HttpSimulationService::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_ok() {
    let (base, _) = scripted_server(Script::Ok).await;
    let result = client(&base).fetch().await.unwrap();
    assert_eq!(result.time, vec![0.0, 1.0, 2.0]);
    assert_eq!(result.mass, vec![10.0, 9.5, 9.1]);
}

#[tokio::test]
async fn test_fetch_server_error_is_transport() {
    let (base, _) = scripted_server(Script::ServerError).await;
    match client(&base).fetch().await {
        Err(RunError::Transport(msg)) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("simulation crashed"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_missing_mass_is_decode() {
    let (base, _) = scripted_server(Script::MissingMass).await;
    let err = client(&base).fetch().await.unwrap_err();
    assert!(matches!(err, RunError::Decode(_)));
}

#[tokio::test]
async fn test_fetch_mismatched_lengths() {
    let (base, _) = scripted_server(Script::Mismatched).await;
    let err = client(&base).fetch().await.unwrap_err();
    assert_eq!(err, RunError::SeriesLength { time: 3, mass: 1 });
}

#[tokio::test]
async fn test_fetch_times_out() {
    let (base, _) = scripted_server(Script::Gated).await;
    let svc = HttpSimulationService::new(&base, Duration::from_millis(200)).unwrap();
    let err = svc.fetch().await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}

#[tokio::test]
async fn test_fetch_from_real_service() {
    let state = Arc::new(ServiceState::new(SimulationParams {
        planets: 5,
        max_steps: 1200,
        sample_every: 40,
        ..SimulationParams::default()
    }));
    let addr = web::spawn_server(state, "127.0.0.1:0").await.unwrap();

    let result = tokio_test::assert_ok!(client(&format!("http://{addr}")).fetch().await);
    assert!(result.len() >= 2);
    assert_eq!(result.mass[0], 1e15);
}
