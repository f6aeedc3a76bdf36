//! Web service — Axum server for the simulation page and endpoint.
//!
//! Serves the page with the Play button, its script, and `GET /simulate`.
//! CORS enabled so the endpoint can be used from other local origins.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use routes::AppState;

/// The embedded page (compiled into the binary).
const INDEX_HTML: &str = include_str!("templates/index.html");

/// The page's Play-button script.
pub(crate) const PAGE_SCRIPT: &str = include_str!("static/scripts.js");

/// Bind the listener and spawn the server as a background task.
///
/// Binding happens before spawning so an occupied port is reported to the
/// caller. Returns the bound address (useful when `addr` uses port 0).
pub async fn spawn_server(state: AppState, addr: &str) -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind web server to {addr}"))?;
    let local = listener
        .local_addr()
        .context("Failed to read bound web server address")?;

    let app = build_router(state);
    info!(addr = %local, "Simulation server listening on http://{local}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Web server error");
        }
    });

    Ok(local)
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("*"))
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/simulate", get(routes::simulate))
        .route("/api/last-run", get(routes::last_run))
        .route("/static/js/scripts.js", get(routes::page_script))
        .route("/health", get(routes::health))
        .route("/", get(serve_index))
        .layer(cors)
        .with_state(state)
}

/// Serve the embedded page.
async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
