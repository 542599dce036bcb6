// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the maze tarpit.
//!
//! Maze pages and payload streams each observe the client exactly once and
//! report the resulting window in `X-Window-Size`. Everything that is not a
//! known asset or maze route is redirected into the maze.

use crate::assets;
use crate::config::Config;
use crate::error::Result;
use crate::maze::MazeGraph;
use crate::metrics::MazeMetrics;
use crate::payload::PayloadGenerator;
use crate::render::PageRenderer;
use crate::throttle::ThrottleController;
use crate::words::WordVocabulary;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderName, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};

/// Window size reported on every maze and payload response.
pub const X_WINDOW_SIZE: HeaderName = HeaderName::from_static("x-window-size");

/// Shared application state.
pub struct AppState {
    pub throttle: ThrottleController,
    pub maze: MazeGraph,
    pub payloads: PayloadGenerator,
    pub renderer: PageRenderer,
    pub metrics: MazeMetrics,
    pub config: Config,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire the components together. The maze root is expanded here, before
    /// any request is served.
    pub fn new(config: Config, words: WordVocabulary) -> Result<Self> {
        config.validate()?;

        let maze = MazeGraph::new(config.maze.clone(), Arc::new(words));
        let renderer = PageRenderer::new(&config.page, payload_path(&maze))?;
        let metrics = MazeMetrics::new()?;
        metrics.maze_nodes.set(1);

        Ok(Self {
            throttle: ThrottleController::new(&config.throttle),
            maze,
            payloads: PayloadGenerator::new(config.payload.clone()),
            renderer,
            metrics,
            config,
            started_at: Utc::now(),
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
}

/// Path of the local payload endpoint inside the maze namespace.
pub fn payload_path(maze: &MazeGraph) -> String {
    format!("{}/random-file", maze.namespace())
}

/// Build the router. Serve it with connect info so handlers can identify
/// clients by remote address.
pub fn router(state: Arc<AppState>) -> Router {
    let namespace = state.maze.namespace();

    let mut router = Router::new()
        .route(&format!("{namespace}/"), get(maze_page))
        .route(&format!("{namespace}/*path"), get(maze_page))
        .route(&payload_path(&state.maze), get(random_file))
        .route("/healthz", get(health));

    if state.config.metrics.enabled {
        router = router.route(&state.config.metrics.path, get(metrics));
    }

    router
        .fallback(static_or_redirect)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bring the maze and client gauges up to date.
async fn refresh_gauges(state: &AppState) {
    state.metrics.maze_nodes.set(state.maze.node_count().await as i64);
    state
        .metrics
        .tracked_clients
        .set(state.throttle.tracked_clients().await as i64);
}

/// Client identity: the remote IP, without the port.
fn client_id(addr: &SocketAddr) -> String {
    addr.ip().to_string()
}

/// Render the maze page for the requested path.
pub async fn maze_page(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    uri: Uri,
) -> Response {
    let client = client_id(&addr);
    let window = state.throttle.observe(&client).await;

    let path = state.maze.normalize(uri.path()).to_owned();
    let children = state.maze.expand(&path).await;
    let html = state
        .renderer
        .render(&path, &children, window, &mut rand::thread_rng());

    state.metrics.pages_served.inc();
    refresh_gauges(&state).await;

    info!(client = %client, path = %path, window, "Served maze page");

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8")),
            (X_WINDOW_SIZE, HeaderValue::from(window)),
        ],
        html,
    )
        .into_response()
}

/// Stream the gzip payload, sized by the client's window.
///
/// The generator runs in its own task and feeds the body through a bounded
/// channel; when the client goes away the body is dropped and the next send
/// ends the generator.
pub async fn random_file(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Response {
    let client = client_id(&addr);
    let window = state.throttle.observe(&client).await;
    refresh_gauges(&state).await;
    info!(client = %client, window, "Serving random file");

    let (tx, rx) = mpsc::channel(state.payloads.channel_depth());
    let task_state = state.clone();
    tokio::spawn(
        async move {
            let report = task_state.payloads.stream(window, tx).await;
            task_state.metrics.record_stream(&report);
        }
        .instrument(info_span!("payload", client = %client)),
    );

    (
        [
            (header::CONTENT_ENCODING, HeaderValue::from_static("gzip")),
            (header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream")),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment; filename=random-data.gz"),
            ),
            (X_WINDOW_SIZE, HeaderValue::from(window)),
        ],
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response()
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "maze-tarpit",
        version: env!("CARGO_PKG_VERSION"),
        started_at: state.started_at,
    })
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serve a landing asset, or send anything else into the maze.
pub async fn static_or_redirect(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    match assets::lookup(uri.path()) {
        Some(asset) => (
            [(header::CONTENT_TYPE, asset.content_type)],
            asset.body,
        )
            .into_response(),
        None => (
            StatusCode::FOUND,
            [(header::LOCATION, format!("{}/", state.config.maze.namespace))],
        )
            .into_response(),
    }
}
