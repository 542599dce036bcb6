// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Maze Tarpit Service
//!
//! Serves a landing page and, behind it, an endless maze of generated links
//! whose pages push visitors towards a slow, throttled gzip download.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 127.0.0.1:8282)
//! - `WORDS_PATH`: Newline-delimited word list (default: data/words.txt)
//! - `WINDOW_CAP`: Window size ceiling (default: 100)
//! - `MAZE_FANOUT`: Links per maze page (default: 5)
//! - `PAYLOAD_BYTES`: Pre-compression bytes per download (default: 10485760)
//! - `CHUNK_DELAY_MS`: Pause after each flushed chunk (default: 0)
//! - `METRICS_ENABLED`: Expose `/metrics` (default: true)

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use maze_tarpit::{config::Config, handlers, words::WordVocabulary, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        words_path = %config.words_path.display(),
        window_cap = config.throttle.window_cap,
        fanout = config.maze.fanout,
        payload_bytes = config.payload.total_bytes,
        chunk_delay_ms = config.payload.chunk_delay_ms,
        "Starting maze tarpit"
    );

    // A missing word list is fatal
    let words = WordVocabulary::load(&config.words_path)
        .with_context(|| format!("loading word list {}", config.words_path.display()))?;

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_addr))?;

    let state = Arc::new(AppState::new(config, words)?);
    let app = handlers::router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let defaults = Config::default();
    let mut config = Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        words_path: std::env::var("WORDS_PATH")
            .map(Into::into)
            .unwrap_or(defaults.words_path),
        ..Config::default()
    };

    if let Some(cap) = env_parse("WINDOW_CAP") {
        config.throttle.window_cap = cap;
    }
    if let Some(fanout) = env_parse("MAZE_FANOUT") {
        config.maze.fanout = fanout;
    }
    if let Some(bytes) = env_parse("PAYLOAD_BYTES") {
        config.payload.total_bytes = bytes;
    }
    if let Some(delay) = env_parse("CHUNK_DELAY_MS") {
        config.payload.chunk_delay_ms = delay;
    }
    if let Some(enabled) = env_parse("METRICS_ENABLED") {
        config.metrics.enabled = enabled;
    }
    config
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
