// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the maze tarpit.
//!
//! Defaults reproduce the reference trap: window cap of 100, five children
//! per maze node, 10 MiB payloads and the Hetzner speed-test files as
//! external payloads.

use crate::error::{MazeError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Largest payload chunk a configuration may produce (`window_cap * chunk_unit`).
pub const MAX_CHUNK_BYTES: u64 = 16 * 1024 * 1024;

/// Configuration for the maze tarpit service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 127.0.0.1:8282)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Newline-delimited word list used to name maze paths
    #[serde(default = "default_words_path")]
    pub words_path: PathBuf,

    /// Per-client throttling
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Maze graph shape
    #[serde(default)]
    pub maze: MazeConfig,

    /// Streaming payload generation
    #[serde(default)]
    pub payload: PayloadConfig,

    /// Maze page assembly
    #[serde(default)]
    pub page: PageConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Throttle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Window size ceiling; a client's window is `max(1, cap - requests)`
    #[serde(default = "default_window_cap")]
    pub window_cap: u32,
}

/// Maze graph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Children generated per maze node (default: 5)
    #[serde(default = "default_fanout")]
    pub fanout: usize,

    /// Exclusive upper bound of the numeric label in `word-N` (default: 10000)
    #[serde(default = "default_label_bound")]
    pub label_bound: u32,

    /// Routing namespace prefixed to every child (default: /m)
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Identifier of the root node (default: start)
    #[serde(default = "default_root")]
    pub root: String,
}

/// Streaming payload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadConfig {
    /// Pre-compression byte budget per stream (default: 10 MiB)
    #[serde(default = "default_total_bytes")]
    pub total_bytes: u64,

    /// Bytes per unit of window size (default: 1024)
    #[serde(default = "default_chunk_unit")]
    pub chunk_unit: usize,

    /// Pause after each flushed chunk in milliseconds (default: 0)
    #[serde(default)]
    pub chunk_delay_ms: u64,

    /// Compressed frames buffered between generator and socket (default: 4)
    #[serde(default = "default_channel_depth")]
    pub channel_depth: usize,
}

/// Maze page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Large third-party files linked from maze pages
    #[serde(default = "default_external_payloads")]
    pub external_payloads: Vec<String>,

    /// Delay before the occasional redirect to an external payload (default: 3000)
    #[serde(default = "default_external_redirect_ms")]
    pub external_redirect_delay_ms: u64,

    /// Delay before the unconditional redirect to the local payload (default: 5000)
    #[serde(default = "default_local_redirect_ms")]
    pub local_redirect_delay_ms: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "127.0.0.1:8282".to_string()
}

fn default_words_path() -> PathBuf {
    PathBuf::from("data/words.txt")
}

fn default_window_cap() -> u32 {
    100
}

fn default_fanout() -> usize {
    5
}

fn default_label_bound() -> u32 {
    10_000
}

fn default_namespace() -> String {
    "/m".to_string()
}

fn default_root() -> String {
    "start".to_string()
}

fn default_total_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_chunk_unit() -> usize {
    1024
}

fn default_channel_depth() -> usize {
    4
}

fn default_external_payloads() -> Vec<String> {
    vec![
        "https://ash-speed.hetzner.com/100MB.bin".to_string(),
        "https://ash-speed.hetzner.com/1GB.bin".to_string(),
        "https://ash-speed.hetzner.com/10GB.bin".to_string(),
    ]
}

fn default_external_redirect_ms() -> u64 {
    3000
}

fn default_local_redirect_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            words_path: default_words_path(),
            throttle: ThrottleConfig::default(),
            maze: MazeConfig::default(),
            payload: PayloadConfig::default(),
            page: PageConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window_cap: default_window_cap(),
        }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            fanout: default_fanout(),
            label_bound: default_label_bound(),
            namespace: default_namespace(),
            root: default_root(),
        }
    }
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            total_bytes: default_total_bytes(),
            chunk_unit: default_chunk_unit(),
            chunk_delay_ms: 0,
            channel_depth: default_channel_depth(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            external_payloads: default_external_payloads(),
            external_redirect_delay_ms: default_external_redirect_ms(),
            local_redirect_delay_ms: default_local_redirect_ms(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl Config {
    /// Reject settings that would make the trap degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.throttle.window_cap == 0 {
            return Err(MazeError::InvalidConfig("throttle.window_cap must be > 0".into()));
        }
        if self.maze.fanout == 0 {
            return Err(MazeError::InvalidConfig("maze.fanout must be > 0".into()));
        }
        if self.maze.label_bound == 0 {
            return Err(MazeError::InvalidConfig("maze.label_bound must be > 0".into()));
        }
        if !self.maze.namespace.starts_with('/') || self.maze.namespace.ends_with('/') {
            return Err(MazeError::InvalidConfig(format!(
                "maze.namespace must start and not end with '/': {:?}",
                self.maze.namespace
            )));
        }
        if self.maze.root.is_empty() {
            return Err(MazeError::InvalidConfig("maze.root must not be empty".into()));
        }
        if self.payload.total_bytes == 0 || self.payload.chunk_unit == 0 {
            return Err(MazeError::InvalidConfig(
                "payload.total_bytes and payload.chunk_unit must be > 0".into(),
            ));
        }
        let max_chunk = u64::from(self.throttle.window_cap) * self.payload.chunk_unit as u64;
        if max_chunk > MAX_CHUNK_BYTES {
            return Err(MazeError::InvalidConfig(format!(
                "throttle.window_cap * payload.chunk_unit = {max_chunk} exceeds {} bytes",
                MAX_CHUNK_BYTES
            )));
        }
        if self.payload.channel_depth == 0 {
            return Err(MazeError::InvalidConfig("payload.channel_depth must be > 0".into()));
        }
        self.page.external_payload_urls()?;
        Ok(())
    }
}

impl PayloadConfig {
    /// Get the pause inserted after each flushed chunk
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }
}

impl PageConfig {
    /// Parse the external payload list; every entry must be an absolute http(s) URL.
    pub fn external_payload_urls(&self) -> Result<Vec<Url>> {
        self.external_payloads
            .iter()
            .map(|raw| {
                let url = Url::parse(raw).map_err(|e| MazeError::InvalidPayloadUrl {
                    url: raw.clone(),
                    reason: e.to_string(),
                })?;
                match url.scheme() {
                    "http" | "https" => Ok(url),
                    other => Err(MazeError::InvalidPayloadUrl {
                        url: raw.clone(),
                        reason: format!("unsupported scheme {other}"),
                    }),
                }
            })
            .collect()
    }
}
