// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the tarpit.

use crate::error::Result;
use crate::payload::StreamReport;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Metric handles plus the registry that owns them.
pub struct MazeMetrics {
    registry: Registry,
    pub pages_served: IntCounter,
    pub maze_nodes: IntGauge,
    pub tracked_clients: IntGauge,
    pub streams: IntCounterVec,
    pub payload_bytes: IntCounter,
}

impl MazeMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let pages_served = IntCounter::new("maze_pages_served_total", "Maze pages rendered")?;
        let maze_nodes = IntGauge::new("maze_nodes", "Maze paths with memoized children")?;
        let tracked_clients = IntGauge::new(
            "throttle_tracked_clients",
            "Distinct client identities seen by the throttle",
        )?;
        let streams = IntCounterVec::new(
            Opts::new("payload_streams_total", "Payload streams by outcome"),
            &["outcome"],
        )?;
        let payload_bytes = IntCounter::new(
            "payload_bytes_total",
            "Compressed payload bytes handed to clients",
        )?;

        registry.register(Box::new(pages_served.clone()))?;
        registry.register(Box::new(maze_nodes.clone()))?;
        registry.register(Box::new(tracked_clients.clone()))?;
        registry.register(Box::new(streams.clone()))?;
        registry.register(Box::new(payload_bytes.clone()))?;

        Ok(Self {
            registry,
            pages_served,
            maze_nodes,
            tracked_clients,
            streams,
            payload_bytes,
        })
    }

    /// Record a finished payload stream.
    pub fn record_stream(&self, report: &StreamReport) {
        self.streams
            .with_label_values(&[report.outcome.label()])
            .inc();
        self.payload_bytes.inc_by(report.sent_bytes);
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
