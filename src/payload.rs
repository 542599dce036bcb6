// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Throttled gzip payload generator.
//!
//! Fills chunks of `chunk_unit * window` pseudo-random bytes, compresses them
//! and flushes the compressor after every chunk so each chunk reaches the
//! client as its own frame. The pre-compression budget is fixed, so a small
//! window means many small frames and a long-lived connection.

use crate::config::PayloadConfig;
use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::{self, Write};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One compressed frame for the response body.
pub type Frame = Result<Bytes, io::Error>;

/// Failures that end a stream early. Neither is retried.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Random data generation failed: {0}")]
    Entropy(#[from] rand::Error),

    #[error("Compression failed: {0}")]
    Compression(#[from] io::Error),
}

/// How a stream ended.
#[derive(Debug)]
pub enum StreamOutcome {
    /// The whole budget plus the gzip trailer was handed to the sink
    Completed,
    /// The receiving side went away
    Disconnected,
    /// Generation or compression failed
    Failed(StreamError),
}

impl StreamOutcome {
    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Disconnected => "disconnected",
            Self::Failed(_) => "failed",
        }
    }
}

/// Summary of a finished stream.
#[derive(Debug)]
pub struct StreamReport {
    pub outcome: StreamOutcome,
    /// Window size the stream was sized with
    pub window: u32,
    /// Bytes per chunk before compression
    pub chunk_size: usize,
    /// Chunks generated and handed to the sink
    pub chunks: u64,
    /// Pre-compression bytes handed to the sink
    pub raw_bytes: u64,
    /// Compressed bytes handed to the sink
    pub sent_bytes: u64,
}

/// Generates payload streams sized by a client's window.
#[derive(Debug, Clone)]
pub struct PayloadGenerator {
    config: PayloadConfig,
}

impl PayloadGenerator {
    pub fn new(config: PayloadConfig) -> Self {
        Self { config }
    }

    /// Bytes per chunk for a given window size.
    pub fn chunk_size(&self, window: u32) -> usize {
        self.config.chunk_unit.saturating_mul(window.max(1) as usize)
    }

    /// Number of chunks a completed stream emits for `window`.
    pub fn chunk_count(&self, window: u32) -> u64 {
        self.config.total_bytes.div_ceil(self.chunk_size(window) as u64)
    }

    /// Capacity for the channel between generator and response body.
    pub fn channel_depth(&self) -> usize {
        self.config.channel_depth
    }

    /// Stream the payload into `sink` until the budget is spent or the
    /// receiver is dropped.
    pub async fn stream(&self, window: u32, sink: mpsc::Sender<Frame>) -> StreamReport {
        let chunk_size = self.chunk_size(window);
        let mut report = StreamReport {
            outcome: StreamOutcome::Completed,
            window,
            chunk_size,
            chunks: 0,
            raw_bytes: 0,
            sent_bytes: 0,
        };

        let mut rng = StdRng::from_entropy();
        // Never allocate more than the budget, however large the window
        let buffer_len = (chunk_size as u64).min(self.config.total_bytes) as usize;
        let mut encoder = GzEncoder::new(Vec::with_capacity(buffer_len), Compression::default());
        let mut buffer = vec![0u8; buffer_len];
        let mut remaining = self.config.total_bytes;
        let delay = self.config.chunk_delay();

        debug!(window, chunk_size, budget = remaining, "Starting payload stream");

        while remaining > 0 {
            let len = remaining.min(buffer_len as u64) as usize;
            let chunk = &mut buffer[..len];

            if let Err(e) = rng.try_fill_bytes(chunk) {
                return fail(report, &sink, StreamError::Entropy(e)).await;
            }
            if let Err(e) = encoder.write_all(chunk).and_then(|()| encoder.flush()) {
                return fail(report, &sink, StreamError::Compression(e)).await;
            }

            let frame = std::mem::take(encoder.get_mut());
            let frame_len = frame.len() as u64;
            if !frame.is_empty() && sink.send(Ok(Bytes::from(frame))).await.is_err() {
                info!(
                    window,
                    chunks = report.chunks,
                    sent_bytes = report.sent_bytes,
                    "Client disconnected from payload stream"
                );
                report.outcome = StreamOutcome::Disconnected;
                return report;
            }

            remaining -= len as u64;
            report.chunks += 1;
            report.raw_bytes += len as u64;
            report.sent_bytes += frame_len;

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let trailer = match encoder.finish() {
            Ok(trailer) => trailer,
            Err(e) => return fail(report, &sink, StreamError::Compression(e)).await,
        };
        let trailer_len = trailer.len() as u64;
        if sink.send(Ok(Bytes::from(trailer))).await.is_err() {
            info!(window, chunks = report.chunks, "Client disconnected before gzip trailer");
            report.outcome = StreamOutcome::Disconnected;
            return report;
        }
        report.sent_bytes += trailer_len;

        info!(
            window,
            chunks = report.chunks,
            raw_bytes = report.raw_bytes,
            sent_bytes = report.sent_bytes,
            "Payload stream completed"
        );
        report
    }
}

/// Abort the response body and record the failure.
async fn fail(
    mut report: StreamReport,
    sink: &mpsc::Sender<Frame>,
    error: StreamError,
) -> StreamReport {
    warn!(window = report.window, chunks = report.chunks, error = %error, "Payload stream failed");
    // An error frame makes the server drop the connection instead of ending
    // the body cleanly with a truncated gzip member.
    let _ = sink
        .send(Err(io::Error::new(io::ErrorKind::Other, error.to_string())))
        .await;
    report.outcome = StreamOutcome::Failed(error);
    report
}
