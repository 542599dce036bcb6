// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-client throttle controller.
//!
//! Every observed request from a client shrinks its window by one until it
//! bottoms out at 1. The window sizes payload chunks, so a client with a long
//! history receives the same payload in more, smaller pieces.
//!
//! Counts are never decremented or expired for the life of the process.

use crate::config::ThrottleConfig;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Thread-safe request counter keyed by client identity.
pub struct ThrottleController {
    /// Window ceiling
    cap: u32,
    /// Requests observed per client
    counts: Mutex<HashMap<String, u64>>,
}

impl ThrottleController {
    /// Create a new controller with the given configuration.
    pub fn new(config: &ThrottleConfig) -> Self {
        Self {
            cap: config.window_cap.max(1),
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request from `identity` and return its window size.
    ///
    /// The increment and the read of the new count happen under one lock, so
    /// concurrent callers for the same identity each see a distinct count.
    pub async fn observe(&self, identity: &str) -> u32 {
        let count = {
            let mut counts = self.counts.lock().await;
            let count = counts.entry(identity.to_owned()).or_insert(0);
            *count += 1;
            *count
        };

        let window = window_size(self.cap, count);
        debug!(client = %identity, requests = count, window, "Observed request");
        window
    }

    /// Current window for `identity` without recording a request.
    pub async fn window_for(&self, identity: &str) -> u32 {
        let counts = self.counts.lock().await;
        window_size(self.cap, counts.get(identity).copied().unwrap_or(0))
    }

    /// Number of distinct identities seen so far.
    pub async fn tracked_clients(&self) -> usize {
        self.counts.lock().await.len()
    }
}

/// `max(1, cap - count)` without underflow.
fn window_size(cap: u32, count: u64) -> u32 {
    u64::from(cap).saturating_sub(count).max(1) as u32
}
