// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for crawler simulation results.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Collects metrics during a crawl.
#[derive(Debug, Default)]
pub struct CrawlMetrics {
    /// Start time of the crawl
    start_time: Option<Instant>,
    /// End time of the crawl
    end_time: Option<Instant>,
    /// Count of requests by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Window sizes observed per IP, in request order
    windows_per_ip: HashMap<String, Vec<u32>>,
    /// Distinct maze paths fetched
    paths: HashSet<String>,
    /// Latency samples (microseconds)
    latencies: Vec<u64>,
}

/// Possible outcomes for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    MazePage,
    Payload,
    Redirected,
    Asset,
}

impl CrawlMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a crawl.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Mark the end of a crawl.
    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Record a request outcome.
    pub fn record(
        &mut self,
        outcome: Outcome,
        ip: &str,
        path: &str,
        window: Option<u32>,
        latency: Duration,
    ) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        if let Some(window) = window {
            self.windows_per_ip
                .entry(ip.to_string())
                .or_default()
                .push(window);
        }
        if outcome == Outcome::MazePage {
            self.paths.insert(path.to_string());
        }
        self.latencies.push(latency.as_micros() as u64);
    }

    /// Get total request count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Window sizes reported to `ip`, in request order.
    pub fn windows(&self, ip: &str) -> &[u32] {
        self.windows_per_ip
            .get(ip)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Smallest window any client was given.
    pub fn min_window(&self) -> Option<u32> {
        self.windows_per_ip.values().flatten().copied().min()
    }

    /// Get duration of the crawl.
    pub fn duration(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Get median latency in microseconds.
    pub fn median_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    /// Generate a summary report.
    pub fn report(&self) -> CrawlReport {
        CrawlReport {
            total_requests: self.total_requests(),
            maze_pages: self.count(Outcome::MazePage),
            payloads: self.count(Outcome::Payload),
            redirected: self.count(Outcome::Redirected),
            unique_paths: self.paths.len(),
            unique_ips: self.windows_per_ip.len(),
            min_window: self.min_window().unwrap_or(0),
            duration_ms: self.duration().as_millis() as u64,
            median_latency_us: self.median_latency_us(),
        }
    }
}

/// Summary report of a crawl.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub total_requests: usize,
    pub maze_pages: usize,
    pub payloads: usize,
    pub redirected: usize,
    pub unique_paths: usize,
    pub unique_ips: usize,
    pub min_window: u32,
    pub duration_ms: u64,
    pub median_latency_us: u64,
}

impl std::fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Crawl Metrics Report ===")?;
        writeln!(f, "Duration:          {} ms", self.duration_ms)?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Maze Pages:        {}", self.maze_pages)?;
        writeln!(f, "Payloads:          {}", self.payloads)?;
        writeln!(f, "Redirected:        {}", self.redirected)?;
        writeln!(f)?;
        writeln!(f, "--- Trap ---")?;
        writeln!(f, "Unique Paths:      {}", self.unique_paths)?;
        writeln!(f, "Unique IPs:        {}", self.unique_ips)?;
        writeln!(f, "Min Window:        {}", self.min_window)?;
        writeln!(f, "Median Latency:    {} us", self.median_latency_us)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = CrawlMetrics::new();
        metrics.start();

        metrics.record(Outcome::MazePage, "10.0.0.1", "/m/", Some(99), Duration::from_micros(100));
        let slow = Duration::from_micros(150);
        metrics.record(Outcome::MazePage, "10.0.0.1", "/m/a-1", Some(98), slow);
        metrics.record(Outcome::Redirected, "10.0.0.1", "/admin", None, Duration::from_micros(50));

        metrics.finish();

        assert_eq!(metrics.total_requests(), 3);
        assert_eq!(metrics.count(Outcome::MazePage), 2);
        assert_eq!(metrics.windows("10.0.0.1"), &[99, 98]);
        assert_eq!(metrics.min_window(), Some(98));
        assert_eq!(metrics.report().unique_paths, 2);
    }
}
