// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Simulated crawlers driven through the router in-process.

use super::generators::extract_child_links;
use super::metrics::{CrawlMetrics, Outcome};
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use std::net::SocketAddr;
use std::time::Instant;
use tower::ServiceExt;

/// How a crawler picks its next page.
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    /// Always follow the first link on the page
    DepthFirst,
    /// Follow the link at `index % fanout`, round robin
    RoundRobin,
    /// Keep reloading the maze entry
    Reload,
}

/// Crawl configuration.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Maze pages to fetch
    pub pages: usize,
    pub strategy: Strategy,
    /// Also download the payload after every N pages
    pub payload_every: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            pages: 20,
            strategy: Strategy::DepthFirst,
            payload_every: None,
        }
    }
}

/// A response as seen by a crawler.
pub struct Fetched {
    pub status: StatusCode,
    pub window: Option<u32>,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl Fetched {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One crawler bound to one client address.
pub struct Crawler {
    app: Router,
    addr: SocketAddr,
}

impl Crawler {
    pub fn new(app: Router, addr: SocketAddr) -> Self {
        Self { app, addr }
    }

    /// Fetch a path and read the whole body.
    pub async fn fetch(&self, path: &str) -> Fetched {
        let request = Request::builder()
            .uri(path)
            .extension(ConnectInfo(self.addr))
            .body(Body::empty())
            .expect("valid request");
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers();
        let window = headers
            .get("x-window-size")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let location = headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes()
            .to_vec();

        Fetched {
            status,
            window,
            location,
            body,
        }
    }

    /// Walk the maze from its entry, recording every request.
    pub async fn crawl(&self, config: &CrawlConfig, metrics: &mut CrawlMetrics) {
        let ip = self.addr.ip().to_string();
        let mut next = "/m/".to_string();

        for i in 0..config.pages {
            let start = Instant::now();
            let page = self.fetch(&next).await;
            assert_eq!(page.status, StatusCode::OK, "maze page {next} failed");
            metrics.record(Outcome::MazePage, &ip, &next, page.window, start.elapsed());

            if let Some(every) = config.payload_every {
                if (i + 1) % every == 0 {
                    let start = Instant::now();
                    let payload = self.fetch("/m/random-file").await;
                    assert_eq!(payload.status, StatusCode::OK);
                    metrics.record(
                        Outcome::Payload,
                        &ip,
                        "/m/random-file",
                        payload.window,
                        start.elapsed(),
                    );
                }
            }

            let links = extract_child_links(&page.text());
            assert!(!links.is_empty(), "maze page {next} has no links");
            next = match config.strategy {
                Strategy::DepthFirst => links[0].clone(),
                Strategy::RoundRobin => links[i % links.len()].clone(),
                Strategy::Reload => "/m/".to_string(),
            };
        }
    }

    /// Fetch a path outside the maze.
    pub async fn scan(&self, path: &str, metrics: &mut CrawlMetrics) -> Fetched {
        let ip = self.addr.ip().to_string();
        let start = Instant::now();
        let fetched = self.fetch(path).await;
        let outcome = if fetched.status == StatusCode::FOUND {
            Outcome::Redirected
        } else {
            Outcome::Asset
        };
        metrics.record(outcome, &ip, path, fetched.window, start.elapsed());
        fetched
    }
}
