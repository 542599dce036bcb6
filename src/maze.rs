// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Lazily expanded, memoized maze graph.
//!
//! Each visited path gets a fixed set of children named `<namespace>/<word>-<n>`.
//! Children are generated on first visit and then stay stable for the life of
//! the process, so a crawler revisiting a page sees the same links while the
//! maze as a whole keeps growing as it wanders.

use crate::config::MazeConfig;
use crate::words::WordVocabulary;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Ordered children of a maze node.
pub type Children = Arc<[String]>;

/// Thread-safe maze graph.
pub struct MazeGraph {
    config: MazeConfig,
    words: Arc<WordVocabulary>,
    /// Memoized children per path
    nodes: RwLock<HashMap<String, Children>>,
}

impl MazeGraph {
    /// Create a maze with the root node already expanded.
    pub fn new(config: MazeConfig, words: Arc<WordVocabulary>) -> Self {
        let root_children = synthesize(&config, &words, &mut rand::thread_rng());
        let mut nodes = HashMap::new();
        nodes.insert(config.root.clone(), root_children);

        Self {
            config,
            words,
            nodes: RwLock::new(nodes),
        }
    }

    /// Strip the routing namespace from a request path. An empty remainder
    /// maps to the root identifier.
    pub fn normalize<'a>(&'a self, request_path: &'a str) -> &'a str {
        let rest = match request_path.strip_prefix(self.config.namespace.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => request_path,
        };
        let rest = rest.trim_start_matches('/');
        if rest.is_empty() {
            &self.config.root
        } else {
            rest
        }
    }

    /// Children of `path`, generating and memoizing them on first visit.
    ///
    /// Check, generate and store happen under one write lock, so concurrent
    /// first visits to the same path all observe a single synthesis.
    pub async fn expand(&self, path: &str) -> Children {
        if let Some(children) = self.nodes.read().await.get(path) {
            return children.clone();
        }

        let mut nodes = self.nodes.write().await;
        if let Some(children) = nodes.get(path) {
            return children.clone();
        }

        let children = synthesize(&self.config, &self.words, &mut rand::thread_rng());
        nodes.insert(path.to_owned(), children.clone());
        debug!(path, nodes = nodes.len(), "Expanded maze node");
        children
    }

    /// Number of memoized nodes.
    pub async fn node_count(&self) -> usize {
        self.nodes.read().await.len()
    }

    /// Routing namespace, e.g. `/m`.
    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    /// Identifier of the node served at the namespace index.
    pub fn root(&self) -> &str {
        &self.config.root
    }
}

/// Build a complete child list locally before it is published.
fn synthesize<R: Rng + ?Sized>(
    config: &MazeConfig,
    words: &WordVocabulary,
    rng: &mut R,
) -> Children {
    (0..config.fanout)
        .map(|_| {
            format!(
                "{}/{}-{}",
                config.namespace,
                words.choose(rng),
                rng.gen_range(0..config.label_bound)
            )
        })
        .collect()
}
