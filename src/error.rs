// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the maze tarpit.
//!
//! Only startup can fail. Request handling never surfaces an error to the
//! client; stream failures are classified in [`crate::payload::StreamError`].

use std::path::PathBuf;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("Failed to read word list {path}: {source}")]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Word list is empty")]
    EmptyVocabulary,

    #[error("Invalid external payload URL {url}: {reason}")]
    InvalidPayloadUrl { url: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MazeError>;
