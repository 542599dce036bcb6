// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Maze Tarpit
//!
//! A crawler trap for the bastion's public edge:
//!
//! - Self-expanding maze of plausible-looking links, memoized per path
//! - Per-client window that shrinks by one with every request (floor 1)
//! - Gzip payload of random bytes, flushed in window-sized chunks
//! - Occasional links and redirects to large off-site files

pub mod assets;
pub mod config;
pub mod error;
pub mod handlers;
pub mod maze;
pub mod metrics;
pub mod payload;
pub mod render;
pub mod throttle;
pub mod words;

pub use config::Config;
pub use error::{MazeError, Result};
pub use handlers::{router, AppState};
pub use maze::MazeGraph;
pub use payload::{PayloadGenerator, StreamOutcome, StreamReport};
pub use render::{PageChance, PageRenderer};
pub use throttle::ThrottleController;
pub use words::WordVocabulary;
