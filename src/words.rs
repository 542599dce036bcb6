// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Word vocabulary used to name maze paths.

use crate::error::{MazeError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;
use tracing::info;

/// Immutable, non-empty list of human-readable tokens.
#[derive(Debug, Clone)]
pub struct WordVocabulary {
    words: Vec<String>,
}

impl WordVocabulary {
    /// Load a newline-delimited word list from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| MazeError::WordList {
            path: path.to_path_buf(),
            source,
        })?;
        let vocabulary = Self::parse(&text)?;
        info!(path = %path.display(), words = vocabulary.len(), "Loaded word list");
        Ok(vocabulary)
    }

    /// Build a vocabulary from newline-delimited text. Lines are trimmed and
    /// blank lines dropped.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_words(text.lines().map(str::to_owned))
    }

    /// Build a vocabulary from individual words.
    pub fn from_words<I>(words: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .map(|w| w.trim().to_owned())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(MazeError::EmptyVocabulary);
        }
        Ok(Self { words })
    }

    /// Pick a word uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // Non-empty by construction
        self.words.choose(rng).map(String::as_str).unwrap_or_default()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
