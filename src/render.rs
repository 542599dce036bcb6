// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTML assembly for maze pages.
//!
//! Every page links to its children, back to the landing page and to the
//! local payload, and schedules a redirect to the local payload. One page in
//! three also links to an external payload, and independently one in three
//! schedules a redirect to one.

use crate::config::PageConfig;
use crate::error::Result;
use rand::Rng;
use std::fmt::Write;
use url::Url;

/// Randomness consumed while assembling a page.
pub trait PageChance {
    /// True with probability `1/n`.
    fn one_in(&mut self, n: u32) -> bool;

    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> PageChance for R {
    fn one_in(&mut self, n: u32) -> bool {
        self.gen_ratio(1, n.max(1))
    }

    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len.max(1))
    }
}

/// Renders maze pages.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    external_payloads: Vec<Url>,
    /// Path of the local payload endpoint, e.g. `/m/random-file`
    payload_path: String,
    external_redirect_delay_ms: u64,
    local_redirect_delay_ms: u64,
}

impl PageRenderer {
    /// Build a renderer; fails if any external payload URL is invalid.
    pub fn new(config: &PageConfig, payload_path: impl Into<String>) -> Result<Self> {
        Ok(Self {
            external_payloads: config.external_payload_urls()?,
            payload_path: payload_path.into(),
            external_redirect_delay_ms: config.external_redirect_delay_ms,
            local_redirect_delay_ms: config.local_redirect_delay_ms,
        })
    }

    /// Render the page for `path` with its `children`.
    pub fn render<C: PageChance + ?Sized>(
        &self,
        path: &str,
        children: &[String],
        window: u32,
        chance: &mut C,
    ) -> String {
        let mut html = String::with_capacity(1024 + children.len() * 96);

        html.push_str("<html><head><title>Welcome to the Maze</title>");
        html.push_str("<style>.hidden-text { display: none; }</style>");
        html.push_str("</head><body>");
        let _ = write!(
            html,
            "<h1>Welcome to {} (Window Size: {})</h1>",
            escape(&title_case(path)),
            window
        );

        html.push_str("<p>Explore different paths:</p><ul>");
        for child in children {
            let label = child.rsplit('/').next().unwrap_or(child);
            let _ = write!(
                html,
                "<li><a href='{}'>{}</a></li>",
                escape(child),
                escape(&title_case(label))
            );
        }
        html.push_str("</ul><p><a href='/'>Back to Start</a></p>");

        if let Some(url) = self.maybe_external(chance) {
            let _ = write!(
                html,
                "<p><a href='{}'>Download Large File</a></p>",
                escape(url.as_str())
            );
        }

        if let Some(url) = self.maybe_external(chance) {
            html.push_str(&redirect_script(url.as_str(), self.external_redirect_delay_ms));
        }

        let _ = write!(
            html,
            "<p><a href='{}'>Download Random Data</a></p>",
            escape(&self.payload_path)
        );
        html.push_str(&redirect_script(&self.payload_path, self.local_redirect_delay_ms));

        html.push_str("</body></html>");
        html
    }

    /// With probability 1/3, a randomly chosen external payload.
    fn maybe_external<C: PageChance + ?Sized>(&self, chance: &mut C) -> Option<&Url> {
        if self.external_payloads.is_empty() || !chance.one_in(3) {
            return None;
        }
        self.external_payloads
            .get(chance.pick(self.external_payloads.len()))
    }
}

fn redirect_script(target: &str, delay_ms: u64) -> String {
    format!(
        "<script>setTimeout(function() {{ window.location.href = \"{}\"; }}, {});</script>",
        escape_js(target),
        delay_ms
    )
}

/// Upper-case the first letter of every alphanumeric run.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;
    for c in text.chars() {
        if at_boundary && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_boundary = !c.is_alphanumeric();
    }
    out
}

/// Escape text for HTML element content and single- or double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for a double-quoted JS string inside a `<script>` block.
fn escape_js(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
