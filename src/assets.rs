// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Landing page assets compiled into the binary.

/// A fixed asset and its content type.
#[derive(Debug, Clone, Copy)]
pub struct Asset {
    pub content_type: &'static str,
    pub body: &'static [u8],
}

pub const INDEX: Asset = Asset {
    content_type: "text/html; charset=utf-8",
    body: include_bytes!("../static/index.html"),
};

pub const STYLES: Asset = Asset {
    content_type: "text/css; charset=utf-8",
    body: include_bytes!("../static/styles.css"),
};

pub const SCRIPT: Asset = Asset {
    content_type: "application/javascript; charset=utf-8",
    body: include_bytes!("../static/script.js"),
};

pub const PROFILE: Asset = Asset {
    content_type: "image/jpeg",
    body: include_bytes!("../static/profile.jpg"),
};

/// Look up the asset served at an exact request path.
pub fn lookup(path: &str) -> Option<Asset> {
    match path {
        "/" => Some(INDEX),
        "/styles.css" => Some(STYLES),
        "/script.js" => Some(SCRIPT),
        "/profile.jpg" => Some(PROFILE),
        _ => None,
    }
}
