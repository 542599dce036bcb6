// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for crawler simulation.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// Socket addresses sharing one IP but using different source ports, as a
/// crawler opening a fresh connection per request would.
pub fn generate_reconnects(ip: IpAddr, count: usize) -> Vec<SocketAddr> {
    (0..count)
        .map(|i| SocketAddr::new(ip, 30_000 + (i % 30_000) as u16))
        .collect()
}

/// Paths a scanner would try before finding the maze.
pub fn generate_scan_paths() -> Vec<&'static str> {
    vec![
        "/wp-login.php",
        "/.env",
        "/admin",
        "/robots.txt",
        "/sitemap.xml",
        "/api/v1/users",
        "/m",
        "/index.html",
    ]
}

/// Extract `href` targets of maze list items from a page.
pub fn extract_child_links(html: &str) -> Vec<String> {
    html.split("<li><a href='")
        .skip(1)
        .filter_map(|s| s.split('\'').next())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips() {
        let ips = generate_ips(256);
        assert_eq!(ips.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_extract_child_links() {
        let html = "<ul><li><a href='/m/a-1'>A-1</a></li><li><a href='/m/b-2'>B-2</a></li></ul>";
        assert_eq!(extract_child_links(html), vec!["/m/a-1", "/m/b-2"]);
    }
}
