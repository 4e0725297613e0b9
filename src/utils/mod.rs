//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Host part of a URL, for compact log lines.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}
