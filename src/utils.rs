//! Utility functions for timestamps, URLs, HTML text and logging.
//!
//! This module provides helpers shared by the source adapters:
//! - Timestamp parsing and normalization to `YYYY-MM-DD HH:MM:SS`
//! - URL path inspection for category fallbacks
//! - Text collection from `scraper` elements
//! - String truncation for log previews

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use scraper::{ElementRef, Node};
use url::Url;

/// Canonical article date format.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a machine-readable timestamp.
///
/// Accepts RFC 3339 (`2024-03-01T12:30:00Z`, `2024-03-01T12:30:00.123-05:00`)
/// and naive ISO-8601 forms (`2024-03-01T12:30:00`, `2024-03-01 12:30:00`),
/// which are taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Reformat a timestamp as `YYYY-MM-DD HH:MM:SS`, keeping its wall-clock time.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_timestamp("2024-03-01T12:30:00Z").as_deref(), Some("2024-03-01 12:30:00"));
/// assert_eq!(normalize_timestamp("yesterday"), None);
/// ```
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.format(CANONICAL_DATE_FORMAT).to_string());
    }
    parse_timestamp(raw).map(|dt| dt.format(CANONICAL_DATE_FORMAT).to_string())
}

/// Current local time in the canonical date format.
pub fn now_timestamp() -> String {
    Local::now().format(CANONICAL_DATE_FORMAT).to_string()
}

/// First non-empty segment of a URL's path.
///
/// `https://www.reuters.com/world/europe/story/` -> `world`
pub fn first_path_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// True when the URL's host is `domain` or a subdomain of it.
pub fn host_matches(url: &str, domain: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| host == domain || host.ends_with(&format!(".{domain}")))
}

/// All text beneath `element`, trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Only the text nodes that are direct children of `element`, trimmed.
pub fn direct_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary) with
/// an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}
