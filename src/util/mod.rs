//
//  stash-client
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Utility Functions
//!
//! Formatting helpers used when rendering entities in the terminal.
//!
//! ## Example
//!
//! ```rust
//! use stash_client::util::{pluralize, truncate};
//!
//! assert_eq!(truncate("Refactor the login flow", 10), "Refacto...");
//! assert_eq!(pluralize(1, "page"), "1 page");
//! assert_eq!(pluralize(3, "page"), "3 pages");
//! ```

use chrono::{DateTime, Local};

/// Describes how long ago `time` was, relative to `now`.
///
/// | Age | Output |
/// |-----|--------|
/// | < 1 minute | "just now" |
/// | < 1 hour | "N minutes ago" |
/// | < 1 day | "N hours ago" |
/// | < 30 days | "N days ago" |
/// | otherwise | the absolute date |
pub fn format_relative_time(time: &DateTime<Local>, now: &DateTime<Local>) -> String {
    let diff = now.signed_duration_since(*time).num_seconds();
    if diff < 0 {
        return "in the future".to_string();
    }

    match diff {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{} ago", pluralize((diff / 60) as usize, "minute")),
        3_600..=86_399 => format!("{} ago", pluralize((diff / 3_600) as usize, "hour")),
        86_400..=2_591_999 => format!("{} ago", pluralize((diff / 86_400) as usize, "day")),
        _ => time.format("%Y-%m-%d").to_string(),
    }
}

/// `count` followed by `noun`, pluralized unless `count` is one.
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        return format!("{} {}", count, noun);
    }
    match noun.strip_suffix('y') {
        Some(stem) if !stem.ends_with(|c: char| "aeou".contains(c)) => format!("{} {}ies", count, stem),
        _ => format!("{} {}s", count, noun),
    }
}

/// Shortens `s` to at most `max_len` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}
