//
//  stash-client
//  context/resolver.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Remote URL Parsing
//!
//! Extracts the owner and repository from a git remote URL. Supported forms:
//!
//! | Format | Example |
//! |--------|---------|
//! | SSH with port | `ssh://git@stash.example.com:7999/team/tools.git` |
//! | Personal repo | `ssh://git@stash.example.com:7999/~bob/tools.git` |
//! | SCP style | `git@stash.example.com:team/tools.git` |
//! | git protocol | `git://stash.example.com/team/tools` |
//!
//! A `~name` segment denotes a user's personal repository; any other segment
//! is a project key. A trailing `.git` is dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use super::RemoteTarget;

static REMOTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:(?P<protocol>ssh|git)://)?",
        r"(?:(?P<ssh_user>\w+)@)?",
        r"(?P<host>[.\w]*?)(?::\d+/|[:/])",
        r"(?:(?:~(?P<user>[^/]+)|(?P<project>[^/]+))/)?",
        r"(?P<repo>[^/]+?)(?:\.git)?$",
    ))
    .expect("remote URL pattern is valid")
});

/// Parses a remote URL, `None` when it has none of the supported forms.
///
/// # Example
///
/// ```rust
/// use stash_client::context::parse_remote_url;
///
/// let target = parse_remote_url("ssh://git@stash.example.com:7999/~bob/tools.git").unwrap();
/// assert_eq!(target.user.as_deref(), Some("bob"));
/// assert_eq!(target.repository, "tools");
/// ```
pub fn parse_remote_url(url: &str) -> Option<RemoteTarget> {
    let captures = REMOTE_PATTERN.captures(url.trim())?;
    let group = |name: &str| captures.name(name).map(|m| m.as_str().to_string());

    Some(RemoteTarget {
        host: group("host").unwrap_or_default(),
        user: group("user"),
        project: group("project"),
        repository: group("repo")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ssh_with_port() {
        let target = parse_remote_url("ssh://git@stash.example.com:7999/team/tools.git").unwrap();
        assert_eq!(target.host, "stash.example.com");
        assert_eq!(target.project.as_deref(), Some("team"));
        assert!(target.user.is_none());
        assert_eq!(target.repository, "tools");
    }

    #[test]
    fn test_parse_personal_repository() {
        let target = parse_remote_url("ssh://git@stash.example.com:7999/~bob/tools.git").unwrap();
        assert_eq!(target.user.as_deref(), Some("bob"));
        assert!(target.project.is_none());
    }

    #[test]
    fn test_parse_scp_style() {
        let target = parse_remote_url("git@stash.example.com:team/tools.git").unwrap();
        assert_eq!(target.host, "stash.example.com");
        assert_eq!(target.project.as_deref(), Some("team"));
        assert_eq!(target.repository, "tools");
    }

    #[test]
    fn test_parse_without_git_suffix() {
        let target = parse_remote_url("git://stash.example.com/team/tools").unwrap();
        assert_eq!(target.repository, "tools");
        assert_eq!(target.project.as_deref(), Some("team"));
    }

    #[test]
    fn test_https_is_not_recognized() {
        assert!(parse_remote_url("https://stash.example.com/scm/team/tools.git").is_none());
        assert!(parse_remote_url("not a url").is_none());
    }
}
