//
//  stash-client
//  api/endpoint.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # REST Endpoint URLs
//!
//! Every resource on the server lives under `{scheme}://{host}/rest/api/{version}`
//! and is addressed relative to either a user or a project:
//!
//! ```text
//! /rest/api/1.0/users/{user}/repos/{repo}/...
//! /rest/api/1.0/projects/{project}/repos/{repo}/...
//! /rest/api/1.0/repos                        (server-wide, no owner)
//! ```
//!
//! [`Endpoint`] records which pieces a request targets and joins them in a
//! fixed order. Extra segments are appended verbatim; nothing is escaped.

use super::common::{Result, StashError};

const PROJECT_NAMESPACE: &str = "projects";
const USER_NAMESPACE: &str = "users";
pub(crate) const REPOSITORY_NAMESPACE: &str = "repos";

/// Builds the API root for a host, e.g. `https://stash.example.com/rest/api/1.0`.
pub fn api_root(scheme: &str, host: &str, api_version: &str) -> String {
    format!("{}://{}/rest/api/{}", scheme, host, api_version)
}

/// Target of a REST request, relative to the API root.
///
/// # Example
///
/// ```rust
/// use stash_client::api::Endpoint;
///
/// let url = Endpoint::owned_by(None, Some("TEAM"))
///     .repository("service")
///     .segment("pull-requests")
///     .build("https://stash.example.com/rest/api/1.0")
///     .unwrap();
/// assert_eq!(
///     url,
///     "https://stash.example.com/rest/api/1.0/projects/TEAM/repos/service/pull-requests"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    user: Option<String>,
    project: Option<String>,
    repository: Option<String>,
    path: Vec<String>,
}

impl Endpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an endpoint scoped to a user and/or project.
    ///
    /// Both may be given here; the conflict is reported by [`build`](Self::build)
    /// so that it surfaces before any request is attempted.
    pub fn owned_by(user: Option<&str>, project: Option<&str>) -> Self {
        Self {
            user: user.map(str::to_string),
            project: project.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.path.push(segment.into());
        self
    }

    pub fn segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path.extend(segments.into_iter().map(Into::into));
        self
    }

    /// Joins the endpoint onto an API root.
    ///
    /// # Errors
    ///
    /// `InvalidUsage` when both a user and a project were supplied.
    pub fn build(&self, api_root: &str) -> Result<String> {
        if self.user.is_some() && self.project.is_some() {
            return Err(StashError::InvalidUsage(
                "EITHER user or project may be supplied".to_string(),
            ));
        }

        let mut components: Vec<&str> = vec![api_root];
        if let Some(user) = &self.user {
            components.push(USER_NAMESPACE);
            components.push(user);
        } else if let Some(project) = &self.project {
            components.push(PROJECT_NAMESPACE);
            components.push(project);
        }
        if let Some(repository) = &self.repository {
            components.push(REPOSITORY_NAMESPACE);
            components.push(repository);
        }
        components.extend(self.path.iter().map(String::as_str));

        Ok(components.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "https://stash.example.com/rest/api/1.0";

    #[test]
    fn test_api_root() {
        assert_eq!(api_root("https", "stash.example.com", "1.0"), ROOT);
        assert_eq!(
            api_root("http", "127.0.0.1:7990", "1.0"),
            "http://127.0.0.1:7990/rest/api/1.0"
        );
    }

    #[test]
    fn test_user_and_project_are_exclusive() {
        let owners = [
            (None, None, true),
            (Some("bob"), None, true),
            (None, Some("TEAM"), true),
            (Some("bob"), Some("TEAM"), false),
        ];
        for (user, project, ok) in owners {
            let result = Endpoint::owned_by(user, project).build(ROOT);
            assert_eq!(result.is_ok(), ok, "user={:?} project={:?}", user, project);
            if let Err(err) = result {
                assert!(matches!(err, StashError::InvalidUsage(_)));
            }
        }
    }

    #[test]
    fn test_segment_order() {
        let url = Endpoint::new()
            .segment("permissions")
            .segment("users")
            .repository("tools")
            .user("bob")
            .build(ROOT)
            .unwrap();
        assert_eq!(url, format!("{}/users/bob/repos/tools/permissions/users", ROOT));
    }

    #[test]
    fn test_server_wide_collection() {
        let url = Endpoint::new().segment("repos").build(ROOT).unwrap();
        assert_eq!(url, format!("{}/repos", ROOT));
    }

    #[test]
    fn test_segments_are_not_escaped() {
        let url = Endpoint::owned_by(None, Some("TEAM"))
            .segments(["a b", "c/d"])
            .build(ROOT)
            .unwrap();
        assert_eq!(url, format!("{}/projects/TEAM/a b/c/d", ROOT));
    }
}
