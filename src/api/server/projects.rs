//
//  stash-client
//  api/server/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Projects
//!
//! A project is the team-level container that owns repositories. The server
//! identifies projects by a short key (e.g. `TEAM`) which appears in URLs:
//!
//! ```text
//! /rest/api/1.0/projects/{projectKey}/repos
//! ```
//!
//! Projects come back nested inside repositories and pull request refs; the
//! key is surfaced as the project's [`slug`](super::NamedIdentity::slug) so it
//! can be passed straight back into an endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{malformed, NamedIdentity};
use crate::api::common::Result;

/// A project on the server.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stash_client::api::server::decode_project;
///
/// let project = decode_project(&json!({"id": 7, "key": "TEAM", "name": "The Team"})).unwrap();
/// assert_eq!(project.identity.slug, "TEAM");
/// assert_eq!(project.key(), "TEAM");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Project {
    #[serde(flatten)]
    pub identity: NamedIdentity,

    /// Optional description of the project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the project is publicly accessible.
    pub is_public: bool,

    /// `NORMAL` for team projects, `PERSONAL` for a user's own project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
}

impl Project {
    /// The project key, as used in REST paths.
    pub fn key(&self) -> &str {
        &self.identity.slug
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn is_personal(&self) -> bool {
        self.project_type.as_deref() == Some("PERSONAL") || self.identity.slug.starts_with('~')
    }
}

#[derive(Deserialize)]
struct RawProject {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    public: bool,
    #[serde(default, rename = "type")]
    project_type: Option<String>,
}

/// Decodes one project object.
pub fn decode_project(value: &Value) -> Result<Project> {
    let raw = RawProject::deserialize(value).map_err(malformed("project"))?;
    Ok(Project {
        identity: NamedIdentity {
            id: raw.id,
            slug: raw.key.or(raw.slug).unwrap_or_default(),
            name: raw.name,
        },
        description: raw.description,
        is_public: raw.public,
        project_type: raw.project_type,
    })
}
