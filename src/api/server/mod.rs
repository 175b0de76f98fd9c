//
//  stash-client
//  api/server/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Stash Server REST API v1.0
//!
//! This module holds the typed entities returned by the server and the
//! [`StashClient`](crate::api::StashClient) operations that produce them.
//! Each resource file contributes its own `impl StashClient` block.
//!
//! ## Module Organization
//!
//! - [`projects`] - Projects
//! - [`users`] - Users
//! - [`repositories`] - Repository create, fork, delete and list
//! - [`pullrequests`] - Pull request list and create
//! - [`permissions`] - User and group permission grants
//!
//! ## Decoding
//!
//! Every entity has a free `decode_*` function turning one raw JSON value into
//! the entity. These are the decoders handed to the paginator, so a listing
//! either yields fully typed entities or fails with `MalformedResponse`.
//!
//! Entities do not inherit from one another. Repositories, projects and users
//! all embed a [`NamedIdentity`] by value instead.
//!
//! ## Notes
//!
//! - Missing optional fields decode to `None` or an empty value, never an error
//! - Required containers (a pull request's author, refs and reviewer list) must
//!   be present
//! - Entities are snapshots; nothing mutates them after decoding

use serde::{Deserialize, Serialize};

use super::common::{Result, StashError};

pub mod permissions;
pub mod projects;
pub mod pullrequests;
pub mod repositories;
pub mod users;

pub use permissions::{decode_permission, Grantee, Group, PermissionGrant};
pub use projects::{decode_project, Project};
pub use pullrequests::{
    decode_pull_request, PullRequest, PullRequestDraft, PullRequestState, Ref,
};
pub use repositories::{decode_repository, DeleteAck, Repository};
pub use users::{decode_user, User};

/// Identity fields shared by repositories, projects and users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedIdentity {
    /// Numeric identifier assigned by the server.
    #[serde(default)]
    pub id: Option<u64>,

    /// URL-safe identifier used in REST paths.
    #[serde(default)]
    pub slug: String,

    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Maps a serde failure on one entity to `MalformedResponse`.
pub(crate) fn malformed(entity: &str) -> impl Fn(serde_json::Error) -> StashError + '_ {
    move |e| StashError::MalformedResponse(format!("invalid {}: {}", entity, e))
}

/// Requires exactly one of user or project.
pub(crate) fn require_owner(
    user: Option<&str>,
    project: Option<&str>,
    what: &str,
) -> Result<()> {
    match (user, project) {
        (Some(_), Some(_)) => Err(StashError::InvalidUsage(
            "EITHER user or project may be supplied".to_string(),
        )),
        (None, None) => Err(StashError::InvalidUsage(format!(
            "{} needs a project or a user",
            what
        ))),
        _ => Ok(()),
    }
}

/// Requires a non-blank repository name.
///
/// A blank name would collapse `.../repos/{repo}` onto the collection URL.
pub(crate) fn require_repository(repository: &str, what: &str) -> Result<()> {
    if repository.trim().is_empty() {
        return Err(StashError::InvalidUsage(format!(
            "{} needs a repository name",
            what
        )));
    }
    Ok(())
}
