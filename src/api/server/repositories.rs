//
//  stash-client
//  api/server/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repositories
//!
//! Types and client operations for repositories. A repository belongs either
//! to a team project or to a user's personal project.
//!
//! ## API Endpoints
//!
//! ```text
//! GET    /rest/api/1.0/repos                                (all visible repositories)
//! GET    /rest/api/1.0/{users|projects}/{owner}/repos
//! POST   /rest/api/1.0/{users|projects}/{owner}/repos       (create)
//! POST   /rest/api/1.0/{users|projects}/{owner}/repos/{repo} (fork)
//! DELETE /rest/api/1.0/{users|projects}/{owner}/repos/{repo}
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use stash_client::api::StashClient;
//! use stash_client::api::server::repositories::CreateRepositoryRequest;
//! use stash_client::auth::{CredentialSource, Credentials};
//!
//! # async fn example() -> stash_client::api::common::Result<()> {
//! let client = StashClient::new(
//!     "stash.example.com",
//!     CredentialSource::Provided(Credentials::new("bob", "secret")),
//! )?;
//! let request = CreateRepositoryRequest::new("tools").with_description("Team tooling");
//! if let Some(repo) = client.create_repository(None, Some("TEAM"), &request).await?.completed() {
//!     println!("Created {} at {}", repo.name(), repo.ssh_clone_url()?);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::projects::{decode_project, Project};
use super::{malformed, require_owner, require_repository, NamedIdentity};
use crate::api::client::StashClient;
use crate::api::common::{Outcome, PagedResult, Result, StashError};
use crate::api::endpoint::{Endpoint, REPOSITORY_NAMESPACE};

/// A repository on the server.
///
/// Clone URLs are keyed by protocol name as the server reports them,
/// typically `ssh` and `http`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Repository {
    #[serde(flatten)]
    pub identity: NamedIdentity,

    /// Project owning the repository (a personal project for user repositories).
    pub project: Project,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Source control type, `git` in practice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scm_id: Option<String>,

    /// Repository state such as `AVAILABLE` or `INITIALISING`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    pub forkable: bool,

    pub is_public: bool,

    /// Clone URLs by protocol.
    pub clone_urls: BTreeMap<String, String>,

    /// Browser URL of the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

impl Repository {
    pub fn id(&self) -> Option<u64> {
        self.identity.id
    }

    pub fn slug(&self) -> &str {
        &self.identity.slug
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Looks up the clone URL for `protocol`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the server did not report a URL for that protocol.
    pub fn clone_url(&self, protocol: &str) -> Result<&str> {
        self.clone_urls
            .get(protocol)
            .map(String::as_str)
            .ok_or_else(|| {
                StashError::NotFound(format!(
                    "No clone link for protocol {} was found in repository {}",
                    protocol,
                    self.name()
                ))
            })
    }

    pub fn ssh_clone_url(&self) -> Result<&str> {
        self.clone_url("ssh")
    }
}

#[derive(Deserialize)]
struct RawLink {
    href: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawRepositoryLinks {
    #[serde(default)]
    clone: Vec<RawLink>,
    #[serde(default, rename = "self")]
    self_link: Vec<RawLink>,
}

#[derive(Deserialize)]
struct RawRepository {
    #[serde(flatten)]
    identity: NamedIdentity,
    #[serde(default)]
    project: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "scmId")]
    scm_id: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    forkable: bool,
    #[serde(default)]
    public: bool,
    #[serde(default)]
    links: RawRepositoryLinks,
}

/// Decodes one repository object.
///
/// Clone links without a `name` are skipped.
pub fn decode_repository(value: &Value) -> Result<Repository> {
    let raw = RawRepository::deserialize(value).map_err(malformed("repository"))?;
    let project = match &raw.project {
        Some(project) => decode_project(project)?,
        None => Project::default(),
    };
    let clone_urls = raw
        .links
        .clone
        .into_iter()
        .filter_map(|link| link.name.map(|name| (name, link.href)))
        .collect();

    Ok(Repository {
        identity: raw.identity,
        project,
        description: raw.description,
        scm_id: raw.scm_id,
        state: raw.state,
        forkable: raw.forkable,
        is_public: raw.public,
        clone_urls,
        web_url: raw.links.self_link.into_iter().next().map(|link| link.href),
    })
}

/// Request body for creating a repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRepositoryRequest {
    pub name: String,

    #[serde(rename = "scmId")]
    pub scm_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forkable: Option<bool>,

    #[serde(rename = "public", skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl CreateRepositoryRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scm_id: "git".to_string(),
            description: None,
            forkable: None,
            is_public: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    pub fn with_forkable(mut self, forkable: bool) -> Self {
        self.forkable = Some(forkable);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectKey {
    pub key: String,
}

/// Request body for forking a repository.
///
/// An empty request forks into the caller's personal project under the
/// original name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectKey>,
}

impl ForkRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn into_project(mut self, key: impl Into<String>) -> Self {
        self.project = Some(ProjectKey { key: key.into() });
        self
    }
}

/// Acknowledgement of a repository deletion.
///
/// The server schedules deletion asynchronously and usually answers with a
/// short message; an empty body is also accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteAck {
    pub status: u16,
    pub reason: String,
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct RawDeleteMessage {
    #[serde(default)]
    message: Option<String>,
}

impl StashClient {
    /// Creates a repository owned by a user or a project.
    ///
    /// # Errors
    ///
    /// `InvalidUsage` unless exactly one of `user` and `project` is given.
    pub async fn create_repository(
        &self,
        user: Option<&str>,
        project: Option<&str>,
        request: &CreateRepositoryRequest,
    ) -> Result<Outcome<Repository>> {
        require_owner(user, project, "new repository")?;
        require_repository(&request.name, "new repository")?;
        let target = Endpoint::owned_by(user, project).segment(REPOSITORY_NAMESPACE);
        debug!(name = %request.name, "Creating repository");
        self.post(&target, request)
            .await?
            .try_map(|response| decode_repository(&response.json()?))
    }

    /// Forks `repository` of the given owner.
    pub async fn fork_repository(
        &self,
        repository: &str,
        user: Option<&str>,
        project: Option<&str>,
        fork: &ForkRequest,
    ) -> Result<Outcome<Repository>> {
        require_owner(user, project, "forked repository")?;
        require_repository(repository, "forked repository")?;
        let target = Endpoint::owned_by(user, project).repository(repository);
        self.post(&target, fork)
            .await?
            .try_map(|response| decode_repository(&response.json()?))
    }

    /// Schedules `repository` for deletion.
    pub async fn delete_repository(
        &self,
        repository: &str,
        user: Option<&str>,
        project: Option<&str>,
    ) -> Result<Outcome<DeleteAck>> {
        require_owner(user, project, "deleted repository")?;
        require_repository(repository, "deleted repository")?;
        let target = Endpoint::owned_by(user, project).repository(repository);
        self.delete(&target).await?.try_map(|response| {
            let message = if response.has_body() {
                response.json::<RawDeleteMessage>()?.message
            } else {
                None
            };
            Ok(DeleteAck {
                status: response.status,
                reason: response.reason,
                message,
            })
        })
    }

    /// Lists repositories of a user or project, or every repository visible
    /// to the caller when neither is given.
    pub async fn list_repositories(
        &self,
        user: Option<&str>,
        project: Option<&str>,
        limit: Option<u32>,
        start: Option<u32>,
    ) -> Result<Outcome<PagedResult<Repository>>> {
        let target = Endpoint::owned_by(user, project).segment(REPOSITORY_NAMESPACE);
        self.get_paged(&target, &[], Some(decode_repository), limit, start)
            .await
    }
}
