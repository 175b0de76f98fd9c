//
//  stash-client
//  api/server/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Pull Requests
//!
//! Types and client operations for pull requests. A pull request proposes
//! merging a source ref (`fromRef`) into a destination ref (`toRef`), either
//! within one repository or from a fork.
//!
//! ## API Endpoints
//!
//! ```text
//! GET  /rest/api/1.0/{users|projects}/{owner}/repos/{repo}/pull-requests?state=OPEN
//! POST /rest/api/1.0/{users|projects}/{owner}/repos/{repo}/pull-requests
//! ```
//!
//! ## Create Payload
//!
//! [`PullRequestDraft`] builds the body the create endpoint expects:
//!
//! ```json
//! {
//!     "title": "Feature widget",
//!     "fromRef": {"id": "feature-widget", "repository": {"slug": "tools", "project": {"key": "~BOB"}}},
//!     "toRef": {"id": "master"},
//!     "description": "optional",
//!     "reviewers": [{"user": {"name": "alice"}}]
//! }
//! ```
//!
//! `fromRef.repository` is only sent when the source lives in a fork.
//!
//! ## Notes
//!
//! - Timestamps are POSIX milliseconds, converted to local time
//! - Branch ids are sent exactly as given; short names and `refs/heads/...` both work
//! - `approved_by` keeps reviewer order

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repositories::{decode_repository, Repository};
use super::users::{decode_user, User};
use super::{malformed, require_owner, require_repository};
use crate::api::client::{query_params, StashClient};
use crate::api::common::{Outcome, PagedResult, Result, StashError};
use crate::api::endpoint::Endpoint;

const PULL_REQUESTS: &str = "pull-requests";

/// Destination branch used when none is given.
pub const DEFAULT_DESTINATION: &str = "master";

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestState {
    Open,
    Declined,
    Merged,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl PullRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Declined => "DECLINED",
            Self::Merged => "MERGED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PullRequestState {
    type Err = StashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "DECLINED" => Ok(Self::Declined),
            "MERGED" => Ok(Self::Merged),
            other => Err(StashError::InvalidUsage(format!(
                "unknown pull request state {}, expected OPEN, DECLINED or MERGED",
                other
            ))),
        }
    }
}

/// A branch or tag used as one end of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ref {
    /// Full ref name, e.g. `refs/heads/feature`.
    pub id: String,

    /// Short name, e.g. `feature`.
    pub display_id: String,

    /// Commit the ref pointed at when the snapshot was taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,

    pub repository: Repository,
}

#[derive(Deserialize)]
struct RawRef {
    #[serde(default)]
    id: String,
    #[serde(default, rename = "displayId")]
    display_id: String,
    #[serde(default, rename = "latestCommit")]
    latest_commit: Option<String>,
    #[serde(default, rename = "latestChangeset")]
    latest_changeset: Option<String>,
    #[serde(default)]
    repository: Option<Value>,
}

/// Decodes one ref object.
pub fn decode_ref(value: &Value) -> Result<Ref> {
    let raw = RawRef::deserialize(value).map_err(malformed("ref"))?;
    let repository = match &raw.repository {
        Some(repository) => decode_repository(repository)?,
        None => Repository::default(),
    };
    Ok(Ref {
        id: raw.id,
        display_id: raw.display_id,
        commit_id: raw.latest_commit.or(raw.latest_changeset),
        repository,
    })
}

/// A pull request snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    pub id: Option<u64>,
    pub state: PullRequestState,
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created: Option<DateTime<Local>>,
    pub updated: Option<DateTime<Local>>,
    pub author: User,
    pub source: Ref,
    pub destination: Ref,

    /// Every reviewer, in server order.
    pub reviewers: Vec<User>,

    /// Reviewers who approved, in server order.
    pub approved_by: Vec<User>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

impl PullRequest {
    /// Whether source and destination are the same repository.
    ///
    /// False when either repository id is unknown.
    pub fn is_local(&self) -> bool {
        match (self.source.repository.id(), self.destination.repository.id()) {
            (Some(source), Some(destination)) => source == destination,
            _ => false,
        }
    }
}

#[derive(Deserialize)]
struct RawParticipant {
    user: Value,
    #[serde(default)]
    approved: bool,
}

#[derive(Deserialize)]
struct RawLinks {
    #[serde(default, rename = "self")]
    self_link: Vec<RawHref>,
}

#[derive(Deserialize)]
struct RawHref {
    href: String,
}

#[derive(Deserialize)]
struct RawPullRequest {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    state: Option<PullRequestState>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "createdDate")]
    created_date: Option<i64>,
    #[serde(default, rename = "updatedDate")]
    updated_date: Option<i64>,
    author: RawParticipant,
    #[serde(rename = "fromRef")]
    from_ref: Value,
    #[serde(rename = "toRef")]
    to_ref: Value,
    reviewers: Vec<RawParticipant>,
    #[serde(default)]
    links: Option<RawLinks>,
}

/// Converts server milliseconds to a local timestamp, keeping the
/// millisecond part exactly. Negative values count back from the epoch.
pub fn decode_timestamp(millis: i64) -> Option<DateTime<Local>> {
    let seconds = millis.div_euclid(1000);
    let nanos = (millis.rem_euclid(1000) as u32) * 1_000_000;
    DateTime::from_timestamp(seconds, nanos).map(|utc| utc.with_timezone(&Local))
}

/// Decodes one pull request object.
///
/// # Errors
///
/// `MalformedResponse` when `author`, `fromRef`, `toRef` or `reviewers` is
/// missing. An empty reviewer list is fine.
pub fn decode_pull_request(value: &Value) -> Result<PullRequest> {
    let raw = RawPullRequest::deserialize(value).map_err(malformed("pull request"))?;

    let mut reviewers = Vec::with_capacity(raw.reviewers.len());
    let mut approved_by = Vec::new();
    for participant in &raw.reviewers {
        let user = decode_user(&participant.user)?;
        if participant.approved {
            approved_by.push(user.clone());
        }
        reviewers.push(user);
    }

    Ok(PullRequest {
        id: raw.id,
        state: raw.state.unwrap_or(PullRequestState::Unknown),
        title: raw.title,
        description: raw.description,
        created: raw.created_date.and_then(decode_timestamp),
        updated: raw.updated_date.and_then(decode_timestamp),
        author: decode_user(&raw.author.user)?,
        source: decode_ref(&raw.from_ref)?,
        destination: decode_ref(&raw.to_ref)?,
        reviewers,
        approved_by,
        web_url: raw
            .links
            .and_then(|links| links.self_link.into_iter().next())
            .map(|link| link.href),
    })
}

/// Turns a branch name into a readable title: separators become spaces and
/// the first letter is capitalized.
///
/// ```rust
/// use stash_client::api::server::pullrequests::default_title;
///
/// assert_eq!(default_title("feature/add-widget_v2"), "Feature add widget v2");
/// ```
pub fn default_title(branch: &str) -> String {
    let spaced: String = branch
        .chars()
        .map(|c| if matches!(c, '-' | '_' | '/') { ' ' } else { c })
        .collect();
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Everything needed to open a pull request.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stash_client::api::server::PullRequestDraft;
///
/// let body = serde_json::to_value(PullRequestDraft::new("tools", "fix-login").payload()).unwrap();
/// assert_eq!(body, json!({
///     "title": "Fix login",
///     "fromRef": {"id": "fix-login"},
///     "toRef": {"id": "master"}
/// }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    /// Slug of the repository the pull request is opened against.
    pub repository: String,
    pub source_branch: String,
    pub destination_branch: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub reviewers: Vec<String>,
    /// Project key owning the fork the source branch lives in.
    pub fork_owner: Option<String>,
}

impl PullRequestDraft {
    pub fn new(repository: impl Into<String>, source_branch: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            source_branch: source_branch.into(),
            destination_branch: None,
            title: None,
            description: None,
            reviewers: Vec::new(),
            fork_owner: None,
        }
    }

    pub fn destination(mut self, branch: impl Into<String>) -> Self {
        self.destination_branch = Some(branch.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn reviewers<I, S>(mut self, reviewers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reviewers.extend(reviewers.into_iter().map(Into::into));
        self
    }

    pub fn fork_owner(mut self, owner: impl Into<String>) -> Self {
        self.fork_owner = Some(owner.into());
        self
    }

    /// Builds the create payload. Pure; no validation beyond defaults.
    pub fn payload(&self) -> CreatePullRequestRequest {
        let repository = self.fork_owner.as_ref().map(|owner| RepositorySpec {
            slug: self.repository.clone(),
            project: ProjectSpec { key: owner.clone() },
        });
        let reviewers = if self.reviewers.is_empty() {
            None
        } else {
            Some(
                self.reviewers
                    .iter()
                    .map(|name| ReviewerSpec {
                        user: UserSpec { name: name.clone() },
                    })
                    .collect(),
            )
        };

        CreatePullRequestRequest {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| default_title(&self.source_branch)),
            from_ref: FromRefSpec {
                id: self.source_branch.clone(),
                repository,
            },
            to_ref: ToRefSpec {
                id: self
                    .destination_branch
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DESTINATION.to_string()),
            },
            description: self.description.clone(),
            reviewers,
        }
    }
}

/// Wire body of a pull request create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePullRequestRequest {
    pub title: String,
    #[serde(rename = "fromRef")]
    pub from_ref: FromRefSpec,
    #[serde(rename = "toRef")]
    pub to_ref: ToRefSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<ReviewerSpec>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FromRefSpec {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositorySpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToRefSpec {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySpec {
    pub slug: String,
    pub project: ProjectSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSpec {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerSpec {
    pub user: UserSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSpec {
    pub name: String,
}

fn pull_requests_endpoint(
    repository: &str,
    user: Option<&str>,
    project: Option<&str>,
) -> Result<Endpoint> {
    require_owner(user, project, "pull request repository")?;
    require_repository(repository, "pull request")?;
    Ok(Endpoint::owned_by(user, project)
        .repository(repository)
        .segment(PULL_REQUESTS))
}

impl StashClient {
    /// Lists pull requests of a repository.
    ///
    /// Without `state` the server applies its default, `OPEN`.
    pub async fn list_pull_requests(
        &self,
        repository: &str,
        user: Option<&str>,
        project: Option<&str>,
        state: Option<PullRequestState>,
        limit: Option<u32>,
        start: Option<u32>,
    ) -> Result<Outcome<PagedResult<PullRequest>>> {
        let target = pull_requests_endpoint(repository, user, project)?;
        let query = match state {
            Some(PullRequestState::Unknown) => {
                return Err(StashError::InvalidUsage(
                    "pull request state filter must be OPEN, DECLINED or MERGED".to_string(),
                ))
            }
            Some(state) => query_params([("state", state.as_str().to_string())]),
            None => Vec::new(),
        };
        self.get_paged(&target, &query, Some(decode_pull_request), limit, start)
            .await
    }

    /// Opens a pull request described by `draft`.
    pub async fn create_pull_request(
        &self,
        user: Option<&str>,
        project: Option<&str>,
        draft: &PullRequestDraft,
    ) -> Result<Outcome<PullRequest>> {
        let target = pull_requests_endpoint(&draft.repository, user, project)?;
        self.post(&target, &draft.payload())
            .await?
            .try_map(|response| decode_pull_request(&response.json()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn repo(id: u64) -> Value {
        json!({"id": id, "slug": "tools", "name": "tools", "project": {"key": "TEAM"}})
    }

    fn sample() -> Value {
        json!({
            "id": 42,
            "version": 3,
            "title": "Fix login",
            "description": "Handles expired sessions",
            "state": "OPEN",
            "createdDate": 1000,
            "updatedDate": 1500,
            "fromRef": {
                "id": "refs/heads/fix-login",
                "displayId": "fix-login",
                "latestCommit": "abc123",
                "repository": repo(7)
            },
            "toRef": {
                "id": "refs/heads/master",
                "displayId": "master",
                "repository": repo(7)
            },
            "author": {"user": {"name": "bob", "displayName": "Bob"}, "approved": false},
            "reviewers": [
                {"user": {"name": "a"}, "approved": true},
                {"user": {"name": "b"}, "approved": false}
            ],
            "links": {"self": [{"href": "https://stash.example.com/projects/TEAM/repos/tools/pull-requests/42"}]}
        })
    }

    #[test]
    fn test_decode_pull_request() {
        let pr = decode_pull_request(&sample()).unwrap();
        assert_eq!(pr.id, Some(42));
        assert_eq!(pr.state, PullRequestState::Open);
        assert_eq!(pr.title, "Fix login");
        assert_eq!(pr.author.label(), "Bob");
        assert_eq!(pr.source.display_id, "fix-login");
        assert_eq!(pr.source.commit_id.as_deref(), Some("abc123"));
        assert_eq!(pr.destination.id, "refs/heads/master");
        assert!(pr.is_local());
        assert!(pr.web_url.is_some());
    }

    #[test]
    fn test_reviewers_and_approvals_keep_order() {
        let pr = decode_pull_request(&sample()).unwrap();
        let reviewers: Vec<&str> = pr.reviewers.iter().map(User::name).collect();
        let approved: Vec<&str> = pr.approved_by.iter().map(User::name).collect();
        assert_eq!(reviewers, vec!["a", "b"]);
        assert_eq!(approved, vec!["a"]);
    }

    #[test]
    fn test_timestamps_keep_sub_second_precision() {
        let pr = decode_pull_request(&sample()).unwrap();
        let created = pr.created.unwrap().with_timezone(&Utc);
        assert_eq!(created.timestamp(), 1);
        assert_eq!(created.timestamp_subsec_nanos(), 0);

        let updated = pr.updated.unwrap().with_timezone(&Utc);
        assert_eq!(updated.timestamp(), 1);
        assert_eq!(updated.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_realistic_timestamp_keeps_milliseconds() {
        let time = decode_timestamp(1_700_000_000_123).unwrap().with_timezone(&Utc);
        assert_eq!(time.timestamp(), 1_700_000_000);
        assert_eq!(time.timestamp_subsec_millis(), 123);
        assert_eq!(time.timestamp_subsec_nanos(), 123_000_000);

        let before_epoch = decode_timestamp(-1).unwrap().with_timezone(&Utc);
        assert_eq!(before_epoch.timestamp(), -1);
        assert_eq!(before_epoch.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let value = sample();
        assert_eq!(
            decode_pull_request(&value).unwrap(),
            decode_pull_request(&value).unwrap()
        );
    }

    #[test]
    fn test_fork_pull_request_is_not_local() {
        let mut value = sample();
        value["fromRef"]["repository"] = repo(8);
        assert!(!decode_pull_request(&value).unwrap().is_local());

        value["fromRef"]["repository"] = json!({"slug": "tools"});
        assert!(!decode_pull_request(&value).unwrap().is_local());
    }

    #[test]
    fn test_missing_required_containers_are_malformed() {
        for key in ["author", "fromRef", "toRef", "reviewers"] {
            let mut value = sample();
            value.as_object_mut().unwrap().remove(key);
            let err = decode_pull_request(&value).unwrap_err();
            assert!(
                matches!(err, StashError::MalformedResponse(_)),
                "missing {} should be malformed",
                key
            );
        }
    }

    #[test]
    fn test_empty_reviewers_and_unknown_state() {
        let mut value = sample();
        value["reviewers"] = json!([]);
        value["state"] = json!("SUPERSEDED");
        let pr = decode_pull_request(&value).unwrap();
        assert!(pr.reviewers.is_empty());
        assert!(pr.approved_by.is_empty());
        assert_eq!(pr.state, PullRequestState::Unknown);
    }

    #[test]
    fn test_default_title() {
        assert_eq!(default_title("fix-login"), "Fix login");
        assert_eq!(default_title("feature/new_api"), "Feature new api");
        assert_eq!(default_title("already Fine"), "Already Fine");
        assert_eq!(default_title(""), "");
    }

    #[test]
    fn test_minimal_payload() {
        let body = serde_json::to_value(PullRequestDraft::new("tools", "fix-login").payload())
            .unwrap();
        assert_eq!(
            body,
            json!({"title": "Fix login", "fromRef": {"id": "fix-login"}, "toRef": {"id": "master"}})
        );
    }

    #[test]
    fn test_full_payload() {
        let draft = PullRequestDraft::new("tools", "refs/heads/fix-login")
            .destination("develop")
            .title("Login fix")
            .description("Handles expired sessions")
            .reviewers(["alice", "carol"])
            .fork_owner("~BOB");
        let body = serde_json::to_value(draft.payload()).unwrap();
        assert_eq!(
            body,
            json!({
                "title": "Login fix",
                "fromRef": {
                    "id": "refs/heads/fix-login",
                    "repository": {"slug": "tools", "project": {"key": "~BOB"}}
                },
                "toRef": {"id": "develop"},
                "description": "Handles expired sessions",
                "reviewers": [{"user": {"name": "alice"}}, {"user": {"name": "carol"}}]
            })
        );
    }

    #[test]
    fn test_payload_decodes_back() {
        let draft = PullRequestDraft::new("tools", "feature/widget").reviewers(["alice"]);
        let mut value = serde_json::to_value(draft.payload()).unwrap();
        value["author"] = json!({"user": {"name": "bob"}});
        value["reviewers"] = json!([{"user": {"name": "alice"}, "approved": false}]);

        let pr = decode_pull_request(&value).unwrap();
        assert_eq!(pr.source.id, "feature/widget");
        assert_eq!(pr.title, "Feature widget");
        assert_eq!(pr.destination.id, DEFAULT_DESTINATION);
    }

    #[test]
    fn test_state_parsing() {
        assert_eq!("merged".parse::<PullRequestState>().unwrap(), PullRequestState::Merged);
        assert!("bogus".parse::<PullRequestState>().is_err());
    }

    #[test]
    fn test_listing_needs_repository() {
        let err = pull_requests_endpoint("", None, Some("TEAM")).unwrap_err();
        assert!(matches!(err, StashError::InvalidUsage(_)));
        let err = pull_requests_endpoint("tools", None, None).unwrap_err();
        assert!(matches!(err, StashError::InvalidUsage(_)));
    }
}
