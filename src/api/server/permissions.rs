//
//  stash-client
//  api/server/permissions.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Permissions
//!
//! Lists which users and groups hold which permission on a project or a
//! repository.
//!
//! ```text
//! GET /rest/api/1.0/projects/{key}/permissions/{users|groups}?filter=...
//! GET /rest/api/1.0/projects/{key}/repos/{repo}/permissions/{users|groups}
//! ```
//!
//! Each entry names its grantee under either a `user` or a `group` key:
//!
//! ```json
//! {"user": {"name": "bob", "displayName": "Bob"}, "permission": "PROJECT_WRITE"}
//! {"group": {"name": "developers"}, "permission": "REPO_READ"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::users::{decode_user, User};
use super::{malformed, require_owner};
use crate::api::client::{query_params, QueryParams, StashClient};
use crate::api::common::{Outcome, PagedResult, Result, StashError};
use crate::api::endpoint::Endpoint;

const PERMISSIONS: &str = "permissions";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub name: String,
}

/// Who a permission is granted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "grantee", rename_all = "lowercase")]
pub enum Grantee {
    User(User),
    Group(Group),
}

impl Grantee {
    /// Login name of the user, or the group name.
    pub fn name(&self) -> &str {
        match self {
            Self::User(user) => user.name(),
            Self::Group(group) => &group.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Group(_) => "group",
        }
    }
}

/// One permission entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionGrant {
    #[serde(flatten)]
    pub grantee: Grantee,

    /// Permission name such as `PROJECT_ADMIN` or `REPO_WRITE`.
    pub permission: String,
}

/// Decodes one permission entry.
///
/// # Errors
///
/// `MalformedResponse` when the entry has neither a `user` nor a `group`.
pub fn decode_permission(value: &Value) -> Result<PermissionGrant> {
    let grantee = if let Some(user) = value.get("user") {
        Grantee::User(decode_user(user)?)
    } else if let Some(group) = value.get("group") {
        Grantee::Group(Group::deserialize(group).map_err(malformed("group"))?)
    } else {
        return Err(StashError::MalformedResponse(
            "permission entry names neither a user nor a group".to_string(),
        ));
    };

    let permission = value
        .get("permission")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(PermissionGrant {
        grantee,
        permission,
    })
}

/// Which kind of grantee a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GranteeKind {
    Users,
    Groups,
}

impl GranteeKind {
    fn segment(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Groups => "groups",
        }
    }
}

/// Scope and filter of a permission listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionQuery<'a> {
    pub user: Option<&'a str>,
    pub project: Option<&'a str>,
    pub repository: Option<&'a str>,
    /// Server-side name filter.
    pub filter: Option<&'a str>,
}

impl StashClient {
    /// Lists users holding a permission on a project or repository.
    pub async fn list_user_permissions(
        &self,
        query: &PermissionQuery<'_>,
        limit: Option<u32>,
        start: Option<u32>,
    ) -> Result<Outcome<PagedResult<PermissionGrant>>> {
        self.list_permissions(GranteeKind::Users, query, limit, start)
            .await
    }

    /// Lists groups holding a permission on a project or repository.
    pub async fn list_group_permissions(
        &self,
        query: &PermissionQuery<'_>,
        limit: Option<u32>,
        start: Option<u32>,
    ) -> Result<Outcome<PagedResult<PermissionGrant>>> {
        self.list_permissions(GranteeKind::Groups, query, limit, start)
            .await
    }

    async fn list_permissions(
        &self,
        kind: GranteeKind,
        query: &PermissionQuery<'_>,
        limit: Option<u32>,
        start: Option<u32>,
    ) -> Result<Outcome<PagedResult<PermissionGrant>>> {
        require_owner(query.user, query.project, "permission listing")?;
        let mut target = Endpoint::owned_by(query.user, query.project);
        if let Some(repository) = query.repository {
            target = target.repository(repository);
        }
        let target = target.segment(PERMISSIONS).segment(kind.segment());

        let params: QueryParams = match query.filter {
            Some(filter) => query_params([("filter", filter.to_string())]),
            None => Vec::new(),
        };
        self.get_paged(&target, &params, Some(decode_permission), limit, start)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_user_grant() {
        let grant = decode_permission(&json!({
            "user": {"name": "bob", "displayName": "Bob"},
            "permission": "PROJECT_WRITE"
        }))
        .unwrap();
        assert_eq!(grant.grantee.kind(), "user");
        assert_eq!(grant.grantee.name(), "bob");
        assert_eq!(grant.permission, "PROJECT_WRITE");
    }

    #[test]
    fn test_decode_group_grant() {
        let grant = decode_permission(&json!({
            "group": {"name": "developers"},
            "permission": "REPO_READ"
        }))
        .unwrap();
        assert_eq!(grant.grantee, Grantee::Group(Group { name: "developers".to_string() }));
    }

    #[test]
    fn test_decode_without_grantee_is_malformed() {
        let err = decode_permission(&json!({"permission": "REPO_READ"})).unwrap_err();
        assert!(matches!(err, StashError::MalformedResponse(_)));
    }

    #[test]
    fn test_grant_serializes_with_grantee_type() {
        let grant = PermissionGrant {
            grantee: Grantee::Group(Group { name: "ops".to_string() }),
            permission: "PROJECT_ADMIN".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&grant).unwrap(),
            json!({"type": "group", "grantee": {"name": "ops"}, "permission": "PROJECT_ADMIN"})
        );
    }
}
