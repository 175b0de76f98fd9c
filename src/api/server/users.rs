//
//  stash-client
//  api/server/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Users, as they appear in pull requests and permission grants.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{malformed, NamedIdentity};
use crate::api::common::Result;

/// A user account on the server.
///
/// `identity.name` is the login name; `display_name` is what the web UI shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct User {
    #[serde(flatten)]
    pub identity: NamedIdentity,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Display name, falling back to the login name.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.identity.name)
    }
}

#[derive(Deserialize)]
struct RawUser {
    #[serde(flatten)]
    identity: NamedIdentity,
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
    #[serde(default, rename = "emailAddress")]
    email: Option<String>,
}

/// Decodes one user object.
pub fn decode_user(value: &Value) -> Result<User> {
    let raw = RawUser::deserialize(value).map_err(malformed("user"))?;
    Ok(User {
        identity: raw.identity,
        display_name: raw.display_name,
        email: raw.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_user() {
        let user = decode_user(&json!({
            "id": 101,
            "slug": "bob",
            "name": "bob",
            "displayName": "Bob Builder",
            "emailAddress": "bob@example.com",
            "active": true
        }))
        .unwrap();
        assert_eq!(user.identity.id, Some(101));
        assert_eq!(user.identity.slug, "bob");
        assert_eq!(user.name(), "bob");
        assert_eq!(user.label(), "Bob Builder");
        assert_eq!(user.email.as_deref(), Some("bob@example.com"));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let value = json!({"name": "alice", "displayName": "Alice"});
        assert_eq!(decode_user(&value).unwrap(), decode_user(&value).unwrap());
        assert_eq!(decode_user(&value).unwrap().label(), "Alice");
    }

    #[test]
    fn test_label_falls_back_to_name() {
        let user = decode_user(&json!({"name": "carol"})).unwrap();
        assert_eq!(user.label(), "carol");
        assert!(user.email.is_none());
    }
}
