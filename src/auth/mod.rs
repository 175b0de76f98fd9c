//
//  stash-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! The server is accessed with HTTP Basic authentication. Credentials are
//! resolved once per client, lazily: a [`CredentialSource::Prompt`] only asks
//! for the password when the first request is actually sent, so invalid usage
//! and dry runs never prompt. Credentials live in memory for the lifetime of
//! the client and are never written anywhere.
//!
//! ## Example
//!
//! ```rust
//! use stash_client::auth::{CredentialSource, Credentials};
//!
//! let source = CredentialSource::Provided(Credentials::new("bob", "secret"));
//! let credentials = source.resolve().unwrap();
//! assert_eq!(credentials.username, "bob");
//! ```

use std::fmt;

use reqwest::RequestBuilder;

use crate::api::common::{Result, StashError};
use crate::interactive::prompt_password;

/// Username and password for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Adds the `Authorization: Basic ...` header to a request.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where a client obtains its credentials from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Credentials known up front (library use, tests).
    Provided(Credentials),

    /// Known username; the password is asked for on the terminal.
    Prompt {
        /// The account to authenticate as.
        username: String,
    },
}

impl CredentialSource {
    /// Produces concrete credentials, prompting if needed.
    ///
    /// # Errors
    ///
    /// `Configuration` when the terminal prompt cannot be shown.
    pub fn resolve(&self) -> Result<Credentials> {
        match self {
            Self::Provided(credentials) => Ok(credentials.clone()),
            Self::Prompt { username } => {
                let password = prompt_password(&format!("Stash password for {}", username))
                    .map_err(|e| {
                        StashError::Configuration(format!("could not read password: {}", e))
                    })?;
                Ok(Credentials::new(username.clone(), password))
            }
        }
    }
}

/// Picks the account name for a session.
///
/// Order: explicit override, configured user, then the operating system
/// identity (`$USER`, falling back to `$USERNAME`).
///
/// # Errors
///
/// `Configuration` when none of those sources yields a name.
pub fn resolve_username(
    override_user: Option<&str>,
    configured_user: Option<&str>,
) -> Result<String> {
    if let Some(user) = override_user.or(configured_user) {
        return Ok(user.to_string());
    }

    ["USER", "USERNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .ok_or_else(|| {
            StashError::Configuration(
                "no user given and no operating system user identity found".to_string(),
            )
        })
}
