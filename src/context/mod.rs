//
//  stash-client
//  context/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Local Repository Context
//!
//! When a command is run inside a clone, the owner, repository and current
//! branch can be guessed from the local git metadata instead of being typed
//! out. Explicit command-line values always win over these guesses.
//!
//! ## Architecture
//!
//! - [`GitContext`]: Low-level git repository access
//! - [`parse_remote_url`]: Remote URL parsing
//! - [`LocalGuess`]: The combined guess for the working directory
//!
//! ## Example
//!
//! ```rust,no_run
//! use stash_client::context::LocalGuess;
//!
//! let guess = LocalGuess::discover("origin");
//! if let Some(target) = &guess.target {
//!     println!("Repository: {}", target.repository);
//! }
//! ```

mod git;
mod resolver;

pub use git::*;
pub use resolver::*;

use tracing::debug;

/// Owner and repository parsed from a remote URL.
///
/// Exactly one of `user` and `project` is set when the URL names an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub host: String,
    /// Owner of a personal repository (`~name` in the URL).
    pub user: Option<String>,
    /// Project key of a team repository.
    pub project: Option<String>,
    pub repository: String,
}

/// What the working directory suggests about the current repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalGuess {
    pub target: Option<RemoteTarget>,
    pub branch: Option<String>,
}

impl LocalGuess {
    /// Inspects the repository around the working directory.
    ///
    /// Never fails: outside a repository, or with an unparseable remote,
    /// the corresponding fields are simply `None`.
    pub fn discover(remote: &str) -> Self {
        let ctx = match GitContext::open() {
            Ok(ctx) => ctx,
            Err(e) => {
                debug!(error = %e, "Not inside a git repository");
                return Self::default();
            }
        };
        Self::from_context(&ctx, remote)
    }

    pub fn from_context(ctx: &GitContext, remote: &str) -> Self {
        let target = match ctx.remote_url(remote) {
            Ok(Some(url)) => {
                let target = parse_remote_url(&url);
                if target.is_none() {
                    debug!(remote, url = %url, "Remote URL not recognized");
                }
                target
            }
            Ok(None) => None,
            Err(e) => {
                debug!(remote, error = %e, "Could not read remote");
                None
            }
        };
        let branch = ctx.current_branch().ok().flatten();
        Self { target, branch }
    }

    pub fn user(&self) -> Option<&str> {
        self.target.as_ref().and_then(|t| t.user.as_deref())
    }

    pub fn project(&self) -> Option<&str> {
        self.target.as_ref().and_then(|t| t.project.as_deref())
    }

    pub fn repository(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.repository.as_str())
    }
}
