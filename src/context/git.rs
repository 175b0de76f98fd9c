//
//  stash-client
//  context/git.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Git Repository Operations
//!
//! Read-only access to the local repository via `git2`: the checked out
//! branch and the URL of a remote. Nothing here writes to the repository.

use std::path::Path;

use anyhow::Result;
use git2::Repository;

/// Handle on the git repository around the working directory.
///
/// # Example
///
/// ```rust,no_run
/// use stash_client::context::GitContext;
///
/// let ctx = GitContext::open()?;
/// if let Some(branch) = ctx.current_branch()? {
///     println!("Branch: {}", branch);
/// }
/// if let Some(url) = ctx.remote_url("origin")? {
///     println!("Origin: {}", url);
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct GitContext {
    repo: Repository,
}

impl GitContext {
    /// Discovers the repository containing the current directory, walking
    /// up the tree as git does.
    pub fn open() -> Result<Self> {
        let repo = Repository::discover(".")?;
        Ok(Self { repo })
    }

    /// Opens the repository rooted exactly at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let repo = Repository::open(path)?;
        Ok(Self { repo })
    }

    /// Short name of the checked out branch, `None` on a detached HEAD.
    ///
    /// # Errors
    ///
    /// Fails on an unborn repository (no commits yet).
    pub fn current_branch(&self) -> Result<Option<String>> {
        if self.repo.head_detached()? {
            return Ok(None);
        }
        let head = self.repo.head()?;
        Ok(head.shorthand().map(str::to_string))
    }

    /// Fetch URL of the remote `name`, `None` if there is no such remote.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(_) => Ok(None),
        }
    }
}
