//
//  stash-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Stash Client Library
//!
//! A client library and command-line tool for the REST API of a Stash
//! (Bitbucket Server) instance: repositories, pull requests and permissions.
//!
//! ## Overview
//!
//! The library wraps the server's REST API version 1.0. Every request goes
//! through one [`StashClient`] which owns the host, the basic-auth
//! credentials and the dry-run switch. Paged collections are walked to the
//! end and returned as one ordered result.
//!
//! ## Features
//!
//! - **Repositories**: Create, fork, delete and list
//! - **Pull Requests**: List by state and create, from a branch or a fork
//! - **Permissions**: List user and group grants on projects and repositories
//! - **Dry Run**: Capture requests instead of sending them
//! - **Local Context**: Guess owner, repository and branch from the git clone
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: REST transport, paginator, entities and operations
//! - [`auth`]: Basic-auth credentials and user identity
//! - [`config`]: Configuration file management
//! - [`context`]: Git repository context detection
//! - [`output`]: Output formatting (Table, JSON)
//! - [`interactive`]: Terminal prompts
//! - [`util`]: Utility functions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use stash_client::api::{Outcome, StashClient};
//! use stash_client::auth::{CredentialSource, Credentials};
//!
//! # async fn example() -> stash_client::api::common::Result<()> {
//! let client = StashClient::new(
//!     "stash.example.com",
//!     CredentialSource::Provided(Credentials::new("bob", "secret")),
//! )?;
//!
//! if let Outcome::Completed(prs) = client
//!     .list_pull_requests("tools", None, Some("TEAM"), None, None, None)
//!     .await?
//! {
//!     for pr in prs.entities() {
//!         println!("#{:?} {}", pr.id, pr.title);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Contains the clap command tree and the boundary error reporting that maps
/// library errors to messages and exit codes.
pub mod cli;

/// REST API client for the Stash server.
///
/// Handles URL construction, basic authentication, pagination, entity
/// decoding and error classification.
pub mod api;

/// Basic-auth credentials and user identity.
pub mod auth;

/// Configuration file management.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/stash/config.toml`
/// - macOS: `~/Library/Application Support/stash/config.toml`
/// - Windows: `%APPDATA%\stash\config\config.toml`
pub mod config;

/// Git repository context detection.
pub mod context;

/// Output formatting for tables and JSON.
pub mod output;

/// Interactive terminal prompts (password, confirmation).
pub mod interactive;

/// Utility functions and helpers.
pub mod util;

pub use api::StashClient;
pub use cli::Cli;
pub use config::Config;

/// Application name, used for the binary and the configuration directory.
pub const APP_NAME: &str = "stash";

/// Application version, from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// | Code | Meaning |
/// |------|---------|
/// | 0 | Success |
/// | 1 | General error |
/// | 2 | Invalid usage |
/// | 3 | Configuration error |
/// | 4 | Authentication failed (HTTP 401) |
/// | 8 | Not found (HTTP 404, missing clone URL) |
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    pub const USAGE: i32 = 2;

    /// Configuration incomplete: no host, or no user identity.
    pub const CONFIG: i32 = 3;

    /// The server rejected the credentials.
    pub const AUTH_ERROR: i32 = 4;

    /// The requested resource does not exist.
    pub const NOT_FOUND: i32 = 8;
}
