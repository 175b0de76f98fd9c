//
//  stash-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client for the Stash REST API, version 1.0,
//! served at `https://{host}/rest/api/1.0`.
//!
//! ## Architecture
//!
//! - [`endpoint`]: URL construction for user- and project-scoped resources
//! - [`client`]: Authenticated transport, paginator and dry-run capture
//! - [`server`]: Typed entities and the operations returning them
//! - [`common`]: Error taxonomy, server error list, pagination types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stash_client::api::StashClient;
//! use stash_client::auth::CredentialSource;
//!
//! let client = StashClient::new(
//!     "stash.example.com",
//!     CredentialSource::Prompt { username: "bob".to_string() },
//! )
//! .expect("Failed to create client")
//! .with_dry_run(true);
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`StashError`]:
//!
//! - `InvalidUsage`: bad arguments, detected before any request
//! - `ResponseFailure`: non-2xx status, with the body kept for [`ApiError`] extraction
//! - `MalformedResponse`: a 2xx body of the wrong shape
//! - `NotFound`: a lookup on a decoded entity came up empty
//! - `Configuration`: no host or user identity
//! - `Network`: transport failure

/// Authenticated HTTP transport and paginator.
pub mod client;

/// Shared error, outcome and pagination types.
pub mod common;

/// REST URL builder.
pub mod endpoint;

/// Entities and operations of the server API.
pub mod server;

pub use client::{HttpMethod, RecordedRequest, StashClient};
pub use common::{ApiError, ErrorKind, Outcome, PagedResult, StashError};
pub use endpoint::Endpoint;
