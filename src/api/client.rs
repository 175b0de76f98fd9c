//
//  stash-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Stash REST API
//!
//! This module provides [`StashClient`], the single object every API operation
//! goes through. It owns the HTTP connection pool, the target host, the lazily
//! resolved credentials and the dry-run switch.
//!
//! ## Features
//!
//! - Basic authentication with credentials resolved on first use
//! - JSON request bodies with a JSON content type
//! - Classification of non-2xx statuses as [`StashError::ResponseFailure`]
//! - Offset-based pagination over the server's paged envelope
//! - Dry-run capture of requests instead of sending them
//!
//! Requests are issued one at a time; a paged walk requests page N+1 only
//! after page N has been decoded. There are no retries.

use std::fmt;
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::common::{Decoder, Outcome, Page, PagedResult, Result, StashError};
use super::endpoint::{api_root, Endpoint};
use crate::auth::{CredentialSource, Credentials};

/// Query parameters attached to a request, in order.
pub type QueryParams = Vec<(String, String)>;

/// The HTTP methods the server API is used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Whether the method carries a JSON body.
    pub fn requires_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    fn as_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A request captured in dry-run mode instead of being sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: QueryParams,
    pub body: Option<Value>,
}

impl fmt::Display for RecordedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)?;
        if !self.query.is_empty() {
            let query: Vec<String> = self
                .query
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            write!(f, "?{}", query.join("&"))?;
        }
        if let Some(body) = &self.body {
            write!(f, " {}", body)?;
        }
        Ok(())
    }
}

/// A successful response, fully read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    /// Parses the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// `MalformedResponse` when the body does not have the expected shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| StashError::MalformedResponse(format!("invalid JSON body: {}", e)))
    }

    /// Whether the server sent any body text.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

/// The main client for the Stash REST API.
///
/// # Example
///
/// ```rust,no_run
/// use stash_client::api::StashClient;
/// use stash_client::auth::{CredentialSource, Credentials};
///
/// # async fn example() -> stash_client::api::common::Result<()> {
/// let client = StashClient::new(
///     "stash.example.com",
///     CredentialSource::Provided(Credentials::new("bob", "secret")),
/// )?;
/// let repos = client.list_repositories(None, Some("TEAM"), None, None).await?;
/// if let Some(repos) = repos.completed() {
///     println!("{} repositories", repos.entity_count);
/// }
/// # Ok(())
/// # }
/// ```
pub struct StashClient {
    /// The underlying HTTP client
    http: Client,
    /// Host name, optionally with a port
    host: String,
    /// URL scheme, `https` unless configured otherwise
    scheme: String,
    /// REST API version segment
    api_version: String,
    /// Where credentials come from
    credential_source: CredentialSource,
    /// Credentials once resolved
    credentials: OnceCell<Credentials>,
    /// Capture requests instead of sending them
    dry_run: bool,
    /// Requests captured in dry-run mode
    recorded: Mutex<Vec<RecordedRequest>>,
}

impl StashClient {
    pub const DEFAULT_API_VERSION: &'static str = "1.0";

    /// Creates a client for `https://{host}/rest/api/1.0`.
    pub fn new(host: &str, credential_source: CredentialSource) -> Result<Self> {
        Ok(Self {
            http: Client::builder()
                .user_agent(format!("stash/{}", crate::VERSION))
                .build()?,
            host: host.to_string(),
            scheme: "https".to_string(),
            api_version: Self::DEFAULT_API_VERSION.to_string(),
            credential_source,
            credentials: OnceCell::new(),
            dry_run: false,
            recorded: Mutex::new(Vec::new()),
        })
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the API root, e.g. `https://stash.example.com/rest/api/1.0`.
    pub fn base_url(&self) -> String {
        api_root(&self.scheme, &self.host, &self.api_version)
    }

    /// Requests captured so far in dry-run mode.
    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        match self.recorded.lock() {
            Ok(recorded) => recorded.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn credentials(&self) -> Result<&Credentials> {
        self.credentials
            .get_or_try_init(|| self.credential_source.resolve())
    }

    fn record(&self, request: RecordedRequest) {
        info!(request = %request, "Dry run, request not sent");
        match self.recorded.lock() {
            Ok(mut recorded) => recorded.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }
    }

    /// Sends one request and returns the fully read response.
    ///
    /// POST and PUT must be given a body; pass `json!({})` to send an empty
    /// object. In dry-run mode the request is recorded and `Outcome::DryRun`
    /// is returned without touching the network or the credentials.
    ///
    /// # Errors
    ///
    /// - `InvalidUsage` for a missing body or a user/project conflict
    /// - `ResponseFailure` for any non-2xx status, with the raw body
    /// - `Network` for transport failures
    pub async fn request(
        &self,
        method: HttpMethod,
        target: &Endpoint,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Outcome<HttpResponse>> {
        if method.requires_body() && body.is_none() {
            return Err(StashError::InvalidUsage(format!(
                "{} data is not actually allowed to be absent",
                method
            )));
        }
        let url = target.build(&self.base_url())?;

        if self.dry_run {
            self.record(RecordedRequest {
                method,
                url,
                query: query.to_vec(),
                body: body.cloned(),
            });
            return Ok(Outcome::DryRun);
        }

        let credentials = self.credentials()?;
        let mut request = credentials.apply_to_request(self.http.request(method.as_reqwest(), &url));
        if !query.is_empty() {
            request = request.query(query);
        }
        match body {
            Some(body) => {
                debug!(method = %method, url = %url, query = ?query, body = %body, "Sending request");
                request = request.json(body);
            }
            None => debug!(method = %method, url = %url, query = ?query, "Sending request"),
        }

        let response = request.send().await?;
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let text = response.text().await?;
        debug!(status = status.as_u16(), "Received response");

        if !status.is_success() {
            return Err(StashError::ResponseFailure {
                status: status.as_u16(),
                reason,
                body: text,
            });
        }

        Ok(Outcome::Completed(HttpResponse {
            status: status.as_u16(),
            reason,
            body: text,
        }))
    }

    pub async fn get(&self, target: &Endpoint, query: &[(String, String)]) -> Result<Outcome<HttpResponse>> {
        self.request(HttpMethod::Get, target, query, None).await
    }

    /// Serializes `body` to JSON and POSTs it.
    pub async fn post<B: Serialize>(&self, target: &Endpoint, body: &B) -> Result<Outcome<HttpResponse>> {
        let body = to_json(body)?;
        self.request(HttpMethod::Post, target, &[], Some(&body)).await
    }

    /// Serializes `body` to JSON and PUTs it.
    pub async fn put<B: Serialize>(&self, target: &Endpoint, body: &B) -> Result<Outcome<HttpResponse>> {
        let body = to_json(body)?;
        self.request(HttpMethod::Put, target, &[], Some(&body)).await
    }

    pub async fn delete(&self, target: &Endpoint) -> Result<Outcome<HttpResponse>> {
        self.request(HttpMethod::Delete, target, &[], None).await
    }

    /// Walks a paged collection until the server reports the last page.
    ///
    /// `query` seeds the request parameters; `limit` and `start` are added
    /// when given. Each following request replaces `start` with the previous
    /// page's `nextPageStart`. Entities are materialized only when a
    /// `decoder` is supplied.
    ///
    /// The walk ends only when the server sends `isLastPage: true`; there is
    /// no client-side page bound.
    pub async fn get_paged<E>(
        &self,
        target: &Endpoint,
        query: &[(String, String)],
        decoder: Option<Decoder<E>>,
        limit: Option<u32>,
        start: Option<u32>,
    ) -> Result<Outcome<PagedResult<E>>> {
        let mut params: QueryParams = query.to_vec();
        if let Some(limit) = limit {
            set_param(&mut params, "limit", limit.to_string());
        }
        if let Some(start) = start {
            set_param(&mut params, "start", start.to_string());
        }

        let mut pages: Vec<Page<E>> = Vec::new();
        loop {
            let response = match self.get(target, &params).await? {
                Outcome::Completed(response) => response,
                Outcome::DryRun => return Ok(Outcome::DryRun),
            };
            let page = Page::decode(response.json()?, decoder)?;
            let next_page_start = page.next_page_start;
            debug!(
                page = pages.len() + 1,
                values = page.values.len(),
                next_page_start = ?next_page_start,
                "Received page"
            );
            pages.push(page);

            match next_page_start {
                Some(next) => set_param(&mut params, "start", next.to_string()),
                None => break,
            }
        }

        Ok(Outcome::Completed(PagedResult::from_pages(pages)))
    }
}

fn to_json<B: Serialize>(body: &B) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|e| StashError::InvalidUsage(format!("request body is not serializable: {}", e)))
}

fn set_param(params: &mut QueryParams, key: &str, value: String) {
    match params.iter_mut().find(|(k, _)| k == key) {
        Some(existing) => existing.1 = value,
        None => params.push((key.to_string(), value)),
    }
}

/// Builds a parameter list from borrowed pairs.
pub fn query_params<'a, I>(pairs: I) -> QueryParams
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
