//
//  stash-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for Stash API Responses
//!
//! The server walks large collections with offset-based pagination. Each
//! request may carry `start` (offset) and `limit` (page size) query parameters
//! and every response is wrapped in an envelope:
//!
//! ```json
//! {
//!     "size": 3,
//!     "limit": 3,
//!     "isLastPage": false,
//!     "values": [{}, {}, {}],
//!     "start": 0,
//!     "filter": null,
//!     "nextPageStart": 3
//! }
//! ```
//!
//! [`Page`] is one decoded envelope and [`PagedResult`] the ordered
//! concatenation of every page fetched by the client's paginator.
//!
//! # Notes
//!
//! - `values` are kept as raw JSON regardless of whether a decoder is supplied
//! - `next_page_start` is present exactly when more pages remain

use serde::Deserialize;
use serde_json::Value;

use super::{Result, StashError};

/// Free function mapping one raw JSON value to a typed entity.
pub type Decoder<E> = fn(&Value) -> Result<E>;

/// Wire shape of a paged response from the server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerPaginatedResponse {
    /// Raw items in the current page.
    pub values: Vec<Value>,

    /// Number of items in the current page.
    #[serde(default)]
    pub size: Option<u32>,

    /// Page size the server applied.
    #[serde(default)]
    pub limit: Option<u32>,

    /// Whether this is the final page. Required: without it the walk
    /// could never terminate.
    #[serde(rename = "isLastPage")]
    pub is_last_page: bool,

    /// Offset of the following page.
    #[serde(default, rename = "nextPageStart")]
    pub next_page_start: Option<u32>,

    /// Offset of the current page.
    #[serde(default)]
    pub start: Option<u32>,
}

/// One decoded page of a paged resource.
#[derive(Debug, Clone)]
pub struct Page<E> {
    /// Raw items, in server order.
    pub values: Vec<Value>,

    /// Typed items, present iff a decoder was supplied.
    pub entities: Option<Vec<E>>,

    /// Whether the server reported this as the final page.
    pub is_last_page: bool,

    /// Offset of the following page; `None` iff `is_last_page`.
    pub next_page_start: Option<u32>,

    /// Offset of this page as reported by the server.
    pub start: Option<u32>,

    /// Page size as reported by the server.
    pub limit: Option<u32>,
}

impl<E> Page<E> {
    /// Decodes a page envelope, optionally materializing typed entities.
    ///
    /// A page that is not the last one must name its successor; when the
    /// server omits `nextPageStart` on such a page the response is malformed.
    /// On the last page `nextPageStart` is never read.
    pub fn decode(body: Value, decoder: Option<Decoder<E>>) -> Result<Self> {
        let envelope: ServerPaginatedResponse = serde_json::from_value(body)
            .map_err(|e| StashError::MalformedResponse(format!("invalid page envelope: {}", e)))?;

        let next_page_start = if envelope.is_last_page {
            None
        } else {
            Some(envelope.next_page_start.ok_or_else(|| {
                StashError::MalformedResponse(
                    "page is not the last page but carries no nextPageStart".to_string(),
                )
            })?)
        };

        let entities = match decoder {
            Some(decode) => Some(
                envelope
                    .values
                    .iter()
                    .map(decode)
                    .collect::<Result<Vec<E>>>()?,
            ),
            None => None,
        };

        Ok(Self {
            values: envelope.values,
            entities,
            is_last_page: envelope.is_last_page,
            next_page_start,
            start: envelope.start,
            limit: envelope.limit,
        })
    }
}

/// All pages of a paged resource, assembled in fetch order.
#[derive(Debug, Clone)]
pub struct PagedResult<E> {
    /// Raw values of every page, page order then intra-page order.
    pub values: Vec<Value>,

    /// Typed entities in the same order as `values`, iff decoding was requested.
    pub entities: Option<Vec<E>>,

    /// Number of pages fetched.
    pub page_count: usize,

    /// Total number of raw values, whether or not they were decoded.
    pub entity_count: usize,
}

impl<E> PagedResult<E> {
    /// Concatenates pages, preserving page order and intra-page order.
    pub fn from_pages(pages: Vec<Page<E>>) -> Self {
        let page_count = pages.len();
        let decoded = pages.iter().all(|page| page.entities.is_some()) && page_count > 0;

        let mut values = Vec::new();
        let mut entities = Vec::new();
        for page in pages {
            values.extend(page.values);
            if let Some(page_entities) = page.entities {
                entities.extend(page_entities);
            }
        }

        Self {
            entity_count: values.len(),
            values,
            entities: decoded.then_some(entities),
            page_count,
        }
    }

    /// Typed entities, or an empty slice when decoding was not requested.
    pub fn entities(&self) -> &[E] {
        self.entities.as_deref().unwrap_or(&[])
    }
}
