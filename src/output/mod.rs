//
//  stash-client
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Renders entities for the terminal in one of two formats:
//!
//! - **Table format**: Human-readable tables for interactive use
//! - **JSON format**: Machine-readable JSON for scripting
//!
//! Entities go to stdout. Diagnostics (errors, warnings, dry-run captures)
//! go to stderr, so stdout stays parseable in JSON mode.
//!
//! ## Example
//!
//! ```rust,ignore
//! use stash_client::output::{OutputFormat, OutputWriter};
//!
//! let writer = OutputWriter::new(OutputFormat::Table);
//! writer.write_paged(&repositories, "repository")?;
//! // prints the table, then "Retrieved 2 repositories in 1 page"
//! ```

mod table;

pub use table::*;

use console::{style, StyledObject};
use serde::Serialize;

use crate::api::common::PagedResult;
use crate::util::pluralize;

/// The available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tables with Unicode borders and optional color.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Kind of a one-line status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Error,
    Warning,
    Success,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Self::Error => "error:",
            Self::Warning => "warning:",
            Self::Success => "✓",
        }
    }

    fn styled(self) -> StyledObject<&'static str> {
        let label = style(self.label()).bold();
        match self {
            Self::Error => label.red(),
            Self::Warning => label.yellow(),
            Self::Success => label.green(),
        }
    }

    fn to_stderr(self) -> bool {
        self != Self::Success
    }
}

/// Writes entities and status messages in the selected format.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes a single entity: one JSON document, or `key: value` lines.
    pub fn write<T: Serialize + TableOutput>(&self, value: &T) -> anyhow::Result<()> {
        if self.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(value)?);
            return Ok(());
        }
        for (key, field) in T::headers().iter().zip(value.row(self.color)) {
            if self.color {
                println!("{}: {}", style(key).dim(), field);
            } else {
                println!("{}: {}", key, field);
            }
        }
        Ok(())
    }

    /// Writes a list of entities: a JSON array, or one table.
    ///
    /// An empty list prints no table at all.
    pub fn write_list<T: Serialize + TableOutput>(&self, values: &[T]) -> anyhow::Result<()> {
        if self.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(values)?);
        } else if !values.is_empty() {
            TableBuilder::new()
                .color(self.color)
                .headers(T::headers())
                .rows(values.iter().map(|value| value.row(self.color)))
                .print();
        }
        Ok(())
    }

    /// Writes every entity of a paged listing, then how many entities and
    /// pages were retrieved.
    pub fn write_paged<T>(&self, result: &PagedResult<T>, noun: &str) -> anyhow::Result<()>
    where
        T: Serialize + TableOutput,
    {
        self.write_list(result.entities())?;
        self.write_info(&format!(
            "Retrieved {} in {}",
            pluralize(result.entity_count, noun),
            pluralize(result.page_count, "page")
        ));
        Ok(())
    }

    pub fn write_error(&self, msg: &str) {
        self.status(Status::Error, msg);
    }

    pub fn write_warning(&self, msg: &str) {
        self.status(Status::Warning, msg);
    }

    /// Confirms a completed change. Silent in JSON mode.
    pub fn write_success(&self, msg: &str) {
        if self.format == OutputFormat::Table {
            self.status(Status::Success, msg);
        }
    }

    /// Plain informational line. Silent in JSON mode.
    pub fn write_info(&self, msg: &str) {
        if self.format == OutputFormat::Table {
            println!("{}", msg);
        }
    }

    fn status(&self, status: Status, msg: &str) {
        let line = if self.color {
            format!("{} {}", status.styled(), msg)
        } else {
            format!("{} {}", status.label(), msg)
        };
        if status.to_stderr() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Entities that render as table rows.
///
/// `row` must return one cell per header, in header order.
pub trait TableOutput {
    fn headers() -> Vec<&'static str>;

    fn row(&self, color: bool) -> Vec<String>;
}
