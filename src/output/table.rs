//
//  stash-client
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Formatting
//!
//! Table rendering built on `comfy_table`, and the [`TableOutput`] rows of
//! each entity the CLI prints.
//!
//! ## Example
//!
//! ```rust,ignore
//! use stash_client::output::table::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(vec!["Name", "Clone URL"])
//!     .row(vec!["tools", "ssh://git@stash.example.com:7999/team/tools.git"])
//!     .print();
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use console::style;

use super::TableOutput;
use crate::api::server::{Grantee, PermissionGrant, PullRequest, Repository};
use crate::util::{format_relative_time, truncate};

/// Creates a table with UTF-8 borders that adapts to the terminal width.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Fluent builder around [`create_table`].
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the header row, cyan when color is enabled.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if self.color {
            let cells: Vec<Cell> = headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)).collect();
            self.table.set_header(cells);
        } else {
            self.table.set_header(headers);
        }
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    pub fn rows<I, R, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for row in rows {
            self = self.row(row);
        }
        self
    }

    pub fn print(self) {
        println!("{}", self.table);
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors a pull request state or permission name.
pub fn format_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    match status.to_uppercase().as_str() {
        "OPEN" => style(status).green().to_string(),
        "MERGED" => style(status).blue().to_string(),
        "DECLINED" => style(status).red().to_string(),
        s if s.ends_with("ADMIN") => style(status).magenta().to_string(),
        _ => status.to_string(),
    }
}

pub fn format_bool(value: bool, color: bool) -> String {
    match (value, color) {
        (true, true) => style("Yes").green().to_string(),
        (false, true) => style("No").dim().to_string(),
        (true, false) => "Yes".to_string(),
        (false, false) => "No".to_string(),
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

impl TableOutput for Repository {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Project", "Slug", "Name", "Public", "SSH clone URL"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.id().map(|id| id.to_string()).unwrap_or_default(),
            self.project.key().to_string(),
            self.slug().to_string(),
            self.name().to_string(),
            format_bool(self.is_public, color),
            or_dash(self.ssh_clone_url().ok()),
        ]
    }
}

impl TableOutput for PullRequest {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "State", "Title", "Author", "From", "To", "Approved", "Updated"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        let source = if self.is_local() {
            self.source.display_id.clone()
        } else {
            format!(
                "{}/{}:{}",
                self.source.repository.project.key(),
                self.source.repository.slug(),
                self.source.display_id
            )
        };
        vec![
            self.id.map(|id| id.to_string()).unwrap_or_default(),
            format_status(self.state.as_str(), color),
            truncate(&self.title, 50),
            self.author.label().to_string(),
            source,
            self.destination.display_id.clone(),
            format!("{}/{}", self.approved_by.len(), self.reviewers.len()),
            or_dash(
                self.updated
                    .or(self.created)
                    .map(|t| format_relative_time(&t, &chrono::Local::now()))
                    .as_deref(),
            ),
        ]
    }
}

impl TableOutput for PermissionGrant {
    fn headers() -> Vec<&'static str> {
        vec!["Type", "Name", "Display name", "Permission"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        let display_name = match &self.grantee {
            Grantee::User(user) => user.label().to_string(),
            Grantee::Group(group) => group.name.clone(),
        };
        vec![
            self.grantee.kind().to_string(),
            self.grantee.name().to_string(),
            display_name,
            format_status(&self.permission, color),
        ]
    }
}
