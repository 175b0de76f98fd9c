//
//  stash-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod completion;
mod perms;
mod pr;
mod repo;

pub use completion::CompletionCommand;
pub use perms::PermsCommand;
pub use pr::PrCommand;
pub use repo::RepoCommand;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::api::common::StashError;
use crate::api::StashClient;
use crate::auth::{resolve_username, CredentialSource};
use crate::config::Config;
use crate::context::LocalGuess;
use crate::exit_codes;
use crate::output::{OutputFormat, OutputWriter};

/// stash - Work with a Stash server from the command line
#[derive(Parser, Debug)]
#[command(
    name = "stash",
    version,
    about = "Work with a Stash server from the command line",
    long_about = "stash manages repositories, pull requests and permissions on a Stash \
                  (Bitbucket Server) instance through its REST API.",
    propagate_version = true,
    after_help = "Use 'stash <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Server host name, overriding [server] hostname
    #[arg(long, global = true, env = "STASH_HOST")]
    pub host: Option<String>,

    /// Account to authenticate as instead of the local user
    #[arg(long = "override-user", short = 'U', global = true)]
    pub override_user: Option<String>,

    /// Configuration file to read
    #[arg(long, global = true, env = "STASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the requests that would be sent instead of sending them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log requests and responses
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Git remote used to guess the owner and repository
    #[arg(long, global = true, default_value = "origin")]
    pub remote: String,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage repositories
    #[command(visible_alias = "r")]
    Repo(RepoCommand),

    /// Manage pull requests
    Pr(PrCommand),

    /// List user and group permissions
    #[command(visible_alias = "permissions")]
    Perms(PermsCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}

/// User or project owning a repository.
///
/// When neither is given, the owner is guessed from the local git remote.
#[derive(Args, Debug, Clone, Default)]
pub struct OwnerArgs {
    /// User owning the repository (personal repositories)
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// Project key owning the repository
    #[arg(long, short = 'p', visible_alias = "organization", short_alias = 'o')]
    pub project: Option<String>,
}

impl OwnerArgs {
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.project.is_none()
    }

    /// Explicit owner if any was given, the local guess otherwise.
    pub fn resolve(&self, guess: &LocalGuess) -> (Option<String>, Option<String>) {
        if self.is_empty() {
            (
                guess.user().map(str::to_string),
                guess.project().map(str::to_string),
            )
        } else {
            (self.user.clone(), self.project.clone())
        }
    }
}

/// Paging parameters of list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page size requested from the server
    #[arg(long, short = 'L')]
    pub limit: Option<u32>,

    /// Offset of the first item
    #[arg(long)]
    pub start: Option<u32>,
}

/// Everything a command needs to talk to the server.
pub struct Session {
    pub client: StashClient,
    pub writer: OutputWriter,
    pub guess: LocalGuess,
}

impl Session {
    /// Reads the configuration and builds a client.
    ///
    /// The password is not asked for here; it is prompted on the first
    /// request that actually goes out.
    pub fn connect(global: &GlobalOptions) -> Result<Self> {
        let config = Config::load(global.config.as_deref())?;
        let host = config.hostname(global.host.as_deref())?;
        let username = resolve_username(
            global.override_user.as_deref(),
            config.server.user.as_deref(),
        )?;

        let client = StashClient::new(&host, CredentialSource::Prompt { username })?
            .with_scheme(config.server.scheme.clone())
            .with_api_version(config.server.api_version.clone())
            .with_dry_run(global.dry_run);

        Ok(Self {
            client,
            writer: writer_for(global),
            guess: LocalGuess::discover(&global.remote),
        })
    }

    /// Prints what dry-run mode captured.
    pub fn finish(&self) {
        if !self.client.is_dry_run() {
            return;
        }
        for request in self.client.recorded_requests() {
            self.writer
                .write_warning(&format!("dry run, not sent: {}", request));
        }
    }
}

pub fn writer_for(global: &GlobalOptions) -> OutputWriter {
    OutputWriter::new(if global.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    })
}

/// Prints a failed command's error and picks the process exit code.
///
/// Library errors get a one-line summary plus every structured message
/// the server sent.
pub fn report_error(err: &anyhow::Error, writer: &OutputWriter) -> i32 {
    let Some(stash_err) = err.downcast_ref::<StashError>() else {
        writer.write_error(&format!("{:#}", err));
        return exit_codes::ERROR;
    };

    match stash_err {
        StashError::InvalidUsage(_) => {
            writer.write_error(&format!("Input error: {}", stash_err));
            exit_codes::USAGE
        }
        StashError::ResponseFailure { status, .. } => {
            writer.write_error(&format!("Response unhappy: {}", stash_err));
            for api_error in stash_err.api_errors().unwrap_or_default() {
                writer.write_error(&format!("  {}", api_error));
            }
            match status {
                401 => exit_codes::AUTH_ERROR,
                404 => exit_codes::NOT_FOUND,
                _ => exit_codes::ERROR,
            }
        }
        StashError::NotFound(_) => {
            writer.write_error(&stash_err.to_string());
            exit_codes::NOT_FOUND
        }
        StashError::Configuration(_) => {
            writer.write_error(&stash_err.to_string());
            exit_codes::CONFIG
        }
        StashError::MalformedResponse(_) | StashError::Network(_) => {
            writer.write_error(&stash_err.to_string());
            exit_codes::ERROR
        }
    }
}
