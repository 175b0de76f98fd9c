//
//  stash-client
//  cli/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository commands.
//!
//! - Listing repositories of a user, a project, or the whole server
//! - Creating repositories
//! - Forking repositories
//! - Deleting repositories, after confirmation

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{GlobalOptions, OwnerArgs, PageArgs, Session};
use crate::api::common::{Outcome, StashError};
use crate::api::server::repositories::{CreateRepositoryRequest, ForkRequest};
use crate::api::server::Repository;
use crate::interactive::prompt_confirm;
use crate::output::OutputFormat;

/// Manage repositories
#[derive(Args, Debug)]
pub struct RepoCommand {
    #[command(subcommand)]
    pub command: RepoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// List repositories
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a new repository
    Create(CreateArgs),

    /// Fork a repository
    Fork(ForkArgs),

    /// Delete a repository
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub owner: OwnerArgs,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Repository name
    pub name: String,

    #[command(flatten)]
    pub owner: OwnerArgs,

    /// Repository description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Make the repository public
    #[arg(long)]
    pub public: bool,

    /// Whether the repository may be forked (server default when omitted)
    #[arg(long, value_name = "BOOL")]
    pub forkable: Option<bool>,
}

#[derive(Args, Debug)]
pub struct ForkArgs {
    /// Repository to fork (defaults to the current clone's repository)
    pub repo: Option<String>,

    #[command(flatten)]
    pub owner: OwnerArgs,

    /// Name of the fork
    #[arg(long)]
    pub name: Option<String>,

    /// Project key to fork into (defaults to your personal project)
    #[arg(long)]
    pub into: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Repository to delete
    pub repo: String,

    #[command(flatten)]
    pub owner: OwnerArgs,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl RepoCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::connect(global)?;
        let result = match &self.command {
            RepoSubcommand::List(args) => list(&session, args).await,
            RepoSubcommand::Create(args) => create(&session, args).await,
            RepoSubcommand::Fork(args) => fork(&session, args).await,
            RepoSubcommand::Delete(args) => delete(&session, args).await,
        };
        session.finish();
        result
    }
}

async fn list(session: &Session, args: &ListArgs) -> Result<()> {
    let outcome = session
        .client
        .list_repositories(
            args.owner.user.as_deref(),
            args.owner.project.as_deref(),
            args.page.limit,
            args.page.start,
        )
        .await?;
    if let Outcome::Completed(repos) = outcome {
        session.writer.write_paged(&repos, "repository")?;
    }
    Ok(())
}

fn report_repository(session: &Session, verb: &str, repo: &Repository) -> Result<()> {
    if session.writer.format() == OutputFormat::Json {
        return session.writer.write(repo);
    }
    match repo.ssh_clone_url() {
        Ok(url) => session.writer.write_success(&format!(
            "Successfully {} repo {} with clone URL {}",
            verb,
            repo.name(),
            url
        )),
        Err(_) => session
            .writer
            .write_success(&format!("Successfully {} repo {}", verb, repo.name())),
    }
    Ok(())
}

async fn create(session: &Session, args: &CreateArgs) -> Result<()> {
    let (user, project) = args.owner.resolve(&session.guess);
    let mut request = CreateRepositoryRequest::new(&args.name);
    if let Some(description) = &args.description {
        request = request.with_description(description);
    }
    if args.public {
        request = request.with_public(true);
    }
    if let Some(forkable) = args.forkable {
        request = request.with_forkable(forkable);
    }

    let outcome = session
        .client
        .create_repository(user.as_deref(), project.as_deref(), &request)
        .await?;
    if let Outcome::Completed(repo) = outcome {
        report_repository(session, "created", &repo)?;
    }
    Ok(())
}

async fn fork(session: &Session, args: &ForkArgs) -> Result<()> {
    let (user, project) = args.owner.resolve(&session.guess);
    let Some(repo) = args
        .repo
        .clone()
        .or_else(|| session.guess.repository().map(str::to_string))
    else {
        return Err(StashError::InvalidUsage(
            "no repository given and none found in the local git remote".to_string(),
        )
        .into());
    };

    let mut request = ForkRequest::new();
    if let Some(name) = &args.name {
        request = request.named(name);
    }
    if let Some(key) = &args.into {
        request = request.into_project(key);
    }

    let outcome = session
        .client
        .fork_repository(&repo, user.as_deref(), project.as_deref(), &request)
        .await?;
    if let Outcome::Completed(fork) = outcome {
        report_repository(session, "forked", &fork)?;
    }
    Ok(())
}

async fn delete(session: &Session, args: &DeleteArgs) -> Result<()> {
    let (user, project) = args.owner.resolve(&session.guess);
    let owner = user
        .as_deref()
        .map(|u| format!("~{}", u))
        .or_else(|| project.clone())
        .unwrap_or_default();

    let single_owner = user.is_some() != project.is_some();
    if single_owner && !args.yes && !session.client.is_dry_run() {
        let confirmed = prompt_confirm(
            &format!("Really delete repository {}/{}?", owner, args.repo),
            false,
        )?;
        if !confirmed {
            session.writer.write_warning("Deletion cancelled");
            return Ok(());
        }
    }

    let outcome = session
        .client
        .delete_repository(&args.repo, user.as_deref(), project.as_deref())
        .await?;
    if let Outcome::Completed(ack) = outcome {
        match &ack.message {
            Some(message) => session
                .writer
                .write_success(&format!("Deletion OK: {}", message)),
            None => session.writer.write_success(&format!(
                "Deletion attempt succeeded with status {}: {}",
                ack.status, ack.reason
            )),
        }
        if session.writer.format() == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&ack)?);
        }
    }
    Ok(())
}
