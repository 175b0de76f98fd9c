//
//  stash-client
//  cli/pr.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull request commands.
//!
//! Inside a clone, the repository and its owner come from the git remote
//! and the source branch from the checked out branch, so
//!
//! ```text
//! stash pr create --reviewer alice
//! ```
//!
//! opens a pull request from the current branch into `master`.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{GlobalOptions, OwnerArgs, PageArgs, Session};
use crate::api::common::{Outcome, StashError};
use crate::api::server::{PullRequestDraft, PullRequestState};
use crate::output::OutputFormat;

/// Manage pull requests
#[derive(Args, Debug)]
pub struct PrCommand {
    #[command(subcommand)]
    pub command: PrSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PrSubcommand {
    /// List pull requests
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a pull request
    Create(CreateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Repository (defaults to the current clone's repository)
    #[arg(long, short = 'r')]
    pub repo: Option<String>,

    #[command(flatten)]
    pub owner: OwnerArgs,

    /// Only pull requests in this state: open, declined or merged
    #[arg(long, short = 's')]
    pub state: Option<PullRequestState>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Repository (defaults to the current clone's repository)
    #[arg(long, short = 'r')]
    pub repo: Option<String>,

    #[command(flatten)]
    pub owner: OwnerArgs,

    /// Source branch (defaults to the checked out branch)
    #[arg(long, short = 'S')]
    pub source: Option<String>,

    /// Destination branch
    #[arg(long, short = 'B', default_value = crate::api::server::pullrequests::DEFAULT_DESTINATION)]
    pub destination: String,

    /// Title (defaults to the source branch name, made readable)
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Reviewer login name (repeatable)
    #[arg(long = "reviewer", short = 'R')]
    pub reviewers: Vec<String>,

    /// Project key of the fork holding the source branch, e.g. ~BOB
    #[arg(long)]
    pub fork_owner: Option<String>,
}

impl PrCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::connect(global)?;
        let result = match &self.command {
            PrSubcommand::List(args) => list(&session, args).await,
            PrSubcommand::Create(args) => create(&session, args).await,
        };
        session.finish();
        result
    }
}

fn repository(session: &Session, explicit: &Option<String>) -> Result<String> {
    explicit
        .clone()
        .or_else(|| session.guess.repository().map(str::to_string))
        .ok_or_else(|| {
            StashError::InvalidUsage(
                "pull requests need a repository name; pass --repo or run inside a clone"
                    .to_string(),
            )
            .into()
        })
}

async fn list(session: &Session, args: &ListArgs) -> Result<()> {
    let repo = repository(session, &args.repo)?;
    let (user, project) = args.owner.resolve(&session.guess);

    let outcome = session
        .client
        .list_pull_requests(
            &repo,
            user.as_deref(),
            project.as_deref(),
            args.state,
            args.page.limit,
            args.page.start,
        )
        .await?;
    if let Outcome::Completed(pull_requests) = outcome {
        session.writer.write_paged(&pull_requests, "pull request")?;
    }
    Ok(())
}

async fn create(session: &Session, args: &CreateArgs) -> Result<()> {
    let repo = repository(session, &args.repo)?;
    let (user, project) = args.owner.resolve(&session.guess);
    let Some(source) = args.source.clone().or_else(|| session.guess.branch.clone()) else {
        return Err(StashError::InvalidUsage(
            "no source branch given and no branch checked out".to_string(),
        )
        .into());
    };

    let mut draft = PullRequestDraft::new(repo, source)
        .destination(&args.destination)
        .reviewers(&args.reviewers);
    if let Some(title) = &args.title {
        draft = draft.title(title);
    }
    if let Some(description) = &args.description {
        draft = draft.description(description);
    }
    if let Some(owner) = &args.fork_owner {
        draft = draft.fork_owner(owner);
    }

    let outcome = session
        .client
        .create_pull_request(user.as_deref(), project.as_deref(), &draft)
        .await?;
    if let Outcome::Completed(pull_request) = outcome {
        if session.writer.format() == OutputFormat::Json {
            return session.writer.write(&pull_request);
        }
        let id = pull_request.id.map(|id| id.to_string()).unwrap_or_default();
        session.writer.write_success(&format!(
            "Created pull request #{}: {}",
            id, pull_request.title
        ));
        if let Some(url) = &pull_request.web_url {
            session.writer.write_info(url);
        }
    }
    Ok(())
}
