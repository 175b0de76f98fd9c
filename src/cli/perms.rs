//
//  stash-client
//  cli/perms.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Permission listing commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{GlobalOptions, OwnerArgs, PageArgs, Session};
use crate::api::common::Outcome;
use crate::api::server::permissions::PermissionQuery;

/// List user and group permissions
#[derive(Args, Debug)]
pub struct PermsCommand {
    #[command(subcommand)]
    pub command: PermsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PermsSubcommand {
    /// List users holding a permission
    Users(PermsArgs),

    /// List groups holding a permission
    Groups(PermsArgs),
}

#[derive(Args, Debug)]
pub struct PermsArgs {
    /// Only names matching this filter
    pub filter: Option<String>,

    #[command(flatten)]
    pub owner: OwnerArgs,

    /// Repository to list permissions of, instead of the project
    #[arg(long, short = 'r')]
    pub repo: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

impl PermsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::connect(global)?;
        let result = match &self.command {
            PermsSubcommand::Users(args) => list(&session, args, false).await,
            PermsSubcommand::Groups(args) => list(&session, args, true).await,
        };
        session.finish();
        result
    }
}

async fn list(session: &Session, args: &PermsArgs, groups: bool) -> Result<()> {
    let (user, project) = args.owner.resolve(&session.guess);
    let query = PermissionQuery {
        user: user.as_deref(),
        project: project.as_deref(),
        repository: args.repo.as_deref(),
        filter: args.filter.as_deref(),
    };

    let outcome = if groups {
        session
            .client
            .list_group_permissions(&query, args.page.limit, args.page.start)
            .await?
    } else {
        session
            .client
            .list_user_permissions(&query, args.page.limit, args.page.start)
            .await?
    };
    if let Outcome::Completed(grants) = outcome {
        let noun = if groups { "group grant" } else { "user grant" };
        session.writer.write_paged(&grants, noun)?;
    }
    Ok(())
}
