//
//  stash-client
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stash_client::cli::{report_error, writer_for, Cli, Commands};
use stash_client::exit_codes;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose);

    let writer = writer_for(&cli.global);
    let code = match run(cli).await {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => report_error(&e, &writer),
    };
    std::process::exit(code);
}

/// Initialize logging from STASH_DEBUG, or debug level with --verbose
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("STASH_DEBUG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Repo(cmd) => cmd.run(&cli.global).await,
        Commands::Pr(cmd) => cmd.run(&cli.global).await,
        Commands::Perms(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("stash version {}", stash_client::VERSION);
            Ok(())
        }
    }
}
