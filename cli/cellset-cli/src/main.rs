// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! cellset - flatten aggregate query results into CSV or JSON tables

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod output;

use config::Config;

#[derive(Parser)]
#[command(
    name = "cellset",
    version,
    about = "Flatten aggregate query results",
    long_about = "Turn multi-axis aggregate query responses into flat CSV or JSON tables"
)]
struct Cli {
    /// Configuration directory
    #[arg(long, global = true, env = "CELLSET_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten an aggregate query response
    Flatten(commands::flatten::FlattenArgs),

    /// Flatten several single-metric responses and join them on their dimensions
    Merge(commands::merge::MergeArgs),

    /// Convert a list query response
    List(commands::list::ListArgs),

    /// Build an aggregate query payload
    Query(commands::query::QueryArgs),
}

fn init_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter("cellset=debug")
            .with_writer(std::io::stderr)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_dir = config::config_dir(cli.config_dir.as_deref());
    let config = Config::load(&config_dir)?;

    match cli.command {
        Commands::Flatten(args) => commands::flatten::run(args, &config),
        Commands::Merge(args) => commands::merge::run(args, &config),
        Commands::List(args) => commands::list::run(args, &config),
        Commands::Query(args) => commands::query::run(args, &config),
    }
}
