// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Convert a list query response

use std::path::PathBuf;

use anyhow::{Context, Result};
use cellset::{DocumentSource, FileSource};
use clap::Args;

use crate::config::Config;
use crate::output::{self, OutputArgs};

#[derive(Args, Clone, Debug)]
pub struct ListArgs {
    /// Response document (use - for stdin)
    pub file: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn run(args: ListArgs, config: &Config) -> Result<()> {
    let source = FileSource::new(&args.file);
    let response = source
        .list()
        .with_context(|| format!("Failed to load list response from {}", source.describe()))?;
    let table = cellset::list_response_to_table(&response)?;

    output::write_table(
        &table,
        config.format(args.output.format),
        args.output.output.as_deref(),
    )
}
