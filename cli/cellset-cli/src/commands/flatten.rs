// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Flatten a single aggregate response

use std::path::PathBuf;

use anyhow::{Context, Result};
use cellset::{DocumentSource, FileSource, Table};
use clap::Args;

use crate::config::Config;
use crate::output::{self, OutputArgs};

#[derive(Args, Clone, Debug)]
pub struct FlattenArgs {
    /// Response document (use - for stdin)
    pub file: PathBuf,

    /// Metric id to record in the Measures column
    #[arg(short, long, env = "CELLSET_METRIC_ID")]
    pub metric_id: Option<String>,

    /// Dimension name to treat as the measures axis (repeatable)
    #[arg(long = "measures-dimension")]
    pub measures_dimensions: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Decode and flatten one response document
pub fn flatten_source(
    source: &dyn DocumentSource,
    metric_id: Option<&str>,
    measures_dimensions: &[String],
    config: &Config,
) -> Result<Table> {
    let options = config.decode_options(measures_dimensions);
    let cell_set = source
        .cell_set(&options)
        .with_context(|| format!("Failed to load response from {}", source.describe()))?;
    let flattened = cellset::flatten(&cell_set, metric_id)?;
    Ok(flattened.into_table())
}

pub fn run(args: FlattenArgs, config: &Config) -> Result<()> {
    let source = FileSource::new(&args.file);
    let metric_id = config.metric_id(args.metric_id);
    let table = flatten_source(&source, metric_id.as_deref(), &args.measures_dimensions, config)?;

    if table.is_empty() {
        tracing::debug!(source = %source.describe(), "response contained no cells");
    }

    output::write_table(
        &table,
        config.format(args.output.format),
        args.output.output.as_deref(),
    )
}
