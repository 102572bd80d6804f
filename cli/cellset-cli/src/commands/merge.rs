// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Merge several single-metric responses into one table

use std::path::PathBuf;

use anyhow::Result;
use cellset::FileSource;
use clap::Args;

use crate::commands::flatten::flatten_source;
use crate::config::Config;
use crate::output::{self, OutputArgs};

#[derive(Args, Clone, Debug)]
pub struct MergeArgs {
    /// Metric responses as METRIC=FILE, in output column order
    #[arg(required = true, value_parser = parse_metric_input)]
    pub inputs: Vec<(String, PathBuf)>,

    /// Dimension name to treat as the measures axis (repeatable)
    #[arg(long = "measures-dimension")]
    pub measures_dimensions: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Parse a METRIC=FILE argument
pub fn parse_metric_input(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((metric, path)) if !metric.is_empty() && !path.is_empty() => {
            Ok((metric.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected METRIC=FILE, got '{}'", s)),
    }
}

pub fn run(args: MergeArgs, config: &Config) -> Result<()> {
    let total = args.inputs.len();
    let mut tables = Vec::with_capacity(total);

    for (i, (metric_id, path)) in args.inputs.into_iter().enumerate() {
        let source = FileSource::new(path);
        match flatten_source(&source, Some(&metric_id), &args.measures_dimensions, config) {
            Ok(table) => {
                tracing::debug!(metric = %metric_id, rows = table.len(), "flattened metric {}/{}", i + 1, total);
                tables.push((metric_id, table));
            }
            Err(e) => {
                eprintln!("Skipping {}: {:#}", metric_id, e);
            }
        }
    }

    let merged = cellset::merge_metric_tables(tables)?;
    output::write_table(
        &merged,
        config.format(args.output.format),
        args.output.output.as_deref(),
    )
}
