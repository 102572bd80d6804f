// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Output destinations

pub mod json;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use cellset::{OutputFormat, Table};

/// Output flags shared by the table-producing commands
#[derive(Args, Clone, Debug)]
pub struct OutputArgs {
    /// Output format (csv or json)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Open the output file, or stdout when no path is given
pub fn open(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

/// Write a table and report where it went
pub fn write_table(table: &Table, format: OutputFormat, path: Option<&Path>) -> anyhow::Result<()> {
    let mut writer = open(path)?;
    cellset::write_table(table, format, &mut writer)?;
    writer.flush()?;

    if let Some(path) = path {
        eprintln!("Wrote {} rows to {}", table.len(), path.display());
    }
    Ok(())
}
