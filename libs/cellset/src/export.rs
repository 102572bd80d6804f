// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Table output as CSV or JSON

use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::table::Table;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Write `table` in the given format
pub fn write_table<W: Write>(table: &Table, format: OutputFormat, writer: &mut W) -> Result<(), ExportError> {
    match format {
        OutputFormat::Csv => write_csv(table, writer),
        OutputFormat::Json => write_json(table, writer),
    }
}

/// Write a header line followed by one line per row.
///
/// Fields containing a comma, quote or line break are quoted with embedded
/// quotes doubled. A table with no columns writes nothing.
pub fn write_csv<W: Write>(table: &Table, writer: &mut W) -> Result<(), ExportError> {
    if table.columns().is_empty() {
        return Ok(());
    }

    let mut out = String::new();
    push_record(&mut out, table.columns().iter().map(String::as_str));
    for row in table.rows() {
        let fields: Vec<String> = row.iter().map(ToString::to_string).collect();
        push_record(&mut out, fields.iter().map(String::as_str));
    }

    writer.write_all(out.as_bytes())?;
    Ok(())
}

/// Write the rows as a JSON array of objects keyed by column name
pub fn write_json<W: Write>(table: &Table, writer: &mut W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut *writer, &table.to_records())?;
    writeln!(writer)?;
    Ok(())
}

fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
    } else {
        out.push_str(field);
    }
}
