// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for cellset

use std::path::PathBuf;
use thiserror::Error;

/// Error object the platform attached to a query response.
///
/// When present, the response is not flattened at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Query failed: {message}{}",
    .code.as_ref().map(|code| format!(" (Code: {code})")).unwrap_or_default()
)]
pub struct UpstreamError {
    pub message: String,
    pub code: Option<String>,
}

/// Errors reading or parsing a response document
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Document could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON or does not match the response schema
    #[error("Invalid response document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors converting a list query response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("No data rows found in response")]
    NoRows,

    #[error("Invalid column key in header: '{0}' (expected a column index)")]
    InvalidColumnKey(String),
}

/// Errors combining per-metric tables
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("No metrics were successfully queried")]
    NoTables,
}

/// Errors writing a table
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown output format: '{0}' (expected csv or json)")]
    UnknownFormat(String),
}
