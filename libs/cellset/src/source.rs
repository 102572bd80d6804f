// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Where response documents come from
//!
//! Fetching a response (HTTP, auth, paging) happens outside this crate. The
//! flattening pipeline only needs the raw document, so sources are kept
//! behind a small trait.

use std::io::Read;
use std::path::PathBuf;

use aggregate_api::ListResponse;

use crate::decode::DecodeOptions;
use crate::error::DecodeError;
use crate::model::CellSet;

/// Path that selects standard input
pub const STDIN_PATH: &str = "-";

/// Trait abstraction for anything that can hand over a response document.
pub trait DocumentSource: Send + Sync {
    /// Raw JSON text of the document
    fn read_document(&self) -> Result<String, DecodeError>;

    /// Human-readable origin for log and error messages
    fn describe(&self) -> String;

    fn cell_set(&self, options: &DecodeOptions) -> Result<CellSet, DecodeError> {
        let json = self.read_document()?;
        let cell_set = CellSet::from_json(&json, options)?;
        tracing::debug!(
            source = %self.describe(),
            axes = cell_set.axes.len(),
            cells = cell_set.cells.len(),
            "decoded cell set"
        );
        Ok(cell_set)
    }

    fn list(&self) -> Result<ListResponse, DecodeError> {
        let json = self.read_document()?;
        Ok(ListResponse::from_json(&json)?)
    }
}

/// A document on disk, or standard input for `-`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn is_stdin(&self) -> bool {
        self.path.as_os_str() == STDIN_PATH
    }
}

impl DocumentSource for FileSource {
    fn read_document(&self) -> Result<String, DecodeError> {
        let io_err = |source| DecodeError::Io {
            path: self.path.clone(),
            source,
        };

        if self.is_stdin() {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(io_err)?;
            return Ok(buf);
        }
        std::fs::read_to_string(&self.path).map_err(io_err)
    }

    fn describe(&self) -> String {
        if self.is_stdin() {
            "<stdin>".to_string()
        } else {
            self.path.display().to_string()
        }
    }
}
