// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Cell set flattening
//!
//! Aggregate queries answer with a *cell set*: an ordered list of axes, each
//! an ordered list of labelled positions, and a list of cells whose
//! coordinates index into those axes. This crate turns that shape into a
//! flat table with one row per cell and one column per axis, followed by
//! `value` and (when the response carries it) `support`.
//!
//! # Example
//!
//! ```
//! use cellset::{CellSet, DecodeOptions, flatten};
//!
//! let json = r#"{
//!     "axes": [{"dimension": {"name": "Function"},
//!               "positions": [{"path": ["Engineering"]}, {"path": ["Sales"]}]}],
//!     "cells": [{"coordinates": [1], "value": "42"}]
//! }"#;
//!
//! let cell_set = CellSet::from_json(json, &DecodeOptions::default())?;
//! let flattened = flatten(&cell_set, None)?;
//! assert_eq!(flattened.rows()[0].label("Function"), Some("Sales"));
//! assert_eq!(flattened.rows()[0].value, Some(42.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The flattener itself is pure and never fails on sparse input; the only
//! error it reports is an error object the platform attached to the
//! response.

pub mod decode;
pub mod error;
pub mod export;
pub mod flatten;
pub mod list;
pub mod merge;
pub mod model;
pub mod parse;
pub mod source;
pub mod table;

pub use decode::DecodeOptions;
pub use error::{DecodeError, ExportError, ListError, MergeError, UpstreamError};
pub use export::{OutputFormat, write_csv, write_json, write_table};
pub use flatten::{Flattened, Row, flatten};
pub use list::list_response_to_table;
pub use merge::merge_metric_tables;
pub use model::{Axis, AxisKind, Cell, CellSet, Position};
pub use parse::{parse_count, parse_number};
pub use source::{DocumentSource, FileSource};
pub use table::{Field, Table};

/// Column name used for the metric identifier
pub const MEASURES_COLUMN: &str = "Measures";

/// Column holding the cell value
pub const VALUE_COLUMN: &str = "value";

/// Column holding the cell support (sample size)
pub const SUPPORT_COLUMN: &str = "support";
