// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Response document to [`CellSet`]
//!
//! This is the only place that looks at the loose wire shapes. Everything
//! downstream works on the tagged model.

use aggregate_api::{AxisDto, CellDto, CellSetResponse, PositionDto, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::MEASURES_COLUMN;
use crate::error::{DecodeError, UpstreamError};
use crate::model::{Axis, AxisKind, Cell, CellSet, Position};
use crate::parse::{parse_count, parse_number, value_text};

/// How axes are classified while decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeOptions {
    /// Dimension names (case-insensitive) to treat as the measures axis, in
    /// addition to axes carrying a `measure` or `metric` marker
    #[serde(default = "default_measures_dimensions")]
    pub measures_dimensions: Vec<String>,
}

fn default_measures_dimensions() -> Vec<String> {
    vec![MEASURES_COLUMN.to_string()]
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            measures_dimensions: default_measures_dimensions(),
        }
    }
}

impl DecodeOptions {
    fn is_measures_name(&self, name: &str) -> bool {
        self.measures_dimensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(name))
    }
}

impl CellSet {
    /// Parse and decode a response document
    pub fn from_json(json: &str, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let response = CellSetResponse::from_json(json)?;
        Ok(Self::from_response(response, options))
    }

    /// Decode a parsed response document
    pub fn from_response(response: CellSetResponse, options: &DecodeOptions) -> Self {
        if let Some(error) = response.error {
            return CellSet::failed(upstream_error(error));
        }

        let source_metric = response
            .axes
            .iter()
            .find_map(|axis| text_marker(axis.measure.as_ref()).or_else(|| text_marker(axis.metric.as_ref())))
            .or_else(|| {
                response.source.as_ref().and_then(|source| {
                    text_marker(source.metric.as_ref()).or_else(|| text_marker(source.measure.as_ref()))
                })
            });

        let reports_support = response.cells.iter().any(|cell| cell.support.is_some());
        let axes = response.axes.into_iter().map(|axis| decode_axis(axis, options)).collect();
        let cells = response.cells.into_iter().map(decode_cell).collect();

        CellSet {
            axes,
            cells,
            reports_support,
            source_metric,
            error: None,
        }
    }
}

fn upstream_error(error: ResponseError) -> UpstreamError {
    UpstreamError {
        message: error.message.unwrap_or_else(|| "Unknown error".to_string()),
        code: error.error_code.filter(|code| !code.is_null()).map(|code| value_text(&code)),
    }
}

/// A non-empty string marker value
fn text_marker(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn decode_axis(axis: AxisDto, options: &DecodeOptions) -> Axis {
    let name = axis
        .dimension
        .and_then(|dimension| dimension.name)
        .filter(|name| !name.is_empty());

    let marked = axis.measure.is_some() || axis.metric.is_some();
    let kind = match name {
        _ if marked => AxisKind::Measures,
        Some(name) if options.is_measures_name(&name) => AxisKind::Measures,
        name => AxisKind::Dimension { name },
    };

    Axis {
        kind,
        positions: axis.positions.iter().map(decode_position).collect(),
    }
}

/// Label from the most specific path segment, else the first member
fn decode_position(position: &PositionDto) -> Position {
    if let Some(path) = &position.path {
        let label = match path {
            Value::Array(segments) => match segments.last() {
                Some(last) => value_text(last),
                None => value_text(path),
            },
            other => value_text(other),
        };
        return Position::new(label);
    }

    let label = position
        .members
        .first()
        .and_then(|member| member_text(member.name.as_ref()).or_else(|| member_text(member.member_id.as_ref())));
    Position { label }
}

/// Member name or id as text; null and empty strings count as absent
fn member_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(value_text(other)),
    }
}

fn decode_cell(cell: CellDto) -> Cell {
    Cell {
        value: parse_number(&cell.value),
        support: cell.support.as_ref().and_then(parse_count),
        coordinates: cell.coordinates,
    }
}
