// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Typed cell set model

use crate::MEASURES_COLUMN;
use crate::error::UpstreamError;

/// What an axis groups by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisKind {
    /// The axis enumerates metrics rather than dimension members
    Measures,
    /// A dimension axis; unnamed axes get a generated column name
    Dimension { name: Option<String> },
}

/// One labelled position along an axis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Position {
    /// Display label, or `None` when the response carried no path or member
    pub label: Option<String>,
}

impl Position {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }

    pub fn unlabelled() -> Self {
        Self { label: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis {
    pub kind: AxisKind,
    pub positions: Vec<Position>,
}

impl Axis {
    pub fn dimension(name: impl Into<String>, positions: Vec<Position>) -> Self {
        Self {
            kind: AxisKind::Dimension {
                name: Some(name.into()),
            },
            positions,
        }
    }

    pub fn unnamed(positions: Vec<Position>) -> Self {
        Self {
            kind: AxisKind::Dimension { name: None },
            positions,
        }
    }

    pub fn measures(positions: Vec<Position>) -> Self {
        Self {
            kind: AxisKind::Measures,
            positions,
        }
    }

    pub fn is_measures(&self) -> bool {
        matches!(self.kind, AxisKind::Measures)
    }

    /// Column name for this axis at `index` in the axis list
    pub fn column_name(&self, index: usize) -> String {
        match &self.kind {
            AxisKind::Measures => MEASURES_COLUMN.to_string(),
            AxisKind::Dimension { name: Some(name) } => name.clone(),
            AxisKind::Dimension { name: None } => format!("Dimension_{}", index),
        }
    }

    /// Label of the position a coordinate points at.
    ///
    /// Coordinates that are out of range, or point at a position without
    /// label data, resolve to `Position_<coordinate>`.
    pub fn label(&self, coordinate: i64) -> String {
        usize::try_from(coordinate)
            .ok()
            .and_then(|idx| self.positions.get(idx))
            .and_then(|position| position.label.clone())
            .unwrap_or_else(|| format!("Position_{}", coordinate))
    }
}

/// One data point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// One index per axis
    pub coordinates: Vec<i64>,
    pub value: Option<f64>,
    pub support: Option<i64>,
}

/// A decoded aggregate response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellSet {
    pub axes: Vec<Axis>,
    pub cells: Vec<Cell>,
    /// True when any cell carried a support key, even as null
    pub reports_support: bool,
    /// Metric id the platform echoed back with the response
    pub source_metric: Option<String>,
    pub error: Option<UpstreamError>,
}

impl CellSet {
    pub fn new(axes: Vec<Axis>, cells: Vec<Cell>) -> Self {
        Self {
            axes,
            cells,
            ..Default::default()
        }
    }

    pub fn with_support(mut self) -> Self {
        self.reports_support = true;
        self
    }

    pub fn failed(error: UpstreamError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        assert_eq!(Axis::dimension("Function", vec![]).column_name(0), "Function");
        assert_eq!(Axis::unnamed(vec![]).column_name(2), "Dimension_2");
        assert_eq!(Axis::measures(vec![]).column_name(1), "Measures");
    }

    #[test]
    fn test_label_resolution() {
        let axis = Axis::dimension(
            "Function",
            vec![Position::new("Engineering"), Position::unlabelled()],
        );
        assert_eq!(axis.label(0), "Engineering");
        assert_eq!(axis.label(1), "Position_1");
        assert_eq!(axis.label(5), "Position_5");
        assert_eq!(axis.label(-1), "Position_-1");
    }
}
