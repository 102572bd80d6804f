// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Cell set to rows
//!
//! One row per cell, in cell order. Each axis contributes one labelled
//! column: the dimension name, `Dimension_<index>` for unnamed axes, or
//! `Measures` for the measures axis. Cells map their coordinates through the
//! axis position tables; coordinates past the end of an axis (or pointing at
//! positions with no label data) become `Position_<coordinate>` rather than
//! an error. An axis named `value` or `support` gets its index appended
//! (`value_0`) so it cannot shadow the cell columns.
//!
//! When a metric id is known and no axis produced a `Measures` column, a
//! `Measures` column holding the metric id is prepended to every row.

use indexmap::{IndexMap, IndexSet};

use crate::error::UpstreamError;
use crate::model::{AxisKind, CellSet};
use crate::table::{Field, Table};
use crate::{MEASURES_COLUMN, SUPPORT_COLUMN, VALUE_COLUMN};

/// One flattened cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// Axis column name to position label, in column order
    pub labels: IndexMap<String, String>,
    pub value: Option<f64>,
    pub support: Option<i64>,
}

impl Row {
    pub fn label(&self, column: &str) -> Option<&str> {
        self.labels.get(column).map(String::as_str)
    }
}

/// Flattened rows plus the column layout they share
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    label_columns: IndexSet<String>,
    rows: Vec<Row>,
    has_support: bool,
}

impl Flattened {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_support(&self) -> bool {
        self.has_support
    }

    /// Full column list: labels, then `value`, then `support` if reported.
    /// Empty when there are no rows.
    pub fn columns(&self) -> Vec<String> {
        if self.rows.is_empty() {
            return Vec::new();
        }
        let mut columns: Vec<String> = self.label_columns.iter().cloned().collect();
        columns.push(VALUE_COLUMN.to_string());
        if self.has_support {
            columns.push(SUPPORT_COLUMN.to_string());
        }
        columns
    }

    /// Materialise as a table; labels a row lacks become [`Field::Missing`]
    pub fn into_table(self) -> Table {
        let mut table = Table::new(self.columns());
        let has_support = self.has_support;
        for row in self.rows {
            let mut fields: Vec<Field> = self
                .label_columns
                .iter()
                .map(|column| row.labels.get(column).map_or(Field::Missing, |l| Field::Text(l.clone())))
                .collect();
            fields.push(row.value.map_or(Field::Missing, Field::Number));
            if has_support {
                fields.push(row.support.map_or(Field::Missing, Field::Integer));
            }
            table.push_row(fields);
        }
        table
    }

    /// Prepend a `Measures` column set to `metric_id` on every row
    fn insert_measures(&mut self, metric_id: &str) {
        self.label_columns.shift_insert(0, MEASURES_COLUMN.to_string());
        for row in &mut self.rows {
            row.labels
                .shift_insert(0, MEASURES_COLUMN.to_string(), metric_id.to_string());
        }
    }
}

/// Axis column name, suffixed with the axis index when it would shadow the
/// `value` or `support` column
fn label_column(name: String, index: usize) -> String {
    if name == VALUE_COLUMN || name == SUPPORT_COLUMN {
        format!("{}_{}", name, index)
    } else {
        name
    }
}

/// Flatten a cell set into rows.
///
/// `metric_id` is the metric the caller queried, if known; otherwise the
/// metric echoed in the response (if any) is used. The only failure is an
/// error object carried by the response itself.
pub fn flatten(cell_set: &CellSet, metric_id: Option<&str>) -> Result<Flattened, UpstreamError> {
    if let Some(error) = &cell_set.error {
        return Err(error.clone());
    }
    if cell_set.cells.is_empty() {
        return Ok(Flattened::default());
    }

    let metric_id = metric_id
        .filter(|id| !id.is_empty())
        .or(cell_set.source_metric.as_deref());

    let columns: Vec<String> = cell_set
        .axes
        .iter()
        .enumerate()
        .map(|(index, axis)| label_column(axis.column_name(index), index))
        .collect();

    let mut placeholders = 0usize;
    let rows = cell_set
        .cells
        .iter()
        .map(|cell| {
            let mut labels = IndexMap::with_capacity(columns.len() + 1);
            // Coordinates past the last axis are ignored
            for ((axis, column), &coordinate) in cell_set.axes.iter().zip(&columns).zip(&cell.coordinates) {
                let label = match (&axis.kind, metric_id) {
                    (AxisKind::Measures, Some(id)) => id.to_string(),
                    _ => {
                        let in_range = usize::try_from(coordinate)
                            .ok()
                            .and_then(|idx| axis.positions.get(idx))
                            .is_some_and(|p| p.label.is_some());
                        if !in_range {
                            placeholders += 1;
                        }
                        axis.label(coordinate)
                    }
                };
                labels.insert(column.clone(), label);
            }
            Row {
                labels,
                value: cell.value,
                support: cell.support,
            }
        })
        .collect::<Vec<_>>();

    if placeholders > 0 {
        tracing::debug!(placeholders, "substituted placeholder labels for unresolved coordinates");
    }

    let mut flattened = Flattened {
        label_columns: columns.into_iter().collect(),
        rows,
        has_support: cell_set.reports_support,
    };

    if let Some(id) = metric_id
        && !flattened.label_columns.contains(MEASURES_COLUMN)
    {
        flattened.insert_measures(id);
    }

    tracing::debug!(
        rows = flattened.len(),
        axes = cell_set.axes.len(),
        "flattened cell set"
    );

    Ok(flattened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodeOptions;
    use crate::model::{Axis, Cell, Position};
    use pretty_assertions::assert_eq;

    fn cell(coordinates: &[i64], value: Option<f64>) -> Cell {
        Cell {
            coordinates: coordinates.to_vec(),
            value,
            support: None,
        }
    }

    fn labels(row: &Row) -> Vec<(&str, &str)> {
        row.labels.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    fn function_axis() -> Axis {
        Axis::dimension(
            "Function",
            vec![Position::new("Engineering"), Position::new("Sales")],
        )
    }

    #[test]
    fn test_single_axis_lookup() {
        let cell_set = CellSet::from_json(
            r#"{"axes": [{"dimension": {"name": "Function"},
                          "positions": [{"path": ["Engineering"]}, {"path": ["Sales"]}]}],
                "cells": [{"coordinates": [1], "value": "42"}]}"#,
            &DecodeOptions::default(),
        )
        .unwrap();

        let flattened = flatten(&cell_set, None).unwrap();
        assert_eq!(flattened.len(), 1);
        let row = &flattened.rows()[0];
        assert_eq!(labels(row), vec![("Function", "Sales")]);
        assert_eq!(row.value, Some(42.0));
        assert_eq!(flattened.columns(), vec!["Function", "value"]);
    }

    #[test]
    fn test_rows_follow_cell_order() {
        let cell_set = CellSet::new(
            vec![function_axis()],
            vec![
                cell(&[1], Some(3.0)),
                cell(&[0], Some(1.0)),
                cell(&[1], Some(2.0)),
            ],
        );
        let flattened = flatten(&cell_set, None).unwrap();
        let values: Vec<Option<f64>> = flattened.rows().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![Some(3.0), Some(1.0), Some(2.0)]);
        let names: Vec<Option<&str>> = flattened.rows().iter().map(|r| r.label("Function")).collect();
        assert_eq!(names, vec![Some("Sales"), Some("Engineering"), Some("Sales")]);
    }

    #[test]
    fn test_empty_cells_give_empty_output() {
        let cell_set = CellSet::new(vec![function_axis()], vec![]);
        let flattened = flatten(&cell_set, Some("employeeCount")).unwrap();
        assert!(flattened.is_empty());
        assert!(flattened.columns().is_empty());
        assert!(flattened.into_table().is_empty());
    }

    #[test]
    fn test_no_axes_only_value() {
        let cell_set = CellSet::new(vec![], vec![cell(&[], Some(5.0)), cell(&[], None)]).with_support();
        let flattened = flatten(&cell_set, None).unwrap();
        assert_eq!(flattened.columns(), vec!["value", "support"]);
        assert!(flattened.rows()[0].labels.is_empty());
        assert_eq!(flattened.rows()[1].value, None);
    }

    #[test]
    fn test_out_of_range_coordinate_uses_placeholder() {
        let cell_set = CellSet::new(vec![function_axis()], vec![cell(&[5], Some(1.0))]);
        let flattened = flatten(&cell_set, None).unwrap();
        assert_eq!(flattened.rows()[0].label("Function"), Some("Position_5"));
    }

    #[test]
    fn test_unnamed_axes_get_generated_names() {
        let cell_set = CellSet::new(
            vec![
                function_axis(),
                Axis::unnamed(vec![Position::new("FY2024")]),
            ],
            vec![cell(&[0, 0], Some(1.0))],
        );
        let flattened = flatten(&cell_set, None).unwrap();
        assert_eq!(
            labels(&flattened.rows()[0]),
            vec![("Function", "Engineering"), ("Dimension_1", "FY2024")]
        );
    }

    #[test]
    fn test_metric_id_inserts_measures_first() {
        let cell_set = CellSet::new(
            vec![function_axis()],
            vec![cell(&[0], Some(10.0)), cell(&[1], Some(20.0))],
        );
        let flattened = flatten(&cell_set, Some("employeeCount")).unwrap();
        for row in flattened.rows() {
            assert_eq!(row.labels.get_index(0), Some((&"Measures".to_string(), &"employeeCount".to_string())));
        }
        assert_eq!(
            labels(&flattened.rows()[1]),
            vec![("Measures", "employeeCount"), ("Function", "Sales")]
        );
        assert_eq!(flattened.columns(), vec!["Measures", "Function", "value"]);
    }

    #[test]
    fn test_measures_axis_uses_metric_id() {
        let cell_set = CellSet::new(
            vec![
                function_axis(),
                Axis::measures(vec![Position::new("employeeCount_internal")]),
            ],
            vec![cell(&[0, 0], Some(10.0))],
        );
        let flattened = flatten(&cell_set, Some("employeeCount")).unwrap();
        assert_eq!(
            labels(&flattened.rows()[0]),
            vec![("Function", "Engineering"), ("Measures", "employeeCount")]
        );
        assert_eq!(flattened.columns(), vec!["Function", "Measures", "value"]);
    }

    #[test]
    fn test_measures_axis_falls_back_to_position_label() {
        let cell_set = CellSet::new(
            vec![Axis::measures(vec![Position::new("headcount"), Position::new("hires")])],
            vec![cell(&[0], Some(1.0)), cell(&[1], Some(2.0))],
        );
        let flattened = flatten(&cell_set, None).unwrap();
        let measures: Vec<Option<&str>> = flattened.rows().iter().map(|r| r.label("Measures")).collect();
        assert_eq!(measures, vec![Some("headcount"), Some("hires")]);
    }

    #[test]
    fn test_source_metric_is_used_when_none_supplied() {
        let mut cell_set = CellSet::new(vec![function_axis()], vec![cell(&[0], Some(1.0))]);
        cell_set.source_metric = Some("headcount".to_string());

        let flattened = flatten(&cell_set, None).unwrap();
        assert_eq!(flattened.rows()[0].label("Measures"), Some("headcount"));

        let flattened = flatten(&cell_set, Some("employeeCount")).unwrap();
        assert_eq!(flattened.rows()[0].label("Measures"), Some("employeeCount"));
    }

    #[test]
    fn test_upstream_error_produces_no_rows() {
        let cell_set = CellSet::from_json(
            r#"{"error": {"message": "bad query", "errorCode": "E1"}}"#,
            &DecodeOptions::default(),
        )
        .unwrap();
        let err = flatten(&cell_set, Some("employeeCount")).unwrap_err();
        assert_eq!(err.message, "bad query");
        assert_eq!(err.code.as_deref(), Some("E1"));
    }

    #[test]
    fn test_short_and_long_coordinates() {
        let cell_set = CellSet::new(
            vec![
                function_axis(),
                Axis::dimension("Gender", vec![Position::new("F")]),
            ],
            vec![cell(&[1], Some(1.0)), cell(&[0, 0, 3], Some(2.0))],
        );
        let flattened = flatten(&cell_set, None).unwrap();
        assert_eq!(labels(&flattened.rows()[0]), vec![("Function", "Sales")]);
        assert_eq!(
            labels(&flattened.rows()[1]),
            vec![("Function", "Engineering"), ("Gender", "F")]
        );

        let table = flattened.into_table();
        assert_eq!(table.columns(), ["Function", "Gender", "value"]);
        assert_eq!(
            table.rows()[0],
            vec![Field::Text("Sales".to_string()), Field::Missing, Field::Number(1.0)]
        );
    }

    #[test]
    fn test_support_column() {
        let cell_set = CellSet::new(
            vec![function_axis()],
            vec![
                Cell {
                    coordinates: vec![0],
                    value: Some(1.0),
                    support: Some(12),
                },
                cell(&[1], None),
            ],
        )
        .with_support();
        let table = flatten(&cell_set, None).unwrap().into_table();
        assert_eq!(table.columns(), ["Function", "value", "support"]);
        assert_eq!(
            table.rows(),
            [
                vec![
                    Field::Text("Engineering".to_string()),
                    Field::Number(1.0),
                    Field::Integer(12)
                ],
                vec![Field::Text("Sales".to_string()), Field::Missing, Field::Missing],
            ]
        );
    }

    #[test]
    fn test_reserved_axis_names_are_suffixed() {
        let cell_set = CellSet::new(
            vec![
                Axis::dimension("value", vec![Position::new("High")]),
                Axis::dimension("support", vec![Position::new("Tier 1")]),
            ],
            vec![Cell {
                coordinates: vec![0, 0],
                value: Some(2.0),
                support: Some(3),
            }],
        )
        .with_support();
        let table = flatten(&cell_set, None).unwrap().into_table();
        assert_eq!(table.columns(), ["value_0", "support_1", "value", "support"]);

        let records = serde_json::to_value(table.to_records()).unwrap();
        assert_eq!(
            records,
            serde_json::json!([{"value_0": "High", "support_1": "Tier 1", "value": 2.0, "support": 3}])
        );
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let cell_set = CellSet::new(
            vec![function_axis(), Axis::unnamed(vec![])],
            vec![cell(&[0, 2], Some(1.5)), cell(&[9, 0], None)],
        );
        let first = flatten(&cell_set, Some("m")).unwrap();
        let second = flatten(&cell_set, Some("m")).unwrap();
        assert_eq!(first, second);
    }
}
