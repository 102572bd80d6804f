// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Combine per-metric tables into one wide table
//!
//! Each input is a flattened table for a single metric. Its `value` column is
//! renamed to the metric id and the tables are outer-joined on their shared
//! dimension columns (plus `DateInRange` when both sides have it). Columns
//! that appear on both sides without being join keys keep the left value.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::MergeError;
use crate::table::{Field, Table};
use crate::{MEASURES_COLUMN, SUPPORT_COLUMN, VALUE_COLUMN};

/// Column carrying the time bucket on time-axis queries
pub const DATE_COLUMN: &str = "DateInRange";

type JoinKey = Vec<Option<String>>;

/// Merge `(metric_id, table)` pairs in order.
///
/// The result's columns are the sorted dimension columns, then one column
/// per metric, then anything else (`Measures`, `DateInRange`, `support`).
pub fn merge_metric_tables(tables: Vec<(String, Table)>) -> Result<Table, MergeError> {
    if tables.is_empty() {
        return Err(MergeError::NoTables);
    }

    let metric_ids: Vec<String> = tables.iter().map(|(id, _)| id.clone()).collect();
    let tables: Vec<Table> = tables
        .into_iter()
        .map(|(id, mut table)| {
            table.rename_column(VALUE_COLUMN, &id);
            table
        })
        .filter(|table| !table.columns().is_empty())
        .collect();

    let mut dimensions: Vec<String> = tables
        .iter()
        .flat_map(|table| table.columns().iter())
        .filter(|column| !is_reserved(column, &metric_ids))
        .cloned()
        .collect();
    dimensions.sort();
    dimensions.dedup();

    let mut tables = tables.into_iter();
    let Some(mut combined) = tables.next() else {
        return Ok(Table::default());
    };

    for table in tables {
        let mut keys: Vec<String> = dimensions
            .iter()
            .filter(|d| combined.has_column(d) && table.has_column(d))
            .cloned()
            .collect();
        if combined.has_column(DATE_COLUMN) && table.has_column(DATE_COLUMN) {
            keys.push(DATE_COLUMN.to_string());
        }

        combined = if keys.is_empty() {
            tracing::debug!("no shared dimension columns, joining side by side");
            side_by_side(&combined, &table)
        } else {
            tracing::debug!(keys = ?keys, "outer-joining metric tables");
            outer_join(&combined, &table, &keys)
        };
    }

    Ok(reorder(combined, &dimensions, &metric_ids))
}

fn is_reserved(column: &str, metric_ids: &[String]) -> bool {
    column == MEASURES_COLUMN
        || column == DATE_COLUMN
        || column == SUPPORT_COLUMN
        || metric_ids.iter().any(|id| id == column)
}

fn key_of(row: &[Field], key_idx: &[usize]) -> JoinKey {
    key_idx.iter().map(|&i| row[i].as_key()).collect()
}

/// Lexicographic key order with missing values last
fn compare_keys(a: &JoinKey, b: &JoinKey) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = match (x, y) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn outer_join(left: &Table, right: &Table, keys: &[String]) -> Table {
    let left_keys: Vec<usize> = keys.iter().filter_map(|k| left.column_index(k)).collect();
    let right_keys: Vec<usize> = keys.iter().filter_map(|k| right.column_index(k)).collect();

    // Right-hand columns that are neither keys nor already on the left
    let extra: Vec<usize> = right
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| !left.has_column(c))
        .map(|(i, _)| i)
        .collect();

    let mut columns: Vec<String> = left.columns().to_vec();
    columns.extend(extra.iter().map(|&i| right.columns()[i].clone()));

    let mut by_key: HashMap<JoinKey, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows().iter().enumerate() {
        by_key.entry(key_of(row, &right_keys)).or_default().push(i);
    }

    let mut matched = vec![false; right.len()];
    let mut keyed: Vec<(JoinKey, Vec<Field>)> = Vec::new();

    for row in left.rows() {
        let key = key_of(row, &left_keys);
        match by_key.get(&key) {
            Some(hits) => {
                for &r in hits {
                    matched[r] = true;
                    let mut fields = row.clone();
                    fields.extend(extra.iter().map(|&i| right.rows()[r][i].clone()));
                    keyed.push((key.clone(), fields));
                }
            }
            None => {
                let mut fields = row.clone();
                fields.extend(extra.iter().map(|_| Field::Missing));
                keyed.push((key, fields));
            }
        }
    }

    for (r, row) in right.rows().iter().enumerate() {
        if matched[r] {
            continue;
        }
        let mut fields = vec![Field::Missing; left.columns().len()];
        for (&li, &ri) in left_keys.iter().zip(&right_keys) {
            fields[li] = row[ri].clone();
        }
        fields.extend(extra.iter().map(|&i| row[i].clone()));
        keyed.push((key_of(row, &right_keys), fields));
    }

    keyed.sort_by(|a, b| compare_keys(&a.0, &b.0));

    let mut table = Table::new(columns);
    for (_, fields) in keyed {
        table.push_row(fields);
    }
    table
}

/// Row-aligned concatenation; right columns already on the left are dropped
fn side_by_side(left: &Table, right: &Table) -> Table {
    let extra: Vec<usize> = right
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| !left.has_column(c))
        .map(|(i, _)| i)
        .collect();

    let mut columns: Vec<String> = left.columns().to_vec();
    columns.extend(extra.iter().map(|&i| right.columns()[i].clone()));

    let mut table = Table::new(columns);
    for i in 0..left.len().max(right.len()) {
        let mut fields = left
            .rows()
            .get(i)
            .cloned()
            .unwrap_or_else(|| vec![Field::Missing; left.columns().len()]);
        match right.rows().get(i) {
            Some(row) => fields.extend(extra.iter().map(|&c| row[c].clone())),
            None => fields.extend(extra.iter().map(|_| Field::Missing)),
        }
        table.push_row(fields);
    }
    table
}

fn reorder(table: Table, dimensions: &[String], metric_ids: &[String]) -> Table {
    let mut order: Vec<usize> = Vec::with_capacity(table.columns().len());
    order.extend(dimensions.iter().filter_map(|d| table.column_index(d)));
    for id in metric_ids {
        if let Some(idx) = table.column_index(id)
            && !order.contains(&idx)
        {
            order.push(idx);
        }
    }
    for idx in 0..table.columns().len() {
        if !order.contains(&idx) {
            order.push(idx);
        }
    }

    let mut out = Table::new(order.iter().map(|&i| table.columns()[i].clone()));
    for row in table.rows() {
        out.push_row(order.iter().map(|&i| row[i].clone()).collect());
    }
    out
}
