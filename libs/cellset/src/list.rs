// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! List query responses to tables
//!
//! List queries return a header mapping column indexes (as strings) to
//! column names, and rows keyed by the same indexes. Columns come out in
//! numeric index order; row entries whose index is not in the header are
//! dropped.

use aggregate_api::ListResponse;
use serde_json::Value;

use crate::error::ListError;
use crate::table::{Field, Table};

pub fn list_response_to_table(response: &ListResponse) -> Result<Table, ListError> {
    if response.rows.is_empty() {
        return Err(ListError::NoRows);
    }

    let mut header: Vec<(u64, &str, &str)> = response
        .header
        .iter()
        .map(|(key, name)| {
            key.trim()
                .parse::<u64>()
                .map(|idx| (idx, key.as_str(), name.as_str()))
                .map_err(|_| ListError::InvalidColumnKey(key.clone()))
        })
        .collect::<Result<_, _>>()?;
    header.sort_by_key(|(idx, _, _)| *idx);

    let mut table = Table::new(header.iter().map(|(_, _, name)| *name));
    for row in &response.rows {
        table.push_row(
            header
                .iter()
                .map(|(_, key, _)| row.get(*key).map_or(Field::Missing, list_field))
                .collect(),
        );
    }

    tracing::debug!(rows = table.len(), columns = table.columns().len(), "converted list response");
    Ok(table)
}

fn list_field(value: &Value) -> Field {
    match value {
        Value::Null => Field::Missing,
        Value::String(s) => Field::Text(s.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Field::Integer(i),
            None => n.as_f64().map_or(Field::Missing, Field::Number),
        },
        other => Field::Text(other.to_string()),
    }
}
