// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Column-ordered tables for export and merging

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// A single table value
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(String),
    Number(f64),
    Integer(i64),
    Missing,
}

impl Field {
    /// Join key form of the value; missing values (and NaN) key as `None`
    pub fn as_key(&self) -> Option<String> {
        match self {
            Field::Missing => None,
            Field::Number(n) if n.is_nan() => None,
            other => Some(other.to_string()),
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_string())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Text(value)
    }
}

impl From<Option<f64>> for Field {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Field::Missing, Field::Number)
    }
}

impl From<Option<i64>> for Field {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Field::Missing, Field::Integer)
    }
}

/// Text form used by CSV output. Missing values and NaN render empty; whole
/// floats keep a trailing `.0` so they stay distinguishable from counts.
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Text(s) => f.write_str(s),
            Field::Integer(n) => write!(f, "{}", n),
            Field::Number(n) if n.is_nan() => Ok(()),
            Field::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 => {
                write!(f, "{:.1}", n)
            }
            Field::Number(n) => write!(f, "{}", n),
            Field::Missing => Ok(()),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Text(s) => serializer.serialize_str(s),
            Field::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Field::Integer(n) => serializer.serialize_i64(*n),
            Field::Number(_) | Field::Missing => serializer.serialize_none(),
        }
    }
}

/// Rows of [`Field`]s under a fixed column list.
///
/// Every row has exactly one field per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Field>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Field>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, padding with [`Field::Missing`] or truncating to the
    /// column count
    pub fn push_row(&mut self, mut fields: Vec<Field>) {
        fields.resize(self.columns.len(), Field::Missing);
        self.rows.push(fields);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Field> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Rename a column in place. Returns false if `from` does not exist.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Rows as column-ordered records
    pub fn to_records(&self) -> Vec<IndexMap<&str, &Field>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter())
                    .collect()
            })
            .collect()
    }
}
