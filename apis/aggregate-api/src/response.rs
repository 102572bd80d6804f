// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Query response documents
//!
//! These mirror the JSON returned by the platform as loosely as the platform
//! itself is loose: labels and values arrive as strings or numbers, many keys
//! are optional, and some keys are sent as explicit `null`. Interpretation is
//! left to the consumer (see the `cellset` crate).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keep an explicit `null` as `Some(Value::Null)`, so a present-but-empty key
/// can be told apart from an absent one.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// ============================================================================
// Aggregate (cell set) response
// ============================================================================

/// Error object attached to a failed query response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub message: Option<String>,
    /// Error code; usually a string, occasionally numeric
    #[serde(rename = "errorCode", default)]
    pub error_code: Option<Value>,
}

/// Metric the response was computed for, when the platform echoes it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSource {
    #[serde(default)]
    pub metric: Option<Value>,
    #[serde(default)]
    pub measure: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionDto {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberDto {
    /// Display name; usually a string, sometimes a number
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(rename = "memberId", default)]
    pub member_id: Option<Value>,
}

/// One position along an axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionDto {
    /// Hierarchy path of the member; normally an array of strings
    #[serde(default)]
    pub path: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<MemberDto>,
}

/// One axis of a cell set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisDto {
    #[serde(default)]
    pub dimension: Option<DimensionDto>,
    /// Marker present on the measures axis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure: Option<Value>,
    /// Alternative spelling of the measures marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub positions: Vec<PositionDto>,
}

/// One data point of a cell set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellDto {
    #[serde(default, deserialize_with = "null_as_default")]
    pub coordinates: Vec<i64>,
    /// Metric value as sent: string, number or null
    #[serde(default)]
    pub value: Value,
    /// `None` when the key is absent, `Some(Value::Null)` when sent as null
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub support: Option<Value>,
}

/// Aggregate query response (a "cell set")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellSetResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ResponseSource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub axes: Vec<AxisDto>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cells: Vec<CellDto>,
}

impl CellSetResponse {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// List response
// ============================================================================

/// List query response
///
/// Columns are addressed by stringified indexes: `header` maps `"0"`, `"1"`,
/// ... to column names and each row maps the same keys to values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub header: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: Vec<HashMap<String, Value>>,
}

impl ListResponse {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
