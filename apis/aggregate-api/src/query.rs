// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Aggregate query request payload
//!
//! Serialises to the document accepted by the aggregate endpoint:
//!
//! ```json
//! {
//!   "query": {
//!     "source": {"metric": "employeeCount"},
//!     "axes": [{"dimensionLevelSelection": {...}}],
//!     "filters": [...],
//!     "timeIntervals": {...}
//!   },
//!   "options": {...}
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building or loading a query payload
#[derive(Error, Debug)]
pub enum QueryError {
    /// Aggregate queries must group by at least one dimension
    #[error(
        "Aggregate queries require at least one axis (dimension). \
         Please provide at least one dimension."
    )]
    NoAxes,

    /// Fiscal year range runs backwards
    #[error("Invalid fiscal year range: {start}..{end}")]
    InvalidYearRange { start: i32, end: i32 },

    /// Unrecognised enumeration value (visibility, period type, ...)
    #[error("Invalid {kind}: '{value}'")]
    InvalidValue { kind: &'static str, value: String },

    /// Payload file could not be read
    #[error("Payload file not found or unreadable: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Payload file is not valid JSON
    #[error("Invalid payload JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// References
// ============================================================================

/// Reference to a dimension of an analytic object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRef {
    /// Dimension name (e.g., "Function", "Organization_Hierarchy")
    pub name: String,
    /// Qualifying path (e.g., "Employee"); omitted for dimensions such as Time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifying_path: Option<String>,
}

impl DimensionRef {
    pub fn new(name: impl Into<String>, qualifying_path: Option<String>) -> Self {
        Self {
            name: name.into(),
            qualifying_path,
        }
    }
}

/// Reference to a selection concept (e.g., "isManager")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionConceptRef {
    pub name: String,
    pub qualifying_path: String,
}

// ============================================================================
// Axes
// ============================================================================

/// Level selection for a grouping axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionLevelSelection {
    pub dimension: DimensionRef,
    pub level_ids: Vec<String>,
}

/// A grouping axis of an aggregate query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryAxis {
    DimensionLevelSelection(DimensionLevelSelection),
}

impl QueryAxis {
    /// Group by a dimension.
    ///
    /// For regular dimensions the level id is the dimension name itself, which
    /// is what `level_ids = None` selects. Parent-child dimensions (e.g.
    /// Organization_Hierarchy) need their actual level ids, such as
    /// `["Profit_Center"]`.
    pub fn dimension(
        name: impl Into<String>,
        qualifying_path: Option<String>,
        level_ids: Option<Vec<String>>,
    ) -> Self {
        let name = name.into();
        let level_ids = level_ids.unwrap_or_else(|| vec![name.clone()]);
        Self::DimensionLevelSelection(DimensionLevelSelection {
            dimension: DimensionRef::new(name, qualifying_path.filter(|p| !p.is_empty())),
            level_ids,
        })
    }

    /// Group by a time dimension at a given level (e.g. Time / FISCAL_YEAR).
    ///
    /// Time dimensions usually carry no qualifying path.
    pub fn time(
        dimension_name: impl Into<String>,
        level_id: impl Into<String>,
        qualifying_path: Option<String>,
    ) -> Self {
        Self::dimension(dimension_name, qualifying_path, Some(vec![level_id.into()]))
    }

    /// The `Time` / `FISCAL_YEAR` axis used for year-end breakdowns
    pub fn fiscal_year() -> Self {
        Self::time("Time", "FISCAL_YEAR", None)
    }

    pub fn dimension_name(&self) -> &str {
        match self {
            Self::DimensionLevelSelection(sel) => &sel.dimension.name,
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// One member addressed by its hierarchy path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPath {
    pub path: Vec<String>,
}

impl MemberPath {
    pub fn leaf(member: impl Into<String>) -> Self {
        Self {
            path: vec![member.into()],
        }
    }
}

/// Included/excluded members of a member set filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberValues {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<MemberPath>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<MemberPath>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSetFilter {
    pub dimension: DimensionRef,
    pub values: MemberValues,
}

/// A query filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryFilter {
    /// Restrict a dimension to (or away from) specific members
    MemberSet(MemberSetFilter),
    /// Restrict the population to a selection concept
    SelectionConcept(SelectionConceptRef),
}

impl QueryFilter {
    /// Build a member set filter; an empty `included` list means "all members"
    pub fn member_set<I, E>(
        dimension_name: impl Into<String>,
        included: I,
        excluded: E,
        qualifying_path: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self::MemberSet(MemberSetFilter {
            dimension: DimensionRef::new(dimension_name, Some(qualifying_path.into())),
            values: MemberValues {
                included: included.into_iter().map(MemberPath::leaf).collect(),
                excluded: excluded.into_iter().map(MemberPath::leaf).collect(),
            },
        })
    }

    pub fn selection_concept(name: impl Into<String>, qualifying_path: impl Into<String>) -> Self {
        Self::SelectionConcept(SelectionConceptRef {
            name: name.into(),
            qualifying_path: qualifying_path.into(),
        })
    }
}

// ============================================================================
// Time intervals
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Backward,
    Forward,
}

/// Anchor for intervals computed relative to the loaded data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DynamicDateFrom {
    Source,
    CompletePeriod,
}

/// Time window of an aggregate query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeIntervals {
    /// Explicit start date (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_date_from: Option<DynamicDateFrom>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_period_type: Option<PeriodType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl TimeIntervals {
    /// The last `months` monthly periods ending at the most recent data load
    pub fn trailing_months(months: u32) -> Self {
        Self {
            dynamic_date_from: Some(DynamicDateFrom::Source),
            interval_period_type: Some(PeriodType::Month),
            interval_count: Some(months),
            direction: Some(Direction::Backward),
            ..Default::default()
        }
    }

    /// Yearly periods from the start of `start_year` through `end_year`.
    ///
    /// Combined with a `Time` / `FISCAL_YEAR` axis this yields one year-end
    /// value per fiscal year. Tenants whose fiscal year does not start on
    /// January 1st need to adjust `from_date_time`.
    pub fn fiscal_years(start_year: i32, end_year: i32) -> Result<Self, QueryError> {
        if end_year < start_year {
            return Err(QueryError::InvalidYearRange {
                start: start_year,
                end: end_year,
            });
        }
        let count = u32::try_from(end_year - start_year + 1).map_err(|_| QueryError::InvalidYearRange {
            start: start_year,
            end: end_year,
        })?;
        Ok(Self {
            from_date_time: Some(format!("{start_year}-01-01")),
            interval_period_type: Some(PeriodType::Year),
            interval_count: Some(count),
            direction: Some(Direction::Forward),
            ..Default::default()
        })
    }
}

// ============================================================================
// Options
// ============================================================================

/// Handling of zero or null cells in the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Show,
    Hide,
    Eliminate,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Show => "SHOW",
            Visibility::Hide => "HIDE",
            Visibility::Eliminate => "ELIMINATE",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SHOW" => Ok(Visibility::Show),
            "HIDE" => Ok(Visibility::Hide),
            "ELIMINATE" => Ok(Visibility::Eliminate),
            _ => Err(QueryError::InvalidValue {
                kind: "visibility",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalendarType {
    TenantCalendar,
    GregorianCalendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberDisplayMode {
    Default,
    Compact,
    Display,
    Mdx,
    CompactDisplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxesOverallValueMode {
    None,
    Aggregate,
    Overall,
}

/// Query execution options; every field is omitted when unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_visibility: Option<Visibility>,
    /// Only return non-zero/non-null cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_sparse_results: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_type: Option<CalendarType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_display_mode: Option<MemberDisplayMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes_overall_value_mode: Option<AxesOverallValueMode>,
}

impl QueryOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Payload
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySource {
    pub metric: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBody {
    pub source: QuerySource,
    pub axes: Vec<QueryAxis>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<QueryFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_intervals: Option<TimeIntervals>,
    /// Values for parameterised metrics, passed through verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter_values: Vec<serde_json::Value>,
}

/// Complete aggregate query payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateQuery {
    pub query: QueryBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QueryOptions>,
}

impl AggregateQuery {
    pub fn builder(metric_id: impl Into<String>) -> AggregateQueryBuilder {
        AggregateQueryBuilder::new(metric_id)
    }

    pub fn metric_id(&self) -> &str {
        &self.query.source.metric
    }
}

/// Builder for [`AggregateQuery`]
#[derive(Debug, Clone)]
pub struct AggregateQueryBuilder {
    metric_id: String,
    axes: Vec<QueryAxis>,
    filters: Vec<QueryFilter>,
    time_intervals: Option<TimeIntervals>,
    parameter_values: Vec<serde_json::Value>,
    options: Option<QueryOptions>,
}

impl AggregateQueryBuilder {
    pub fn new(metric_id: impl Into<String>) -> Self {
        Self {
            metric_id: metric_id.into(),
            axes: Vec::new(),
            filters: Vec::new(),
            time_intervals: None,
            parameter_values: Vec::new(),
            options: None,
        }
    }

    pub fn axis(mut self, axis: QueryAxis) -> Self {
        self.axes.push(axis);
        self
    }

    pub fn axes(mut self, axes: impl IntoIterator<Item = QueryAxis>) -> Self {
        self.axes.extend(axes);
        self
    }

    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = QueryFilter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn time_intervals(mut self, intervals: TimeIntervals) -> Self {
        self.time_intervals = Some(intervals);
        self
    }

    pub fn parameter_value(mut self, value: serde_json::Value) -> Self {
        self.parameter_values.push(value);
        self
    }

    /// Set query options; an all-default options block is dropped
    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = (!options.is_empty()).then_some(options);
        self
    }

    pub fn build(self) -> Result<AggregateQuery, QueryError> {
        if self.axes.is_empty() {
            return Err(QueryError::NoAxes);
        }
        Ok(AggregateQuery {
            query: QueryBody {
                source: QuerySource {
                    metric: self.metric_id,
                },
                axes: self.axes,
                filters: self.filters,
                time_intervals: self.time_intervals,
                parameter_values: self.parameter_values,
            },
            options: self.options,
        })
    }
}

/// Load a stored query payload from a JSON file.
///
/// Saved request files often wrap the payload as `{"payload": {...}}`; in
/// that case the wrapped value is returned, otherwise the whole document.
pub fn load_query_payload(path: &Path) -> Result<serde_json::Value, QueryError> {
    let content = std::fs::read_to_string(path).map_err(|source| QueryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document: serde_json::Value = serde_json::from_str(&content)?;
    if let Some(payload) = document.as_object_mut().and_then(|obj| obj.remove("payload")) {
        return Ok(payload);
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_dimension_axis_defaults_level_to_name() {
        let axis = QueryAxis::dimension("Function", Some("Employee".to_string()), None);
        assert_eq!(
            serde_json::to_value(&axis).unwrap(),
            json!({
                "dimensionLevelSelection": {
                    "dimension": {"name": "Function", "qualifyingPath": "Employee"},
                    "levelIds": ["Function"]
                }
            })
        );
    }

    #[test]
    fn test_time_axis_omits_qualifying_path() {
        assert_eq!(
            serde_json::to_value(QueryAxis::fiscal_year()).unwrap(),
            json!({
                "dimensionLevelSelection": {
                    "dimension": {"name": "Time"},
                    "levelIds": ["FISCAL_YEAR"]
                }
            })
        );
    }

    #[test]
    fn test_member_set_filter_omits_empty_lists() {
        let filter = QueryFilter::member_set(
            "Function",
            ["Engineering", "Sales"],
            Vec::<String>::new(),
            "Employee",
        );
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "memberSet": {
                    "dimension": {"name": "Function", "qualifyingPath": "Employee"},
                    "values": {
                        "included": [{"path": ["Engineering"]}, {"path": ["Sales"]}]
                    }
                }
            })
        );
    }

    #[test]
    fn test_selection_concept_filter() {
        let filter = QueryFilter::selection_concept("isManager", "Employee");
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"selectionConcept": {"name": "isManager", "qualifyingPath": "Employee"}})
        );
    }

    #[test]
    fn test_fiscal_years() {
        let intervals = TimeIntervals::fiscal_years(2021, 2025).unwrap();
        assert_eq!(
            serde_json::to_value(&intervals).unwrap(),
            json!({
                "fromDateTime": "2021-01-01",
                "intervalPeriodType": "YEAR",
                "intervalCount": 5,
                "direction": "FORWARD"
            })
        );
        assert!(matches!(
            TimeIntervals::fiscal_years(2025, 2021),
            Err(QueryError::InvalidYearRange { start: 2025, end: 2021 })
        ));
    }

    #[test]
    fn test_build_requires_axis() {
        let err = AggregateQuery::builder("employeeCount").build().unwrap_err();
        assert!(matches!(err, QueryError::NoAxes));
    }

    #[test]
    fn test_build_full_payload() {
        let query = AggregateQuery::builder("employeeCount")
            .axis(QueryAxis::dimension("Gender", Some("Employee".to_string()), None))
            .filter(QueryFilter::selection_concept("isManager", "Employee"))
            .time_intervals(TimeIntervals::trailing_months(6))
            .options(QueryOptions {
                zero_visibility: Some(Visibility::Eliminate),
                ..Default::default()
            })
            .build()
            .unwrap();

        assert_eq!(query.metric_id(), "employeeCount");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "query": {
                    "source": {"metric": "employeeCount"},
                    "axes": [{
                        "dimensionLevelSelection": {
                            "dimension": {"name": "Gender", "qualifyingPath": "Employee"},
                            "levelIds": ["Gender"]
                        }
                    }],
                    "filters": [{"selectionConcept": {"name": "isManager", "qualifyingPath": "Employee"}}],
                    "timeIntervals": {
                        "dynamicDateFrom": "SOURCE",
                        "intervalPeriodType": "MONTH",
                        "intervalCount": 6,
                        "direction": "BACKWARD"
                    }
                },
                "options": {"zeroVisibility": "ELIMINATE"}
            })
        );
    }

    #[test]
    fn test_parameter_values_pass_through() {
        let query = AggregateQuery::builder("attritionRate")
            .axis(QueryAxis::fiscal_year())
            .filters([
                QueryFilter::selection_concept("isManager", "Employee"),
                QueryFilter::selection_concept("isActive", "Employee"),
            ])
            .parameter_value(json!({"name": "threshold", "value": 0.5}))
            .parameter_value(json!("quarterly"))
            .build()
            .unwrap();

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value["query"]["parameterValues"],
            json!([{"name": "threshold", "value": 0.5}, "quarterly"])
        );
        assert_eq!(value["query"]["filters"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_empty_options_are_dropped() {
        let query = AggregateQuery::builder("headcount")
            .axis(QueryAxis::fiscal_year())
            .options(QueryOptions::default())
            .build()
            .unwrap();
        assert!(query.options.is_none());
        let value = serde_json::to_value(&query).unwrap();
        assert!(value.get("options").is_none());
        assert!(value["query"].get("filters").is_none());
        assert!(value["query"].get("parameterValues").is_none());
    }

    #[test]
    fn test_visibility_from_str() {
        assert_eq!("eliminate".parse::<Visibility>().unwrap(), Visibility::Eliminate);
        assert_eq!("SHOW".parse::<Visibility>().unwrap(), Visibility::Show);
        assert!("sometimes".parse::<Visibility>().is_err());
    }

    #[test]
    fn test_load_query_payload_unwraps_payload_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"payload": {{"query": {{"source": {{"metric": "m"}}}}}}}}"#).unwrap();
        let payload = load_query_payload(file.path()).unwrap();
        assert_eq!(payload, json!({"query": {"source": {"metric": "m"}}}));
    }

    #[test]
    fn test_load_query_payload_root_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"query": {{"axes": []}}}}"#).unwrap();
        let payload = load_query_payload(file.path()).unwrap();
        assert_eq!(payload, json!({"query": {"axes": []}}));
    }

    #[test]
    fn test_load_query_payload_missing_file() {
        let err = load_query_payload(Path::new("/nonexistent/payload.json")).unwrap_err();
        assert!(matches!(err, QueryError::Io { .. }));
    }
}
