// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Build an aggregate query payload

use std::path::PathBuf;

use aggregate_api::{AggregateQuery, QueryAxis, QueryFilter, QueryOptions, TimeIntervals, Visibility};
use anyhow::{Context, Result};
use clap::Args;

use crate::config::Config;
use crate::output::json::write_json;

#[derive(Args, Clone, Debug)]
pub struct QueryArgs {
    /// Metric id to query
    #[arg(short, long, env = "CELLSET_METRIC_ID")]
    pub metric: Option<String>,

    /// Dimension to group by (repeatable, in axis order)
    #[arg(short, long = "dimension")]
    pub dimensions: Vec<String>,

    /// Qualifying path for dimensions and filters
    #[arg(long)]
    pub qualifying_path: Option<String>,

    /// Keep only these members: DIM=MEMBER[,MEMBER...] (repeatable)
    #[arg(long = "member-filter", value_parser = parse_member_filter)]
    pub member_filters: Vec<MemberFilterArg>,

    /// Drop these members: DIM=MEMBER[,MEMBER...] (repeatable)
    #[arg(long = "exclude-filter", value_parser = parse_member_filter)]
    pub exclude_filters: Vec<MemberFilterArg>,

    /// Restrict to a selection concept (repeatable)
    #[arg(long = "concept")]
    pub concepts: Vec<String>,

    /// Trailing number of months, counted back from the latest data
    #[arg(long, conflicts_with = "fiscal_years")]
    pub months: Option<u32>,

    /// Fiscal year range START..END; adds a Time / FISCAL_YEAR axis
    #[arg(long, value_parser = parse_year_range)]
    pub fiscal_years: Option<(i32, i32)>,

    /// Zero-valued cells: show, hide or eliminate
    #[arg(long)]
    pub zero_visibility: Option<Visibility>,

    /// Null-valued cells: show, hide or eliminate
    #[arg(long)]
    pub null_visibility: Option<Visibility>,

    /// Value for a parameterised metric, as JSON (repeatable)
    #[arg(long = "parameter-value", value_parser = parse_json_value)]
    pub parameter_values: Vec<serde_json::Value>,

    /// Re-emit a stored payload instead of building one
    #[arg(
        long,
        conflicts_with_all = [
            "dimensions", "member_filters", "exclude_filters", "concepts",
            "months", "fiscal_years", "zero_visibility", "null_visibility",
            "parameter_values",
        ]
    )]
    pub payload_file: Option<PathBuf>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// A dimension with a list of member names
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberFilterArg {
    pub dimension: String,
    pub members: Vec<String>,
}

/// Parse DIM=MEMBER[,MEMBER...]
pub fn parse_member_filter(s: &str) -> Result<MemberFilterArg, String> {
    let (dimension, members) = s
        .split_once('=')
        .ok_or_else(|| format!("expected DIM=MEMBER[,MEMBER...], got '{}'", s))?;
    let members: Vec<String> = members
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if dimension.trim().is_empty() || members.is_empty() {
        return Err(format!("expected DIM=MEMBER[,MEMBER...], got '{}'", s));
    }
    Ok(MemberFilterArg {
        dimension: dimension.trim().to_string(),
        members,
    })
}

/// Parse START..END
pub fn parse_year_range(s: &str) -> Result<(i32, i32), String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got '{}'", s))?;
    let start = start
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid start year '{}': {}", start, e))?;
    let end = end
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid end year '{}': {}", end, e))?;
    Ok((start, end))
}

/// Parse a JSON value; bare words that are not JSON become strings
pub fn parse_json_value(s: &str) -> Result<serde_json::Value, String> {
    Ok(serde_json::from_str(s).unwrap_or_else(|_| serde_json::Value::String(s.to_string())))
}

/// Assemble the payload from command line arguments
pub fn build_query(args: &QueryArgs, config: &Config) -> Result<AggregateQuery> {
    let metric = config
        .metric_id(args.metric.clone())
        .context("A metric id is required (--metric, CELLSET_METRIC_ID or metricId in config.json)")?;

    let qualifying_path = args
        .qualifying_path
        .clone()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| config.qualifying_path().to_string());

    let mut builder = AggregateQuery::builder(metric).axes(
        args.dimensions
            .iter()
            .map(|d| QueryAxis::dimension(d.as_str(), Some(qualifying_path.clone()), None)),
    );

    let included = args.member_filters.iter().map(|filter| {
        QueryFilter::member_set(
            filter.dimension.as_str(),
            filter.members.iter().map(String::as_str),
            std::iter::empty::<&str>(),
            qualifying_path.as_str(),
        )
    });
    let excluded = args.exclude_filters.iter().map(|filter| {
        QueryFilter::member_set(
            filter.dimension.as_str(),
            std::iter::empty::<&str>(),
            filter.members.iter().map(String::as_str),
            qualifying_path.as_str(),
        )
    });
    let concepts = args
        .concepts
        .iter()
        .map(|concept| QueryFilter::selection_concept(concept.as_str(), qualifying_path.as_str()));
    let filters: Vec<QueryFilter> = included.chain(excluded).chain(concepts).collect();
    builder = builder.filters(filters);

    for value in &args.parameter_values {
        builder = builder.parameter_value(value.clone());
    }

    if let Some(months) = args.months {
        builder = builder.time_intervals(TimeIntervals::trailing_months(months));
    }
    if let Some((start, end)) = args.fiscal_years {
        builder = builder
            .axis(QueryAxis::fiscal_year())
            .time_intervals(TimeIntervals::fiscal_years(start, end)?);
    }

    builder = builder.options(QueryOptions {
        zero_visibility: args.zero_visibility,
        null_visibility: args.null_visibility,
        ..Default::default()
    });

    Ok(builder.build()?)
}

pub fn run(args: QueryArgs, config: &Config) -> Result<()> {
    if let Some(path) = &args.payload_file {
        let payload = aggregate_api::load_query_payload(path)?;
        return write_json(&payload, args.output.as_deref());
    }

    let query = build_query(&args, config)?;
    tracing::debug!(metric = %query.metric_id(), axes = query.query.axes.len(), "built aggregate query");
    write_json(&query, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: QueryArgs,
    }

    fn parse(argv: &[&str]) -> QueryArgs {
        TestCli::try_parse_from(std::iter::once("query").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_parse_member_filter() {
        assert_eq!(
            parse_member_filter("Function=Sales, Legal").unwrap(),
            MemberFilterArg {
                dimension: "Function".to_string(),
                members: vec!["Sales".to_string(), "Legal".to_string()],
            }
        );
        assert!(parse_member_filter("Function").is_err());
        assert!(parse_member_filter("Function=").is_err());
        assert!(parse_member_filter("=Sales").is_err());
    }

    #[test]
    fn test_parse_year_range() {
        assert_eq!(parse_year_range("2021..2024").unwrap(), (2021, 2024));
        assert!(parse_year_range("2021-2024").is_err());
        assert!(parse_year_range("20x1..2024").is_err());
    }

    #[test]
    fn test_build_query() {
        let args = parse(&[
            "--metric",
            "employeeCount",
            "--dimension",
            "Function",
            "--exclude-filter",
            "Function=HR",
            "--concept",
            "Active",
            "--months",
            "6",
            "--zero-visibility",
            "hide",
        ]);
        let query = build_query(&args, &Config::default()).unwrap();
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "query": {
                    "source": {"metric": "employeeCount"},
                    "axes": [{"dimensionLevelSelection": {
                        "dimension": {"name": "Function", "qualifyingPath": "Employee"},
                        "levelIds": ["Function"]
                    }}],
                    "filters": [
                        {"memberSet": {
                            "dimension": {"name": "Function", "qualifyingPath": "Employee"},
                            "values": {"excluded": [{"path": ["HR"]}]}
                        }},
                        {"selectionConcept": {"name": "Active", "qualifyingPath": "Employee"}}
                    ],
                    "timeIntervals": {
                        "dynamicDateFrom": "SOURCE",
                        "intervalPeriodType": "MONTH",
                        "intervalCount": 6,
                        "direction": "BACKWARD"
                    }
                },
                "options": {"zeroVisibility": "HIDE"}
            })
        );
    }

    #[test]
    fn test_build_query_fiscal_years() {
        let config = Config {
            qualifying_path: Some("Candidate".to_string()),
            metric_id: Some("hires".to_string()),
            ..Default::default()
        };
        let args = parse(&["--dimension", "Gender", "--fiscal-years", "2022..2024"]);
        let query = build_query(&args, &config).unwrap();

        assert_eq!(query.metric_id(), "hires");
        let axes: Vec<&str> = query.query.axes.iter().map(QueryAxis::dimension_name).collect();
        assert_eq!(axes, vec!["Gender", "Time"]);
        assert_eq!(query.query.time_intervals, Some(TimeIntervals::fiscal_years(2022, 2024).unwrap()));
        assert_eq!(query.options, None);
    }

    #[test]
    fn test_build_query_requires_metric_and_axis() {
        let err = build_query(&parse(&["--dimension", "Function"]), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("metric id is required"));

        let err = build_query(&parse(&["--metric", "m"]), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("at least one axis"));
    }

    #[test]
    fn test_build_query_parameter_values() {
        let args = parse(&[
            "--metric",
            "attritionRate",
            "--dimension",
            "Function",
            "--parameter-value",
            r#"{"name": "threshold", "value": 0.5}"#,
            "--parameter-value",
            "quarterly",
        ]);
        let query = build_query(&args, &Config::default()).unwrap();
        assert_eq!(
            serde_json::to_value(&query).unwrap()["query"]["parameterValues"],
            json!([{"name": "threshold", "value": 0.5}, "quarterly"])
        );
    }

    #[test]
    fn test_months_conflicts_with_fiscal_years() {
        let result = TestCli::try_parse_from(["query", "--months", "3", "--fiscal-years", "2020..2021"]);
        assert!(result.is_err());
    }
}
