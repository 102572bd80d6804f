// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Aggregate Query API Types
//!
//! **IMPORTANT**: these types describe a *subset* of the analytics platform's
//! data query API. Only the shapes we build (aggregate query payloads) and the
//! shapes we consume (cell-set and list responses) are modelled here.
//!
//! The endpoints themselves are served by the platform. Transport,
//! authentication and paging are handled by whoever fetches the documents;
//! this crate only fixes the JSON surface so that the rest of the workspace
//! can work with typed values.

// ============================================================================
// Modules
// ============================================================================

pub mod query;
pub mod response;

pub use query::{
    AggregateQuery, AggregateQueryBuilder, AxesOverallValueMode, CalendarType, DimensionLevelSelection,
    DimensionRef, Direction, DynamicDateFrom, MemberDisplayMode, MemberPath, MemberSetFilter, MemberValues,
    PeriodType, QueryAxis, QueryBody, QueryError, QueryFilter, QueryOptions, QuerySource,
    SelectionConceptRef, TimeIntervals, Visibility, load_query_payload,
};
pub use response::{
    AxisDto, CellDto, CellSetResponse, DimensionDto, ListResponse, MemberDto, PositionDto, ResponseError,
    ResponseSource,
};

/// Qualifying path used by the platform's default analytic object.
pub const DEFAULT_QUALIFYING_PATH: &str = "Employee";
