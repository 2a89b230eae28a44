//! Grid engine API.
//!
//! This module provides the algorithmic core of the data grid:
//!
//! - [`Value`], [`Record`] - Cell values and field-keyed row access
//! - [`ColumnDef`], [`ColumnId`] - Declarative column schema
//! - [`build_columns`], [`ColumnTree`] - Header matrix / body list construction
//! - [`SortState`], [`sort_rows`] - Ordered sort keys and stable multi-key ordering
//! - [`FilterState`], [`filter_rows`] - Per-column filters and combinator evaluation
//! - [`column_facet`] - Available filter values derived from unfiltered rows

mod column;
mod date;
mod facet;
mod filter;
mod format;
mod record;
mod sort;
mod tree;
mod value;

pub use column::{
    ColumnDef, ColumnId, ColumnType, CustomFilter, FilterType, ValueGetter, ValueSetter,
};
pub use date::{parse_date, timestamp_millis};
pub use facet::{FilterFacet, SelectOption, column_facet};
pub use filter::{
    ActiveFilter, ColumnFilter, DateRange, FilterCondition, FilterState, FilterValue,
    NumberRange, column_matches, filter_conditions, filter_rows, row_matches,
};
pub use format::format_number;
pub use record::Record;
pub use sort::{SortDirection, SortKey, SortState, sort_rows};
pub use tree::{
    BuildOptions, ColumnNode, ColumnTree, DEFAULT_MAX_BUILD_STEPS, NodeId, build_columns,
    collapsed_ids,
};
pub use value::Value;
