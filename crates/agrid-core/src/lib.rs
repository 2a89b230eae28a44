//! agrid-core - UI-agnostic grid engine: rows, column tree, sort and filter state.

pub mod error;
pub mod grid;
pub mod options;
pub mod schema;

pub use error::{GridError, Result};
pub use grid::GridEngine;
pub use options::EngineOptions;
pub use schema::{ColumnSchema, load_schema, parse_schema_json, parse_schema_toml};

pub use agrid_engine::engine::{
    ColumnDef, ColumnFilter, ColumnId, ColumnNode, ColumnTree, ColumnType, DateRange,
    FilterCondition, FilterFacet, FilterType, FilterValue, NodeId, NumberRange, Record,
    SelectOption, SortDirection, Value,
};
