//! agrid - data-grid state engine: nested column headers, multi-column sort
//! and typed filters, independent of any UI toolkit.
//!
//! ```
//! use agrid::{ColumnDef, EngineOptions, GridEngine, Record, SortDirection, Value};
//! use std::collections::HashMap;
//!
//! type Row = HashMap<String, Value>;
//!
//! let mut grid: GridEngine<Row> = GridEngine::new(
//!     vec![ColumnDef::new("name"), ColumnDef::new("qty")],
//!     EngineOptions::default(),
//! ).unwrap();
//! let mut row = Row::new();
//! row.set_field("name", "pen".into());
//! row.set_field("qty", 3.into());
//! grid.set_data(vec![row]);
//! grid.add_sort("qty", SortDirection::Desc, false).unwrap();
//! assert_eq!(grid.len(), 1);
//! ```

pub use agrid_core::{
    ColumnSchema, EngineOptions, GridEngine, GridError, Result, error, grid, load_schema, options,
    parse_schema_json, parse_schema_toml, schema,
};
pub use agrid_engine::engine;
pub use agrid_engine::engine::{
    ColumnDef, ColumnFilter, ColumnId, ColumnNode, ColumnTree, ColumnType, DateRange,
    FilterCondition, FilterFacet, FilterType, FilterValue, NodeId, NumberRange, Record,
    SelectOption, SortDirection, Value,
};
