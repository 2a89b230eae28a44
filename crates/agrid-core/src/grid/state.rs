use agrid_engine::engine::{
    ActiveFilter, ColumnDef, ColumnId, ColumnTree, FilterState, Record, SortKey, SortState,
    build_columns, filter_rows, sort_rows,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{GridError, Result};
use crate::options::EngineOptions;

/// UI-agnostic state of one data grid.
///
/// Owns the column definitions and the header tree built from them, the raw
/// rows, and the sort/filter state. The visible rows are a derived view
/// (`sort(filter(rows))`) recomputed in full after every mutation.
pub struct GridEngine<R> {
    /// Top-level column definitions, in display order
    pub(crate) column_defs: Vec<Arc<ColumnDef<R>>>,
    /// Every definition (groups and leaves, visible or not) by id
    pub(crate) columns_by_id: HashMap<ColumnId, Arc<ColumnDef<R>>>,
    /// Live collapse state, seeded from the definitions' `collapsed` flags
    pub(crate) collapsed: HashSet<ColumnId>,
    /// Header tree built from `column_defs`
    pub(crate) tree: ColumnTree<R>,
    pub(crate) sort: SortState,
    pub(crate) filters: FilterState,
    /// Rows as last assigned
    pub(crate) original_data: Vec<R>,
    /// Indices into `original_data`: filtered, then sorted
    pub(crate) view: Vec<usize>,
    pub(crate) options: EngineOptions,
}

impl<R: Record> GridEngine<R> {
    /// Create an engine for the given column definitions. No rows are loaded.
    ///
    /// Fails with [`GridError::DuplicateColumn`] when two definitions resolve
    /// to the same id; groups sharing a title need distinct keys.
    pub fn new(
        column_defs: impl IntoIterator<Item = ColumnDef<R>>,
        options: EngineOptions,
    ) -> Result<Self> {
        let mut engine = GridEngine {
            column_defs: Vec::new(),
            columns_by_id: HashMap::new(),
            collapsed: HashSet::new(),
            tree: ColumnTree::empty(),
            sort: SortState::new(),
            filters: FilterState::new(),
            original_data: Vec::new(),
            view: Vec::new(),
            options,
        };
        engine.set_column_defs(column_defs)?;
        Ok(engine)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Look up a column definition by id, including hidden and group columns.
    pub fn column(&self, id: &str) -> Result<&Arc<ColumnDef<R>>> {
        self.columns_by_id
            .get(id)
            .ok_or_else(|| GridError::UnknownColumn(id.to_string()))
    }

    pub fn column_defs(&self) -> &[Arc<ColumnDef<R>>] {
        &self.column_defs
    }

    /// Rebuild the column tree from the current definitions and collapse state.
    pub(crate) fn rebuild_tree(&mut self) {
        self.tree = build_columns(
            &self.column_defs,
            &self.collapsed,
            &self.options.build_options(),
        );
    }

    /// Index every definition (groups and leaves) by id.
    pub(crate) fn index_columns(
        column_defs: &[Arc<ColumnDef<R>>],
    ) -> Result<HashMap<ColumnId, Arc<ColumnDef<R>>>> {
        let mut columns_by_id = HashMap::new();
        let mut stack: Vec<Arc<ColumnDef<R>>> = column_defs.iter().rev().cloned().collect();
        while let Some(def) = stack.pop() {
            let id = def.id();
            stack.extend(def.columns.iter().rev().cloned());
            if columns_by_id.insert(id.clone(), def).is_some() {
                tracing::warn!(target: "agrid_core::grid", column = %id, "duplicate column id");
                return Err(GridError::DuplicateColumn(id.to_string()));
            }
        }
        Ok(columns_by_id)
    }

    /// Recompute the visible rows: filter the original rows, then sort them.
    ///
    /// Filters and sort keys on columns missing from the current definitions
    /// stay in the state but are not applied.
    pub fn refresh(&mut self) {
        let view = {
            let active: Vec<ActiveFilter<'_, R>> = self
                .filters
                .iter()
                .filter_map(|(id, filter)| {
                    self.columns_by_id.get(id).map(|column| ActiveFilter {
                        column: column.as_ref(),
                        filter,
                    })
                })
                .collect();
            let keys: Vec<SortKey<'_, R>> = self
                .sort
                .iter()
                .filter_map(|(id, direction)| {
                    self.columns_by_id.get(id).map(|column| SortKey {
                        column: column.as_ref(),
                        direction,
                    })
                })
                .collect();

            let mut view = filter_rows(&self.original_data, &active);
            sort_rows(&self.original_data, &mut view, &keys);
            view
        };
        tracing::debug!(
            target: "agrid_core::grid",
            rows = self.original_data.len(),
            visible = view.len(),
            filters = self.filters.len(),
            sort_keys = self.sort.len(),
            "refreshed grid view"
        );
        self.view = view;
    }
}
