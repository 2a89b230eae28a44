use super::GridEngine;
use crate::error::{GridError, Result};
use agrid_engine::engine::{
    ColumnFilter, FilterCondition, FilterFacet, Record, column_facet, filter_conditions,
};

impl<R: Record> GridEngine<R> {
    /// Set, replace or (for an empty operand) remove a column's filter.
    ///
    /// The operand kind must fit the column's filter type.
    pub fn switch_filter(&mut self, id: &str, filter: ColumnFilter) -> Result<()> {
        let (column_id, filter_type) = {
            let column = self.column(id)?;
            (column.id(), column.filter_type)
        };
        if filter.value.is_empty() {
            self.remove_filter(id);
            return Ok(());
        }
        if !filter.value.fits(filter_type) {
            return Err(GridError::FilterMismatch {
                column: id.to_string(),
                filter_type,
            });
        }
        tracing::debug!(
            target: "agrid_core::grid",
            column = id,
            condition = %filter.condition,
            "set filter"
        );
        self.filters.set(column_id, filter);
        self.refresh();
        Ok(())
    }

    /// Remove a column's filter. Returns the filter that was active.
    pub fn remove_filter(&mut self, id: &str) -> Option<ColumnFilter> {
        let removed = self.filters.remove(id);
        self.refresh();
        removed
    }

    pub fn reset_filter(&mut self) {
        self.filters.reset();
        self.refresh();
    }

    pub fn column_filter(&self, id: &str) -> Option<&ColumnFilter> {
        self.filters.get(id)
    }

    /// Filter options for a column, derived from the unfiltered rows.
    pub fn column_filter_data(&self, id: &str) -> Result<FilterFacet> {
        let column = self.column(id)?;
        Ok(column_facet(column, &self.original_data))
    }

    /// Combinators valid in the current mode.
    pub fn filter_conditions(&self) -> Vec<FilterCondition> {
        filter_conditions(self.options.section_mode)
    }
}
