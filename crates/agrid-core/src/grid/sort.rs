use super::GridEngine;
use crate::error::Result;
use agrid_engine::engine::{ColumnId, Record, SortDirection};

impl<R: Record> GridEngine<R> {
    /// Sort by a column.
    ///
    /// Without `multiple` this becomes the only sort key; with it the column
    /// is appended to (or updated within) the existing keys.
    pub fn add_sort(&mut self, id: &str, direction: SortDirection, multiple: bool) -> Result<()> {
        let column_id = self.column(id)?.id();
        self.sort.add(column_id, direction, multiple);
        tracing::debug!(target: "agrid_core::grid", column = id, %direction, multiple, "add sort");
        self.refresh();
        Ok(())
    }

    /// Stop sorting by a column. Returns the direction it had.
    pub fn remove_sort(&mut self, id: &str) -> Option<SortDirection> {
        let removed = self.sort.remove(id);
        if removed.is_some() {
            self.refresh();
        }
        removed
    }

    pub fn reset_sort(&mut self) {
        self.sort.reset();
        self.refresh();
    }

    /// Advance a column through none -> asc -> desc, then back to asc, or to
    /// unsorted when `unsort_column` is enabled. Returns the new direction.
    pub fn cycle_sort(&mut self, id: &str, multiple: bool) -> Result<Option<SortDirection>> {
        let column_id = self.column(id)?.id();
        let direction = self
            .sort
            .cycle(column_id, multiple, self.options.unsort_column);
        tracing::debug!(target: "agrid_core::grid", column = id, ?direction, "cycle sort");
        self.refresh();
        Ok(direction)
    }

    pub fn sort_direction(&self, id: &str) -> Option<SortDirection> {
        self.sort.direction(id)
    }

    /// Active sort keys, primary first.
    pub fn sort_keys(&self) -> Vec<(ColumnId, SortDirection)> {
        self.sort.iter().map(|(id, dir)| (id.clone(), dir)).collect()
    }
}
