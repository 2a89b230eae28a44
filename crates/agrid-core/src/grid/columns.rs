use super::GridEngine;
use crate::error::Result;
use agrid_engine::engine::{ColumnDef, ColumnNode, ColumnTree, NodeId, Record, collapsed_ids};
use std::sync::Arc;

impl<R: Record> GridEngine<R> {
    /// Replace the column definitions and rebuild the header tree.
    ///
    /// Collapse state is reset to the new definitions' flags. Sort and filter
    /// state is kept; entries whose column no longer exists stay inert.
    ///
    /// Every definition must resolve to a distinct id. On a duplicate the
    /// engine is left unchanged.
    pub fn set_column_defs(
        &mut self,
        column_defs: impl IntoIterator<Item = ColumnDef<R>>,
    ) -> Result<()> {
        let column_defs: Vec<Arc<ColumnDef<R>>> = column_defs.into_iter().map(Arc::new).collect();
        self.columns_by_id = Self::index_columns(&column_defs)?;
        self.collapsed = collapsed_ids(&column_defs);
        self.column_defs = column_defs;
        self.rebuild_tree();
        self.refresh();
        Ok(())
    }

    /// Flip a column's collapse state and rebuild the header tree.
    /// Returns the new state.
    pub fn toggle_collapse(&mut self, id: &str) -> Result<bool> {
        let column_id = self.column(id)?.id();
        let collapsed = if self.collapsed.remove(&column_id) {
            false
        } else {
            self.collapsed.insert(column_id);
            true
        };
        tracing::debug!(target: "agrid_core::grid", column = id, collapsed, "toggled collapse");
        self.rebuild_tree();
        Ok(collapsed)
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    pub fn tree(&self) -> &ColumnTree<R> {
        &self.tree
    }

    /// Header rows, top to bottom.
    pub fn header(&self) -> Vec<Vec<&ColumnNode<R>>> {
        self.tree
            .header()
            .iter()
            .map(|row| self.tree.row_nodes(row))
            .collect()
    }

    /// Leaf columns, left to right.
    pub fn body(&self) -> Vec<&ColumnNode<R>> {
        self.tree.row_nodes(self.tree.body())
    }

    pub fn frozen_header(&self) -> Vec<Vec<&ColumnNode<R>>> {
        self.tree
            .frozen_header()
            .iter()
            .map(|row| self.tree.row_nodes(row))
            .collect()
    }

    pub fn frozen_body(&self) -> Vec<&ColumnNode<R>> {
        self.tree.row_nodes(self.tree.frozen_body())
    }

    /// Resolve a node id. Ids taken before the last rebuild (collapse
    /// toggle or new definitions) give `None`.
    pub fn node(&self, id: NodeId) -> Option<&ColumnNode<R>> {
        self.tree.node(id)
    }
}
