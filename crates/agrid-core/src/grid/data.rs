use super::GridEngine;
use crate::error::{GridError, Result};
use agrid_engine::engine::{Record, Value};

impl<R: Record> GridEngine<R> {
    /// Replace the rows. Active filters and sort keys are re-applied.
    pub fn set_data(&mut self, rows: Vec<R>) {
        tracing::debug!(target: "agrid_core::grid", rows = rows.len(), "set data");
        self.original_data = rows;
        self.refresh();
    }

    /// Rows as last assigned, ignoring filters and sort.
    pub fn original_data(&self) -> &[R] {
        &self.original_data
    }

    /// Visible rows in display order.
    pub fn data(&self) -> impl Iterator<Item = &R> + '_ {
        self.view.iter().map(|&i| &self.original_data[i])
    }

    /// Positions in [`original_data`](Self::original_data) of the visible rows.
    pub fn data_indices(&self) -> &[usize] {
        &self.view
    }

    /// Visible row at display position `pos`.
    pub fn row(&self, pos: usize) -> Option<&R> {
        self.view.get(pos).map(|&i| &self.original_data[i])
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn column_value(&self, row: &R, id: &str) -> Result<Value> {
        Ok(self.column(id)?.value(row))
    }

    pub fn column_display_value(&self, row: &R, id: &str) -> Result<Value> {
        Ok(self.column(id)?.display_value(row))
    }

    /// Write a value through the column's setter (or its field).
    ///
    /// The row is caller-owned, so the view is not refreshed; use
    /// [`update_value`](Self::update_value) for rows held by the engine.
    pub fn set_column_value(&self, row: &mut R, id: &str, value: Value) -> Result<()> {
        self.column(id)?.set_value(row, value);
        Ok(())
    }

    /// Edit a stored row, addressed by its index in `original_data`, and
    /// refresh the view.
    pub fn update_value(&mut self, index: usize, id: &str, value: Value) -> Result<()> {
        let column = self.column(id)?.clone();
        let len = self.original_data.len();
        let row = self
            .original_data
            .get_mut(index)
            .ok_or(GridError::RowOutOfRange { index, len })?;
        column.set_value(row, value);
        self.refresh();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::GridEngine;
    use crate::error::GridError;
    use crate::options::EngineOptions;
    use agrid_engine::engine::{ColumnDef, ColumnFilter, Record, SortDirection, Value};
    use std::collections::HashMap;

    type Row = HashMap<String, Value>;

    fn row(name: &str, qty: i32) -> Row {
        let mut r = Row::new();
        r.set_field("name", name.into());
        r.set_field("qty", qty.into());
        r
    }

    fn engine() -> GridEngine<Row> {
        GridEngine::new(
            vec![
                ColumnDef::new("name"),
                ColumnDef::new("qty"),
                ColumnDef::new("label")
                    .getter(|r: &Row| format!("{}x{}", r.field("name"), r.field("qty")).into())
                    .setter(|r: &mut Row, v| r.set_field("name", v))
                    .display(|r: &Row| r.field("name").to_string().to_uppercase().into()),
            ],
            EngineOptions::default(),
        ).unwrap()
    }

    #[test]
    fn test_empty_engine() {
        let grid = engine();
        assert!(grid.is_empty());
        assert_eq!(grid.data().count(), 0);
        assert!(grid.row(0).is_none());
    }

    #[test]
    fn test_set_data_reapplies_sort() {
        let mut grid = engine();
        grid.set_data(vec![row("a", 3), row("b", 1)]);
        grid.add_sort("qty", SortDirection::Asc, false).unwrap();
        assert_eq!(grid.data_indices(), &[1, 0]);

        grid.set_data(vec![row("c", 9), row("d", 2), row("e", 5)]);
        assert_eq!(grid.data_indices(), &[1, 2, 0]);
        assert_eq!(grid.row(0).unwrap().field("name"), Value::from("d"));
        assert_eq!(grid.original_data().len(), 3);
    }

    #[test]
    fn test_set_data_reapplies_filter() {
        let mut grid = engine();
        grid.switch_filter("name", ColumnFilter::select(["b"])).unwrap();
        grid.set_data(vec![row("a", 1), row("b", 2), row("b", 3)]);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_accessors_use_getter_setter_display() {
        let grid = engine();
        let mut r = row("pen", 2);
        assert_eq!(grid.column_value(&r, "label").unwrap(), Value::from("penx2"));
        assert_eq!(grid.column_display_value(&r, "label").unwrap(), Value::from("PEN"));
        assert_eq!(grid.column_display_value(&r, "qty").unwrap(), Value::from(2));

        grid.set_column_value(&mut r, "label", "ink".into()).unwrap();
        assert_eq!(r.field("name"), Value::from("ink"));
        assert!(matches!(
            grid.column_value(&r, "missing"),
            Err(GridError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_update_value_refreshes_view() {
        let mut grid = engine();
        grid.set_data(vec![row("a", 1), row("b", 2)]);
        grid.add_sort("qty", SortDirection::Desc, false).unwrap();
        assert_eq!(grid.data_indices(), &[1, 0]);

        grid.update_value(0, "qty", 10.into()).unwrap();
        assert_eq!(grid.data_indices(), &[0, 1]);

        assert!(matches!(
            grid.update_value(5, "qty", 1.into()),
            Err(GridError::RowOutOfRange { index: 5, len: 2 })
        ));
    }
}
