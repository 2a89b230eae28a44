//! Column definitions.
//!
//! A [`ColumnDef`] is the immutable schema entry for one column or column
//! group. Interactive state (sort direction, active filter, collapse) lives in
//! the owning engine keyed by [`ColumnId`], so definitions can be shared
//! between tree rebuilds without aliasing mutable state.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use super::record::Record;
use super::value::Value;

/// Reads a column value (or display value) from a row.
pub type ValueGetter<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;
/// Writes a column value into a row.
pub type ValueSetter<R> = Arc<dyn Fn(&mut R, Value) + Send + Sync>;
/// Predicate for [`FilterType::Custom`]: `(cell value, filter value) -> matches`.
pub type CustomFilter = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Stable identifier of a column, used to key sort and filter state.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(id: impl Into<String>) -> Self {
        ColumnId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ColumnId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        ColumnId(s.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        ColumnId(s)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a column's values are interpreted for ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Plain,
    Number,
    Date,
}

/// Which filter widget / predicate a column uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    Select,
    Number,
    Date,
    Custom,
}

/// Schema entry for a column or a column group.
///
/// A definition with a non-empty `columns` list is a group. Optional accessor
/// closures displace the default field lookup through [`Record`].
pub struct ColumnDef<R> {
    pub field: String,
    pub title: String,
    /// Explicit identifier; defaults to `field`, then `title`.
    pub key: Option<String>,
    pub columns: Vec<Arc<ColumnDef<R>>>,
    pub column_type: ColumnType,
    pub filter_type: FilterType,
    /// Initial collapse state. The engine tracks the live state itself.
    pub collapsed: bool,
    pub hide_in_collapse: bool,
    /// Pins a top-level column (and its subtree) into the frozen region.
    pub frozen: bool,
    pub getter: Option<ValueGetter<R>>,
    pub setter: Option<ValueSetter<R>>,
    pub display: Option<ValueGetter<R>>,
    pub custom_filter: Option<CustomFilter>,
}

impl<R> ColumnDef<R> {
    /// A leaf column reading `field`. The title defaults to the field name.
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        ColumnDef {
            title: field.clone(),
            field,
            key: None,
            columns: Vec::new(),
            column_type: ColumnType::Plain,
            filter_type: FilterType::Select,
            collapsed: false,
            hide_in_collapse: false,
            frozen: false,
            getter: None,
            setter: None,
            display: None,
            custom_filter: None,
        }
    }

    /// A column group with the given children.
    pub fn group(title: impl Into<String>, columns: impl IntoIterator<Item = ColumnDef<R>>) -> Self {
        let mut def = Self::new(String::new());
        def.title = title.into();
        def.columns(columns)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDef<R>>) -> Self {
        self.columns = columns.into_iter().map(Arc::new).collect();
        self
    }

    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    pub fn filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn hide_in_collapse(mut self, hide: bool) -> Self {
        self.hide_in_collapse = hide;
        self
    }

    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }

    pub fn getter(mut self, f: impl Fn(&R) -> Value + Send + Sync + 'static) -> Self {
        self.getter = Some(Arc::new(f));
        self
    }

    pub fn setter(mut self, f: impl Fn(&mut R, Value) + Send + Sync + 'static) -> Self {
        self.setter = Some(Arc::new(f));
        self
    }

    pub fn display(mut self, f: impl Fn(&R) -> Value + Send + Sync + 'static) -> Self {
        self.display = Some(Arc::new(f));
        self
    }

    pub fn custom_filter(
        mut self,
        f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.custom_filter = Some(Arc::new(f));
        self
    }

    /// Identifier keying sort/filter/collapse state for this column.
    pub fn id(&self) -> ColumnId {
        match &self.key {
            Some(key) => ColumnId::new(key.clone()),
            None if !self.field.is_empty() => ColumnId::new(self.field.clone()),
            None => ColumnId::new(self.title.clone()),
        }
    }

    pub fn is_group(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Groups always survive a collapse; leaves only without `hide_in_collapse`.
    pub fn is_visible_in_collapse(&self) -> bool {
        self.is_group() || !self.hide_in_collapse
    }
}

impl<R: Record> ColumnDef<R> {
    /// Raw value of this column for `row`.
    pub fn value(&self, row: &R) -> Value {
        match &self.getter {
            Some(get) => get(row),
            None => row.field(&self.field),
        }
    }

    /// Display value of this column for `row`, falling back to the raw value.
    pub fn display_value(&self, row: &R) -> Value {
        match &self.display {
            Some(display) => display(row),
            None => self.value(row),
        }
    }

    pub fn set_value(&self, row: &mut R, value: Value) {
        match &self.setter {
            Some(set) => set(row, value),
            None => row.set_field(&self.field, value),
        }
    }
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        ColumnDef {
            field: self.field.clone(),
            title: self.title.clone(),
            key: self.key.clone(),
            columns: self.columns.clone(),
            column_type: self.column_type,
            filter_type: self.filter_type,
            collapsed: self.collapsed,
            hide_in_collapse: self.hide_in_collapse,
            frozen: self.frozen,
            getter: self.getter.clone(),
            setter: self.setter.clone(),
            display: self.display.clone(),
            custom_filter: self.custom_filter.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id())
            .field("title", &self.title)
            .field("column_type", &self.column_type)
            .field("filter_type", &self.filter_type)
            .field("collapsed", &self.collapsed)
            .field("hide_in_collapse", &self.hide_in_collapse)
            .field("frozen", &self.frozen)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    type Row = HashMap<String, Value>;

    #[test]
    fn test_id_prefers_key_then_field_then_title() {
        let keyed: ColumnDef<Row> = ColumnDef::new("price").key("p");
        assert_eq!(keyed.id().as_str(), "p");

        let by_field: ColumnDef<Row> = ColumnDef::new("price").title("Price");
        assert_eq!(by_field.id().as_str(), "price");

        let group: ColumnDef<Row> = ColumnDef::group("Totals", [ColumnDef::new("a")]);
        assert_eq!(group.id().as_str(), "Totals");
        assert!(group.is_group());
    }

    #[test]
    fn test_accessors_fall_back_to_field() {
        let mut row: Row = HashMap::new();
        row.insert("qty".to_string(), Value::from(3));

        let plain: ColumnDef<Row> = ColumnDef::new("qty");
        assert_eq!(plain.value(&row), Value::from(3));
        assert_eq!(plain.display_value(&row), Value::from(3));

        plain.set_value(&mut row, Value::from(4));
        assert_eq!(row["qty"], Value::from(4));
    }

    #[test]
    fn test_custom_accessors_displace_field_lookup() {
        let mut row: Row = HashMap::new();
        row.insert("qty".to_string(), Value::from(3));

        let doubled: ColumnDef<Row> = ColumnDef::new("qty")
            .getter(|r: &Row| Value::from(r.field("qty").as_f64().unwrap_or(0.0) * 2.0))
            .display(|r: &Row| Value::from(format!("{} pcs", r.field("qty"))))
            .setter(|r: &mut Row, v| {
                r.insert("override".to_string(), v);
            });

        assert_eq!(doubled.value(&row), Value::from(6));
        assert_eq!(doubled.display_value(&row), Value::from("3 pcs"));

        doubled.set_value(&mut row, Value::from(1));
        assert_eq!(row["qty"], Value::from(3));
        assert_eq!(row["override"], Value::from(1));
    }

    #[test]
    fn test_groups_are_visible_in_collapse() {
        let group: ColumnDef<Row> =
            ColumnDef::group("g", [ColumnDef::new("a")]).hide_in_collapse(true);
        assert!(group.is_visible_in_collapse());

        let leaf: ColumnDef<Row> = ColumnDef::new("a").hide_in_collapse(true);
        assert!(!leaf.is_visible_in_collapse());
    }
}
