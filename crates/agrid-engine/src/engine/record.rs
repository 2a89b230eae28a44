//! Field-keyed access to grid rows.

use std::collections::{BTreeMap, HashMap};

use super::value::Value;

/// A row the grid can read from and write to by field name.
///
/// Columns without custom accessors go through this trait. Missing fields
/// read as [`Value::Null`].
pub trait Record {
    fn field(&self, name: &str) -> Value;
    fn set_field(&mut self, name: &str, value: Value);
}

impl Record for HashMap<String, Value> {
    fn field(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }

    fn set_field(&mut self, name: &str, value: Value) {
        self.insert(name.to_string(), value);
    }
}

impl Record for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }

    fn set_field(&mut self, name: &str, value: Value) {
        self.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_null() {
        let row: HashMap<String, Value> = HashMap::new();
        assert_eq!(row.field("x"), Value::Null);
    }

    #[test]
    fn test_set_then_read() {
        let mut row: BTreeMap<String, Value> = BTreeMap::new();
        row.set_field("x", Value::from(1));
        assert_eq!(row.field("x"), Value::from(1));
    }
}
