//! Cell values held by grid rows.
//!
//! This module provides [`Value`], the closed set of values a column can yield:
//! - scalars (`Null`, `Bool`, `Number`, `Text`, `Date`)
//! - [`Value::List`] for multi-valued cells (tags, assignees, ...)
//!
//! Values are hashable so they can key facet maps, and carry a total
//! ordering for sorting via [`Value::sort_cmp`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::format::format_number;

/// A single cell value.
///
/// Serialized untagged. A date is written as `2024-03-01T00:00:00` and any
/// string in exactly that shape reads back as a `Date`, so `Date` must stay
/// ahead of `Text` in the variant order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Empty values are `Null` and the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// View the value as a list: multi-valued cells as-is, scalars as a singleton.
    pub fn as_list(&self) -> &[Value] {
        match self {
            Value::List(values) => values,
            other => std::slice::from_ref(other),
        }
    }

    /// Numeric view of the value. Text is parsed, so `"42"` reads as 42.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        if self.is_empty() {
            return 0;
        }
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::Date(_) => 3,
            Value::Text(_) => 4,
            Value::List(_) => 5,
        }
    }

    /// Total ordering used by column sorting.
    ///
    /// Empty values sort first, then booleans, numbers, dates, text and lists.
    /// Values of the same kind compare naturally; lists compare element-wise.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) if number_bits(*a) == number_bits(*b) => {
                Ordering::Equal
            }
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.sort_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Canonical bit pattern so that `0.0 == -0.0` and all NaNs hash alike.
fn number_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => number_bits(*a) == number_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => number_bits(*n).hash(state),
            Value::Text(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::List(values) => values.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => {
                if d.time() == chrono::NaiveTime::MIN {
                    write!(f, "{}", d.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            Value::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use std::cmp::Ordering;
    use std::collections::HashSet;

    #[test]
    fn test_empty_values() {
        assert!(Value::Null.is_empty());
        assert!(Value::from("").is_empty());
        assert!(!Value::from(" ").is_empty());
        assert!(!Value::from(0).is_empty());
        assert!(!Value::List(vec![]).is_empty());
    }

    #[test]
    fn test_as_list_wraps_scalars() {
        let scalar = Value::from(3);
        assert_eq!(scalar.as_list(), &[Value::from(3)]);

        let multi = Value::from(vec!["a", "b"]);
        assert_eq!(multi.as_list().len(), 2);
    }

    #[test]
    fn test_numbers_hash_by_value() {
        let mut set = HashSet::new();
        set.insert(Value::from(0.0));
        set.insert(Value::from(-0.0));
        set.insert(Value::from(f64::NAN));
        set.insert(Value::from(f64::NAN));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_sort_cmp_puts_empty_first() {
        assert_eq!(Value::from("").sort_cmp(&Value::from(1)), Ordering::Less);
        assert_eq!(Value::Null.sort_cmp(&Value::from("")), Ordering::Equal);
        assert_eq!(Value::from(2).sort_cmp(&Value::from(10)), Ordering::Less);
        assert_eq!(Value::from("b").sort_cmp(&Value::from("a")), Ordering::Greater);
        assert_eq!(Value::from(5).sort_cmp(&Value::from("a")), Ordering::Less);
    }

    #[test]
    fn test_signed_zeros_compare_equal() {
        assert_eq!(Value::from(0.0).sort_cmp(&Value::from(-0.0)), Ordering::Equal);
        assert_eq!(Value::from(-0.0).sort_cmp(&Value::from(0.0)), Ordering::Equal);
        assert_eq!(Value::from(-1.0).sort_cmp(&Value::from(-0.0)), Ordering::Less);
    }

    #[test]
    fn test_serde_keeps_dates() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let values = Value::List(vec![
            Value::from(date),
            Value::from("2024-03-01"),
            Value::from("plain"),
            Value::from(1.5),
            Value::Null,
        ]);
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["2024-03-01T00:00:00","2024-03-01","plain",1.5,null]"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "1, 2");
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(Value::from(date).to_string(), "2024-03-01");
    }

    #[test]
    fn test_as_f64_parses_text() {
        assert_eq!(Value::from(" 42 ").as_f64(), Some(42.0));
        assert_eq!(Value::from("x").as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
    }
}
