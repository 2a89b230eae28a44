//! Multi-column sorting.
//!
//! [`SortState`] keeps the active sort keys in insertion order; the first key
//! is the primary one. [`sort_rows`] applies them as a stable ordering over a
//! list of row indices.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::column::{ColumnDef, ColumnId, ColumnType};
use super::date::{parse_date, timestamp_millis};
use super::record::Record;
use super::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

/// Active sort keys, ordered by precedence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SortState {
    keys: IndexMap<ColumnId, SortDirection>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction for a column.
    ///
    /// Without `multiple` every other key is dropped first. With it, the
    /// column is appended, or updated in place if it is already a key.
    pub fn add(&mut self, column: ColumnId, direction: SortDirection, multiple: bool) {
        if !multiple {
            self.keys.clear();
        }
        self.keys.insert(column, direction);
    }

    pub fn remove(&mut self, column: &str) -> Option<SortDirection> {
        self.keys.shift_remove(column)
    }

    pub fn reset(&mut self) {
        self.keys.clear();
    }

    pub fn direction(&self, column: &str) -> Option<SortDirection> {
        self.keys.get(column).copied()
    }

    /// Next direction in the click cycle: none -> asc -> desc -> (none | asc).
    pub fn next_direction(&self, column: &str, allow_unsorted: bool) -> Option<SortDirection> {
        match self.direction(column) {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) if allow_unsorted => None,
            Some(SortDirection::Desc) => Some(SortDirection::Asc),
        }
    }

    /// Advance a column through the click cycle and return its new direction.
    pub fn cycle(
        &mut self,
        column: ColumnId,
        multiple: bool,
        allow_unsorted: bool,
    ) -> Option<SortDirection> {
        let next = self.next_direction(column.as_str(), allow_unsorted);
        match next {
            Some(direction) => self.add(column, direction, multiple),
            None => {
                self.remove(column.as_str());
            }
        }
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnId, SortDirection)> {
        self.keys.iter().map(|(id, dir)| (id, *dir))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A resolved sort key: the column to read and the direction to apply.
pub struct SortKey<'a, R> {
    pub column: &'a ColumnDef<R>,
    pub direction: SortDirection,
}

/// Per-row comparison value for one key.
enum SortValue {
    /// Date columns compare by timestamp; unreadable dates sort as missing.
    Timestamp(Option<i64>),
    Plain(Value),
}

impl SortValue {
    fn extract<R: Record>(column: &ColumnDef<R>, row: &R) -> SortValue {
        let value = column.value(row);
        match column.column_type {
            ColumnType::Date => {
                SortValue::Timestamp(parse_date(&value).map(|d| timestamp_millis(&d)))
            }
            _ if value.is_empty() => SortValue::Plain(Value::Text(String::new())),
            _ => SortValue::Plain(value),
        }
    }

    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Timestamp(a), SortValue::Timestamp(b)) => a.cmp(b),
            (SortValue::Plain(a), SortValue::Plain(b)) => a.sort_cmp(b),
            // Both sides of a key come from the same column.
            _ => Ordering::Equal,
        }
    }
}

/// Stable multi-key sort of `indices` (positions into `rows`).
///
/// Rows that tie on every key keep their incoming relative order.
pub fn sort_rows<R: Record>(rows: &[R], indices: &mut [usize], keys: &[SortKey<'_, R>]) {
    if keys.is_empty() || indices.len() < 2 {
        return;
    }

    let mut keyed: Vec<(Vec<SortValue>, usize)> = indices
        .iter()
        .map(|&i| {
            let values = keys
                .iter()
                .map(|key| SortValue::extract(key.column, &rows[i]))
                .collect();
            (values, i)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        for ((x, y), key) in a.iter().zip(b.iter()).zip(keys) {
            let ord = key.direction.apply(x.compare(y));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    for (slot, (_, i)) in indices.iter_mut().zip(keyed) {
        *slot = i;
    }
}
