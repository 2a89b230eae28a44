//! Per-column filters joined by boolean combinators.
//!
//! Each active filter carries a [`FilterCondition`] that says how it joins the
//! result accumulated from the filters before it. The accumulator starts from
//! the first filter's condition: `OR` starts from `false`, anything else from
//! `true`.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::column::{ColumnDef, ColumnId, FilterType};
use super::date::parse_date;
use super::record::Record;
use super::value::Value;

/// How a filter joins the filters before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterCondition {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    /// Section-mode grouping; evaluates like `AND`.
    #[serde(rename = "OR_GROUP")]
    OrGroup,
}

impl FilterCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterCondition::And => "AND",
            FilterCondition::Or => "OR",
            FilterCondition::OrGroup => "OR_GROUP",
        }
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FilterCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AND" => Ok(FilterCondition::And),
            "OR" => Ok(FilterCondition::Or),
            "OR_GROUP" => Ok(FilterCondition::OrGroup),
            _ => Err(format!("Invalid filter condition: {}", s)),
        }
    }
}

/// Combinators offered for the current display mode.
pub fn filter_conditions(section_mode: bool) -> Vec<FilterCondition> {
    let mut conditions = vec![FilterCondition::And, FilterCondition::Or];
    if section_mode {
        conditions.push(FilterCondition::OrGroup);
    }
    conditions
}

/// Inclusive numeric range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
}

impl NumberRange {
    pub fn new(min: f64, max: f64) -> Self {
        NumberRange { min, max }
    }

    pub fn contains(&self, n: f64) -> bool {
        n >= self.min && n <= self.max
    }
}

/// Inclusive date range, compared at day granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        DateRange { start, end }
    }

    /// Time of day is ignored on both the value and the bounds.
    pub fn contains_day(&self, date: &NaiveDateTime) -> bool {
        let day = date.date();
        day >= self.start.date() && day <= self.end.date()
    }
}

/// Filter operand, by filter kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FilterValue {
    /// Allowed values.
    Select(Vec<Value>),
    Number(NumberRange),
    Date(DateRange),
    /// Operand handed to the column's custom predicate.
    Custom(Value),
}

impl FilterValue {
    /// An empty operand means "no filter".
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Select(values) => values.is_empty(),
            FilterValue::Custom(value) => value.is_empty() || value.as_list().is_empty(),
            FilterValue::Number(_) | FilterValue::Date(_) => false,
        }
    }

    /// Can this operand filter a column of `filter_type`? Custom columns
    /// also take a list of values, like select columns.
    pub fn fits(&self, filter_type: FilterType) -> bool {
        matches!(
            (self, filter_type),
            (FilterValue::Select(_), FilterType::Select | FilterType::Custom)
                | (FilterValue::Number(_), FilterType::Number)
                | (FilterValue::Date(_), FilterType::Date)
                | (FilterValue::Custom(_), FilterType::Custom)
        )
    }
}

/// An active filter on one column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub value: FilterValue,
    #[serde(default)]
    pub condition: FilterCondition,
    /// Empty cells pass regardless of the operand.
    #[serde(default)]
    pub show_empty: bool,
}

impl ColumnFilter {
    pub fn new(value: FilterValue) -> Self {
        ColumnFilter {
            value,
            condition: FilterCondition::And,
            show_empty: false,
        }
    }

    pub fn select(values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::new(FilterValue::Select(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn number(min: f64, max: f64) -> Self {
        Self::new(FilterValue::Number(NumberRange::new(min, max)))
    }

    pub fn date(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::new(FilterValue::Date(DateRange::new(start, end)))
    }

    pub fn custom(value: impl Into<Value>) -> Self {
        Self::new(FilterValue::Custom(value.into()))
    }

    pub fn condition(mut self, condition: FilterCondition) -> Self {
        self.condition = condition;
        self
    }

    pub fn show_empty(mut self, show_empty: bool) -> Self {
        self.show_empty = show_empty;
        self
    }
}

/// Active filters in the order they were first set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    filters: IndexMap<ColumnId, ColumnFilter>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace a column's filter. A replaced filter keeps its position.
    pub fn set(&mut self, column: ColumnId, filter: ColumnFilter) {
        self.filters.insert(column, filter);
    }

    pub fn remove(&mut self, column: &str) -> Option<ColumnFilter> {
        self.filters.shift_remove(column)
    }

    pub fn reset(&mut self) {
        self.filters.clear();
    }

    pub fn get(&self, column: &str) -> Option<&ColumnFilter> {
        self.filters.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnId, &ColumnFilter)> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// A filter resolved against its column definition.
pub struct ActiveFilter<'a, R> {
    pub column: &'a ColumnDef<R>,
    pub filter: &'a ColumnFilter,
}

/// Does one column of `row` satisfy its filter?
///
/// Multi-valued cells match when any of their values does.
pub fn column_matches<R: Record>(column: &ColumnDef<R>, filter: &ColumnFilter, row: &R) -> bool {
    let cell = column.value(row);
    let values = cell.as_list();
    if filter.show_empty && values.iter().any(Value::is_empty) {
        return true;
    }
    values
        .iter()
        .any(|value| value_matches(column, &filter.value, value))
}

fn value_matches<R>(column: &ColumnDef<R>, operand: &FilterValue, value: &Value) -> bool {
    if column.filter_type == FilterType::Custom {
        if let Some(predicate) = &column.custom_filter {
            return match operand {
                FilterValue::Select(allowed) => allowed.iter().any(|v| predicate(value, v)),
                FilterValue::Custom(expected) => predicate(value, expected),
                FilterValue::Number(_) | FilterValue::Date(_) => false,
            };
        }
    }
    match operand {
        FilterValue::Select(allowed) => allowed.contains(value),
        FilterValue::Number(range) => value.as_f64().is_some_and(|n| range.contains(n)),
        FilterValue::Date(range) => parse_date(value).is_some_and(|d| range.contains_day(&d)),
        // No predicate to consult.
        FilterValue::Custom(_) => true,
    }
}

/// Evaluate all active filters against one row.
pub fn row_matches<R: Record>(row: &R, filters: &[ActiveFilter<'_, R>]) -> bool {
    let mut result = true;
    for (i, active) in filters.iter().enumerate() {
        let condition = active.filter.condition;
        if i == 0 {
            result = condition != FilterCondition::Or;
        }
        result = match condition {
            FilterCondition::Or => result || column_matches(active.column, active.filter, row),
            FilterCondition::And | FilterCondition::OrGroup => {
                result && column_matches(active.column, active.filter, row)
            }
        };
    }
    result
}

/// Indices of the rows that pass every active filter, in their original order.
pub fn filter_rows<R: Record>(rows: &[R], filters: &[ActiveFilter<'_, R>]) -> Vec<usize> {
    if filters.is_empty() {
        return (0..rows.len()).collect();
    }
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_matches(*row, filters))
        .map(|(i, _)| i)
        .collect()
}
