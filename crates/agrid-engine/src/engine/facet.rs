//! Filter facets: the values a filter widget can offer for a column.
//!
//! Facets are always computed from the unfiltered rows so a widget keeps
//! showing every option while its own filter is active.

use indexmap::IndexMap;
use serde::Serialize;

use super::column::{ColumnDef, FilterType};
use super::date::parse_date;
use super::filter::{DateRange, NumberRange};
use super::record::Record;
use super::value::Value;

/// One selectable value with its label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum FilterFacet {
    Select(Vec<SelectOption>),
    Number(Option<NumberRange>),
    Date(Option<DateRange>),
}

/// Derive the facet for `column` from `rows`, by the column's filter type.
///
/// Custom filters have no facet of their own and get the select facet.
pub fn column_facet<R: Record>(column: &ColumnDef<R>, rows: &[R]) -> FilterFacet {
    match column.filter_type {
        FilterType::Number => FilterFacet::Number(number_facet(column, rows)),
        FilterType::Date => FilterFacet::Date(date_facet(column, rows)),
        FilterType::Select | FilterType::Custom => FilterFacet::Select(select_facet(column, rows)),
    }
}

/// Distinct non-empty values sorted by label. The label of a value comes
/// from the first row it appears in.
fn select_facet<R: Record>(column: &ColumnDef<R>, rows: &[R]) -> Vec<SelectOption> {
    let mut seen: IndexMap<Value, String> = IndexMap::new();
    for row in rows {
        let cell = column.value(row);
        // A display formatter labels the whole cell; otherwise each value
        // labels itself, which keeps multi-valued cells readable.
        let row_label = column
            .display
            .as_ref()
            .map(|display| display(row).to_string());
        for value in cell.as_list() {
            if value.is_empty() || seen.contains_key(value) {
                continue;
            }
            let label = row_label.clone().unwrap_or_else(|| value.to_string());
            seen.insert(value.clone(), label);
        }
    }

    let mut options: Vec<SelectOption> = seen
        .into_iter()
        .map(|(value, label)| SelectOption { label, value })
        .collect();
    options.sort_by(|a, b| a.label.cmp(&b.label));
    options
}

fn number_facet<R: Record>(column: &ColumnDef<R>, rows: &[R]) -> Option<NumberRange> {
    let mut range: Option<NumberRange> = None;
    for row in rows {
        let cell = column.value(row);
        for n in cell.as_list().iter().filter_map(Value::as_f64) {
            match range.as_mut() {
                Some(r) => {
                    r.min = r.min.min(n);
                    r.max = r.max.max(n);
                }
                None => range = Some(NumberRange::new(n, n)),
            }
        }
    }
    range
}

fn date_facet<R: Record>(column: &ColumnDef<R>, rows: &[R]) -> Option<DateRange> {
    let mut range: Option<DateRange> = None;
    for row in rows {
        let cell = column.value(row);
        for value in cell.as_list() {
            if value.is_empty() {
                continue;
            }
            let Some(date) = parse_date(value) else {
                tracing::trace!(target: "agrid_engine::facet", %value, "skipping unparseable date");
                continue;
            };
            match range.as_mut() {
                Some(r) => {
                    r.start = r.start.min(date);
                    r.end = r.end.max(date);
                }
                None => range = Some(DateRange::new(date, date)),
            }
        }
    }
    range
}
