//! Declarative column schemas (TOML / JSON).
//!
//! A schema describes the column tree without accessor closures:
//!
//! ```toml
//! [[columns]]
//! field = "name"
//!
//! [[columns]]
//! title = "Address"
//! collapsed = true
//!
//!   [[columns.columns]]
//!   field = "city"
//!
//!   [[columns.columns]]
//!   field = "street"
//!   hide_in_collapse = true
//! ```

use agrid_engine::engine::{ColumnDef, ColumnType, FilterType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{GridError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnSchema {
    pub field: String,
    pub title: Option<String>,
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub filter: FilterType,
    pub collapsed: bool,
    pub hide_in_collapse: bool,
    pub frozen: bool,
    pub columns: Vec<ColumnSchema>,
}

impl ColumnSchema {
    /// Convert into a column definition. Schemas carry no accessors, so the
    /// definition reads its value by `field`.
    pub fn into_def<R>(self) -> ColumnDef<R> {
        let mut def = ColumnDef::new(self.field)
            .column_type(self.column_type)
            .filter_type(self.filter)
            .collapsed(self.collapsed)
            .hide_in_collapse(self.hide_in_collapse)
            .frozen(self.frozen)
            .columns(self.columns.into_iter().map(ColumnSchema::into_def));
        if let Some(title) = self.title {
            def = def.title(title);
        }
        if let Some(key) = self.key {
            def = def.key(key);
        }
        def
    }

    fn id(&self) -> Option<&str> {
        [self.key.as_deref(), Some(self.field.as_str()), self.title.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    columns: Vec<ColumnSchema>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSchema {
    List(Vec<ColumnSchema>),
    File(SchemaFile),
}

/// Parse a TOML schema (a `[[columns]]` array of tables).
pub fn parse_schema_toml(content: &str) -> Result<Vec<ColumnSchema>> {
    let file: SchemaFile = toml::from_str(content)?;
    validate(&file.columns)?;
    Ok(file.columns)
}

/// Parse a JSON schema: either a bare array or `{"columns": [...]}`.
pub fn parse_schema_json(content: &str) -> Result<Vec<ColumnSchema>> {
    let columns = match serde_json::from_str::<JsonSchema>(content)? {
        JsonSchema::List(columns) => columns,
        JsonSchema::File(file) => file.columns,
    };
    validate(&columns)?;
    Ok(columns)
}

/// Load a schema file, choosing the format by extension (`.json`, else TOML).
pub fn load_schema(path: &Path) -> Result<Vec<ColumnSchema>> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_schema_json(&content)
    } else {
        parse_schema_toml(&content)
    }
}

/// Every column needs an identity, and identities must be unique.
fn validate(columns: &[ColumnSchema]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut stack: Vec<(&ColumnSchema, usize)> = columns.iter().map(|c| (c, 0)).collect();
    while let Some((column, depth)) = stack.pop() {
        let Some(id) = column.id() else {
            return Err(GridError::Schema(format!(
                "column at depth {} has no field, key or title",
                depth
            )));
        };
        if !seen.insert(id) {
            return Err(GridError::Schema(format!("duplicate column id: {}", id)));
        }
        stack.extend(column.columns.iter().map(|c| (c, depth + 1)));
    }
    Ok(())
}
