//! Output formatting utilities.

use std::collections::BTreeMap;

use flatprefs_storage::StoredValue;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::Result;
use crate::OutputFormat;

/// A stored key and the kind of value behind it.
#[derive(Tabled)]
pub struct KeyRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
}

/// A stored key with its value.
#[derive(Tabled)]
pub struct EntryRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Format key listings.
pub fn format_keys(entries: &BTreeMap<String, StoredValue>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            if entries.is_empty() {
                return Ok("(0 keys)".to_string());
            }
            let rows = entries
                .iter()
                .map(|(key, value)| KeyRow { key: key.clone(), kind: value.kind().to_string() });
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            Ok(format!("{table}\n({} keys)", entries.len()))
        }
        OutputFormat::Json => {
            let obj: serde_json::Map<String, serde_json::Value> = entries
                .iter()
                .map(|(key, value)| (key.clone(), serde_json::Value::from(value.kind().to_string())))
                .collect();
            Ok(serde_json::to_string_pretty(&obj)?)
        }
    }
}

/// Format key/value dumps.
pub fn format_entries(
    entries: &BTreeMap<String, StoredValue>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Table => {
            if entries.is_empty() {
                return Ok("(0 keys)".to_string());
            }
            let rows = entries.iter().map(|(key, value)| EntryRow {
                key: key.clone(),
                kind: value.kind().to_string(),
                value: format_value(value),
            });
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            Ok(format!("{table}\n({} keys)", entries.len()))
        }
        OutputFormat::Json => {
            let obj: serde_json::Map<String, serde_json::Value> =
                entries.iter().map(|(key, value)| (key.clone(), value_to_json(value))).collect();
            Ok(serde_json::to_string_pretty(&obj)?)
        }
    }
}

/// Format a single stored value.
pub fn format_single(value: &StoredValue, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_value(value)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&value_to_json(value))?),
    }
}

/// Format a stored value for display.
pub fn format_value(value: &StoredValue) -> String {
    match value {
        StoredValue::String(s) => s.clone(),
        StoredValue::StringSet(set) => {
            let members: Vec<&str> =
                set.iter().map(|member| member.as_deref().unwrap_or("NULL")).collect();
            format!("{{{}}}", members.join(", "))
        }
        other => other.to_string(),
    }
}

/// Convert a stored value to JSON.
pub fn value_to_json(value: &StoredValue) -> serde_json::Value {
    match value {
        StoredValue::Bool(b) => serde_json::Value::Bool(*b),
        StoredValue::Int(i) => serde_json::Value::from(*i),
        StoredValue::Long(l) => serde_json::Value::from(*l),
        StoredValue::Float(f) => serde_json::Number::from_f64(f64::from(*f))
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        StoredValue::String(s) => serde_json::Value::String(s.clone()),
        StoredValue::StringSet(set) => serde_json::Value::Array(
            set.iter()
                .map(|member| member.clone().map_or(serde_json::Value::Null, serde_json::Value::String))
                .collect(),
        ),
    }
}
