//! Records as served by the API and as displayed by the grid

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::Indexes;

/// Field values sent with create/update requests.
pub type Fields = serde_json::Map<String, Value>;

/// A record exactly as the server returns it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawRecord {
    pub receipt_id: Value,
    #[serde(default)]
    pub date: Value,
    #[serde(default)]
    pub seller_id: Value,
    #[serde(default)]
    pub customer_id: Value,
    #[serde(default)]
    pub total_amount: Value,
}

/// One page of raw records plus the server-side total.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPage {
    pub total: usize,
    #[serde(default)]
    pub items: Vec<RawRecord>,
}

/// A display record: column name to value, with foreign keys resolved.
///
/// Records are rebuilt on every fetch and never mutated once rendered.
///
/// # Example
///
/// ```
/// use salesgrid_lib::model::Record;
///
/// let record = Record::new()
///     .set("id", 7)
///     .set("seller", "Alice");
/// assert_eq!(record.key().as_deref(), Some("7"));
/// assert_eq!(record.display("seller"), "Alice");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field (builder style).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The record's `id` field.
    pub fn id(&self) -> Option<&Value> {
        self.get("id")
    }

    /// The record id as a string key for update/delete calls.
    pub fn key(&self) -> Option<String> {
        self.id().filter(|v| !v.is_null()).map(value_key)
    }

    /// Display text for a field; missing and null fields are empty.
    pub fn display(&self, field: &str) -> String {
        self.get(field).map(display_value).unwrap_or_default()
    }

    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Denormalizes a raw server record, replacing seller/customer ids with
    /// their display names.
    ///
    /// Without indexes the display values come out as `null`.
    pub fn from_raw(raw: RawRecord, indexes: Option<&Indexes>) -> Self {
        let lookup = |table: &str, id: &Value| -> Value {
            indexes
                .and_then(|idx| idx.get(table))
                .and_then(|t| t.get(id))
                .map(|name| Value::String(name.to_string()))
                .unwrap_or(Value::Null)
        };

        let seller = lookup(Indexes::SELLERS, &raw.seller_id);
        let customer = lookup(Indexes::CUSTOMERS, &raw.customer_id);

        Self::new()
            .set("id", raw.receipt_id)
            .set("date", raw.date)
            .set("seller", seller)
            .set("customer", customer)
            .set("total", raw.total_amount)
    }
}

/// A denormalized page ready for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    pub total: usize,
    pub items: Vec<Record>,
}

/// Renders a JSON value the way a table cell shows it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders a JSON value as a lookup key (ids may arrive as numbers or strings).
pub fn value_key(value: &Value) -> String {
    display_value(value)
}
