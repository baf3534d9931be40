//! Payload normalization
//!
//! The stock API has returned both an array of item objects and an object keyed
//! by item name, with the count under either `stock` or `quantity`. Everything is
//! reduced here to one [`CategoryItems`] map.

use serde_json::{Map, Value};

use crate::model::{CategoryItems, ItemRecord};

/// The payload shapes the stock API is known to return
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// `[{"name": "Carrot", "stock": 3}, ...]`
    List(Vec<Value>),
    /// `{"Carrot": {"stock": 3}, ...}`
    Keyed(Map<String, Value>),
    /// Anything else; carries the JSON type name for logging
    Unrecognized(&'static str),
}

impl From<Value> for RawPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => RawPayload::List(items),
            Value::Object(map) => RawPayload::Keyed(map),
            Value::Null => RawPayload::Unrecognized("null"),
            Value::Bool(_) => RawPayload::Unrecognized("boolean"),
            Value::Number(_) => RawPayload::Unrecognized("number"),
            Value::String(_) => RawPayload::Unrecognized("string"),
        }
    }
}

impl RawPayload {
    /// Reduce the payload to canonical item records keyed by name
    pub fn normalize(&self) -> CategoryItems {
        match self {
            RawPayload::List(items) => normalize_list(items),
            RawPayload::Keyed(map) => normalize_keyed(map),
            RawPayload::Unrecognized(kind) => {
                log::warn!("Unrecognized stock payload ({}), treating as empty", kind);
                CategoryItems::new()
            }
        }
    }
}

fn normalize_list(items: &[Value]) -> CategoryItems {
    let mut out = CategoryItems::new();

    for item in items {
        let Some(fields) = item.as_object() else {
            log::debug!("Skipping non-object list entry: {}", item);
            continue;
        };
        let Some(name) = fields.get("name").and_then(item_name) else {
            log::debug!("Skipping list entry without a name: {}", item);
            continue;
        };
        let record = ItemRecord::new(name, record_stock(fields));
        out.insert(record.name.clone(), record);
    }

    out
}

fn normalize_keyed(map: &Map<String, Value>) -> CategoryItems {
    let mut out = CategoryItems::new();

    for (key, value) in map {
        // Scalars next to the items are metadata such as `updatedAt`
        let Some(fields) = value.as_object() else {
            log::debug!("Skipping keyed entry {} with value {}", key, value);
            continue;
        };
        let name = fields
            .get("name")
            .and_then(item_name)
            .unwrap_or_else(|| key.clone());
        let record = ItemRecord::new(name, record_stock(fields));
        out.insert(record.name.clone(), record);
    }

    out
}

fn item_name(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `stock` wins over its `quantity` alias when both are present
fn record_stock(fields: &Map<String, Value>) -> Option<i64> {
    fields
        .get("stock")
        .or_else(|| fields.get("quantity"))
        .and_then(parse_stock)
}

/// Integer, integral float, or numeric string; anything else is absent
fn parse_stock(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
