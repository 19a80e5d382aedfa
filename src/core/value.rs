//! String coercion and flattening of `config::Value`.

use config::{Value, ValueKind};
use std::collections::HashMap;

/// Render a value the way listeners and string lookups see it.
///
/// Nil yields `None`; arrays are joined with `,`; tables render as
/// `{k=v, ...}` with sorted keys.
pub fn value_to_string(value: &Value) -> Option<String> {
    match &value.kind {
        ValueKind::Nil => None,
        ValueKind::Array(items) => Some(
            items
                .iter()
                .filter_map(value_to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        ValueKind::Table(table) => {
            let mut entries: Vec<_> = table
                .iter()
                .map(|(k, v)| format!("{}={}", k, value_to_string(v).unwrap_or_default()))
                .collect();
            entries.sort();
            Some(format!("{{{}}}", entries.join(", ")))
        }
        _ => value.clone().into_string().ok(),
    }
}

/// Flatten nested tables into dotted keys, e.g. `ssl: {enabled: true}` into
/// `ssl.enabled = "true"`. Later entries for the same key overwrite earlier ones.
pub fn flatten_into(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match &value.kind {
        ValueKind::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(&path, child, out);
            }
        }
        _ => {
            if let Some(text) = value_to_string(value) {
                out.insert(prefix.to_string(), text);
            }
        }
    }
}
