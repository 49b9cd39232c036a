//! Filter selections and their query-string form

use serde::Serialize;
use serde_json::Value;

/// A view's filter/sort selection
///
/// `set_filters` merges a `Patch` onto the current selection; the merged
/// selection is sent with every page request as query parameters.
pub trait Filters: Clone + Default + Serialize + Send + Sync + 'static {
    /// Partial update accepted by `set_filters`
    type Patch: Send;

    /// Merge a partial update onto the current selection
    fn merge(&mut self, patch: Self::Patch);

    /// Query parameters for this selection, empty values omitted
    fn query_pairs(&self) -> Vec<(String, String)> {
        query_pairs(self)
    }
}

/// Serialize a value into query parameters
///
/// Top-level fields that are `null` or empty strings are dropped. Strings
/// are sent unquoted, numbers and booleans as their JSON text, arrays as a
/// comma separated list. Keys come out in sorted order.
pub fn query_pairs<S: Serialize + ?Sized>(value: &S) -> Vec<(String, String)> {
    let Ok(Value::Object(map)) = serde_json::to_value(value) else {
        return Vec::new();
    };

    map.into_iter()
        .filter_map(|(key, value)| query_value(&value).map(|v| (key, v)))
        .collect()
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(query_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(","))
            }
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Filters for views that have no selection
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct NoFilters;

impl Filters for NoFilters {
    type Patch = ();

    fn merge(&mut self, _patch: ()) {}

    fn query_pairs(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Overwrite `slot` when the patch carries a value
pub(crate) fn apply<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
