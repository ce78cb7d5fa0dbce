use serde_json::{Map, Value};

/// Deep-merge `overlay` over `base`, producing a fresh tree.
///
/// - Objects merge recursively per key.
/// - Arrays concatenate: base items first, then overlay items. Duplicates
///   are kept.
/// - Anything else from the overlay **replaces** the base value.
///
/// Neither input is modified.
#[must_use]
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Array(base_items), Value::Array(overlay_items)) => {
            Value::Array(base_items.iter().chain(overlay_items).cloned().collect())
        },
        (Value::Object(base_table), Value::Object(overlay_table)) => {
            let mut merged = base_table.clone();
            for (key, overlay_val) in overlay_table {
                let value = match base_table.get(key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => overlay_val.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        },
        (_, overlay) => overlay.clone(),
    }
}

/// Fold [`deep_merge`] over `layers` from left to right, starting from an
/// empty object. Later layers win.
#[must_use]
pub fn deep_merge_all<'a>(layers: impl IntoIterator<Item = &'a Value>) -> Value {
    layers
        .into_iter()
        .fold(Value::Object(Map::new()), |acc, layer| deep_merge(&acc, layer))
}
