use serde_json::{Map, Value};

/// Rewrite the top-level keys of an object from `camelCase` to `snake_case`.
///
/// Host pages usually spell options the way scripts do (`runtimeVersion`),
/// while the typed configuration uses `runtime_version`. Normalizing before
/// the merge keeps both spellings from landing side by side in the tree.
/// Nested values are left untouched; non-objects are returned unchanged.
#[must_use]
pub fn snake_case_keys(value: Value) -> Value {
    match value {
        Value::Object(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, val)| (to_snake_case(&key), val))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len().saturating_add(4));
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_keys_rewritten() {
        let value = snake_case_keys(json!({
            "runtimeVersion": "0.22.0",
            "modules": ["x.py"],
            "nested": {"innerKey": 1}
        }));
        assert_eq!(
            value,
            json!({
                "runtime_version": "0.22.0",
                "modules": ["x.py"],
                "nested": {"innerKey": 1}
            })
        );
    }

    #[test]
    fn test_snake_keys_untouched() {
        let value = json!({"root_module": "__init__.py"});
        assert_eq!(snake_case_keys(value.clone()), value);
    }
}
