//! Composite multi-slot records.
//!
//! Each slot is sanitized on its own. A slot that ends up with no
//! configuration still occupies its array position and carries the
//! `{"type": "empty"}` placeholder consumers need to rebuild the slot list.

use serde_json::{Map, Value};

use super::fields::{is_listed, strip_quantities, EMPTY_SLOT_TYPE, SLOT_CONFIG, SLOT_TYPE};

/// Sanitize a single slot document.
pub fn sanitize_slot(raw: &Value) -> Value {
    let mut out = Map::new();
    if let Value::Object(fields) = raw {
        for (key, value) in fields {
            if is_listed(SLOT_CONFIG, key) {
                out.insert(key.clone(), strip_quantities(value));
            }
        }
    }
    if out.is_empty() {
        out.insert(
            SLOT_TYPE.to_string(),
            Value::String(EMPTY_SLOT_TYPE.to_string()),
        );
    }
    Value::Object(out)
}

pub fn sanitize_slots(raw: &[Value]) -> Value {
    Value::Array(raw.iter().map(sanitize_slot).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slot_keeps_config_drops_stock() {
        assert_eq!(
            sanitize_slot(&json!({"config": "filterA", "stock": 64})),
            json!({"config": "filterA"})
        );
    }

    #[test]
    fn test_emptied_slot_gets_placeholder() {
        assert_eq!(sanitize_slot(&json!({"stock": 0})), json!({"type": "empty"}));
        assert_eq!(sanitize_slot(&Value::Null), json!({"type": "empty"}));
    }

    #[test]
    fn test_existing_type_is_kept() {
        assert_eq!(
            sanitize_slot(&json!({"type": "fluid", "amount": 1000})),
            json!({"type": "fluid"})
        );
    }

    #[test]
    fn test_nested_slot_config_loses_quantities() {
        assert_eq!(
            sanitize_slot(&json!({"config": {"filter": "a", "count": 555}})),
            json!({"config": {"filter": "a"}})
        );
    }

    #[test]
    fn test_slot_positions_survive() {
        let out = sanitize_slots(&[
            json!({"stock": 3}),
            json!({"filter": "copper", "count": 12}),
        ]);
        assert_eq!(out, json!([{"type": "empty"}, {"filter": "copper"}]));
    }
}
