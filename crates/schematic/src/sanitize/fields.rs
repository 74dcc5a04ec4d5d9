//! Field classification tables.
//!
//! Every field name the sanitizer knows about is listed exactly once below.
//! Anything not listed is unclassified and dropped.

use serde_json::{Map, Value};

/// Top-level configuration fields every kind keeps.
pub const PLAIN_CONFIG: &[&str] = &[
    "config",
    "filter",
    "mode",
    "custom_name",
    "label",
    "color",
    "locked",
    "settings",
    "redstone_mode",
];

/// Extra configuration fields for network-integrated cells.
pub const NETWORK_CONFIG: &[&str] = &[
    "priority",
    "access",
    "channel",
    "whitelist",
    "blacklist",
    "fuzzy",
    "crafting_mode",
];

/// Configuration fields inside a composite slot document.
pub const SLOT_CONFIG: &[&str] = &["config", "filter", "locked", "mode", "type"];

/// Capacity/shape metadata kept on buffer containers.
pub const BUFFER_METADATA: &[&str] = &["size", "capacity", "shape", "type", "rows", "columns"];

/// Fields that hold currently-possessed quantities. Always dropped.
pub const QUANTITY_FIELDS: &[&str] = &[
    "stock",
    "count",
    "amount",
    "items",
    "contents",
    "energy",
    "fluid",
    "fluid_amount",
    "progress",
    "stored",
    "experience",
];

/// Array of slot documents on composite cells.
pub const SLOTS_FIELD: &str = "slots";
/// A single buffer container.
pub const BUFFER_FIELD: &str = "buffer";
/// Array of buffer containers on composite and networked cells.
pub const BUFFERS_FIELD: &str = "buffers";
/// Content list inside a buffer container.
pub const BUFFER_CONTENTS: &str = "items";
/// Slot type discriminator.
pub const SLOT_TYPE: &str = "type";
/// Discriminator value for a slot that holds nothing.
pub const EMPTY_SLOT_TYPE: &str = "empty";

/// Whether `key` appears in `list`.
pub fn is_listed(list: &[&str], key: &str) -> bool {
    list.iter().any(|f| *f == key)
}

/// Copy of `value` with every quantity field removed, at any depth.
///
/// Kept configuration values are free-form, so a quantity can hide inside a
/// nested object (`{"settings": {"stock": 5}}`) or an array of objects.
pub fn strip_quantities(value: &Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(key, _)| !is_listed(QUANTITY_FIELDS, key))
                .map(|(key, v)| (key.clone(), strip_quantities(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_quantities).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_quantities_reaches_every_depth() {
        let raw = json!({
            "mode": "x",
            "stock": 1,
            "inner": {"count": 2, "rules": [{"filter": "a", "amount": 3}, 7]},
        });
        assert_eq!(
            strip_quantities(&raw),
            json!({"mode": "x", "inner": {"rules": [{"filter": "a"}, 7]}})
        );
    }

    #[test]
    fn test_strip_quantities_leaves_scalars() {
        assert_eq!(strip_quantities(&json!("stock")), json!("stock"));
        assert_eq!(strip_quantities(&json!(42)), json!(42));
    }
}
