//! Buffer containers: holding areas for currently-possessed resources.
//!
//! The container's capacity and shape survive so the consumer can rebuild a
//! handler of the same size; the content list is always replaced by `[]`.

use serde_json::{Map, Value};

use super::fields::{is_listed, strip_quantities, BUFFER_CONTENTS, BUFFER_METADATA};

/// Sanitize one buffer document. Non-object values become an empty buffer.
pub fn sanitize_buffer(raw: &Value) -> Value {
    let mut out = Map::new();
    if let Value::Object(fields) = raw {
        for (key, value) in fields {
            if key == BUFFER_CONTENTS {
                out.insert(key.clone(), Value::Array(Vec::new()));
            } else if is_listed(BUFFER_METADATA, key) {
                out.insert(key.clone(), strip_quantities(value));
            }
        }
    }
    if !out.contains_key(BUFFER_CONTENTS) {
        out.insert(BUFFER_CONTENTS.to_string(), Value::Array(Vec::new()));
    }
    Value::Object(out)
}

/// Sanitize an array of buffers, keeping array positions.
pub fn sanitize_buffers(raw: &[Value]) -> Value {
    Value::Array(raw.iter().map(sanitize_buffer).collect())
}
