//! Auxiliary-data sanitizer.
//!
//! Captured cells may carry extended data describing both how they are
//! configured and what they currently hold. Only the former may be copied: a
//! pasted chest must not arrive full. Each `CellKind` resolves to a
//! `Sanitizable` implementation with its own allow-list; everything not on
//! the list is dropped (fail-closed).

pub mod buffer;
pub mod fields;
pub mod slots;


use bevy::log::debug;
use serde_json::Value;

use crate::aux_record::AuxRecord;
use crate::cell::CellKind;

pub use buffer::{sanitize_buffer, sanitize_buffers};
pub use slots::{sanitize_slot, sanitize_slots};

use fields::{
    is_listed, strip_quantities, BUFFERS_FIELD, BUFFER_FIELD, NETWORK_CONFIG, PLAIN_CONFIG,
    QUANTITY_FIELDS, SLOTS_FIELD,
};

/// How a top-level field is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Desired behavior or settings. Copied.
    Configuration,
    /// Structure the consumer needs (slot arrays, buffer containers).
    /// Rebuilt with quantities removed.
    Structural,
    /// A currently-held countable resource. Dropped.
    Quantity,
    /// Not on any list. Dropped.
    Unclassified,
}

/// Per-kind sanitization behavior.
pub trait Sanitizable: Sync {
    /// Tables of top-level configuration fields this kind keeps. Quantity
    /// fields nested inside a kept value are still removed.
    fn configuration_tables(&self) -> &'static [&'static [&'static str]];

    /// Whether the kind has a `slots` array.
    fn has_slots(&self) -> bool {
        false
    }

    /// Whether the kind has a `buffers` array.
    fn has_buffer_list(&self) -> bool {
        false
    }

    fn classify(&self, key: &str) -> FieldClass {
        if key == BUFFER_FIELD
            || (key == SLOTS_FIELD && self.has_slots())
            || (key == BUFFERS_FIELD && self.has_buffer_list())
        {
            FieldClass::Structural
        } else if self
            .configuration_tables()
            .iter()
            .any(|table| is_listed(table, key))
        {
            FieldClass::Configuration
        } else if is_listed(QUANTITY_FIELDS, key) {
            FieldClass::Quantity
        } else {
            FieldClass::Unclassified
        }
    }

    fn sanitize(&self, raw: &AuxRecord) -> AuxRecord {
        let mut out = AuxRecord::new();
        for (key, value) in raw.iter() {
            match self.classify(key) {
                FieldClass::Configuration => out.insert(key.clone(), strip_quantities(value)),
                FieldClass::Structural => {
                    if let Some(rebuilt) = rebuild_structural(key, value) {
                        out.insert(key.clone(), rebuilt);
                    }
                }
                FieldClass::Quantity => debug!("sanitize: dropping quantity field '{}'", key),
                FieldClass::Unclassified => {
                    debug!("sanitize: dropping unclassified field '{}'", key)
                }
            }
        }
        out
    }
}

fn rebuild_structural(key: &str, value: &Value) -> Option<Value> {
    match (key, value) {
        (BUFFER_FIELD, v) => Some(sanitize_buffer(v)),
        (BUFFERS_FIELD, Value::Array(items)) => Some(sanitize_buffers(items)),
        (SLOTS_FIELD, Value::Array(items)) => Some(sanitize_slots(items)),
        // A slot or buffer list that is not a list cannot be rebuilt.
        _ => None,
    }
}

// =============================================================================
// Kinds
// =============================================================================

/// Ordinary cells.
pub struct PlainSanitizer;

impl Sanitizable for PlainSanitizer {
    fn configuration_tables(&self) -> &'static [&'static [&'static str]] {
        &[PLAIN_CONFIG]
    }
}

/// Network-integrated cells: plain config plus network settings.
pub struct NetworkSanitizer;

impl Sanitizable for NetworkSanitizer {
    fn configuration_tables(&self) -> &'static [&'static [&'static str]] {
        &[PLAIN_CONFIG, NETWORK_CONFIG]
    }

    fn has_buffer_list(&self) -> bool {
        true
    }
}

/// Multi-slot cells.
pub struct CompositeSanitizer;

impl Sanitizable for CompositeSanitizer {
    fn configuration_tables(&self) -> &'static [&'static [&'static str]] {
        &[PLAIN_CONFIG]
    }

    fn has_slots(&self) -> bool {
        true
    }

    fn has_buffer_list(&self) -> bool {
        true
    }
}

/// Fluid sources carry no configuration at all.
pub struct FluidSanitizer;

impl Sanitizable for FluidSanitizer {
    fn configuration_tables(&self) -> &'static [&'static [&'static str]] {
        &[]
    }

    fn classify(&self, key: &str) -> FieldClass {
        if is_listed(QUANTITY_FIELDS, key) {
            FieldClass::Quantity
        } else {
            FieldClass::Unclassified
        }
    }
}

impl CellKind {
    /// The sanitizer for this kind.
    pub fn sanitizer(&self) -> &'static dyn Sanitizable {
        match self {
            CellKind::Plain => &PlainSanitizer,
            CellKind::Networked => &NetworkSanitizer,
            CellKind::Composite => &CompositeSanitizer,
            CellKind::FluidSource { .. } => &FluidSanitizer,
        }
    }
}

/// Strip quantity-bearing data from `raw` according to `kind`. Pure; never
/// fails.
pub fn sanitize(raw: &AuxRecord, kind: &CellKind) -> AuxRecord {
    kind.sanitizer().sanitize(raw)
}
