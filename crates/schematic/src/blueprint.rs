//! Core `Blueprint` struct.
//!
//! A `Blueprint` is a position-independent snapshot of a structure: a sparse
//! map of relative positions to cell states, plus a sparser map of sanitized
//! auxiliary records. It can be pasted at any anchor with any quarter-turn
//! rotation.

use std::collections::BTreeMap;
use std::fmt;

use crate::aux_record::AuxRecord;
use crate::cell::CellState;
use crate::geometry::{Cardinal, CellPos};

/// Default display name for blueprints captured without one.
pub const UNNAMED_BLUEPRINT: &str = "Untitled";

/// A captured, relocatable structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    /// Human-readable name.
    pub name: String,
    /// Direction the structure was facing when captured.
    pub origin_orientation: Cardinal,
    /// Informational tag describing what was captured. Never branched on.
    pub source_kind: String,
    /// Extra quarter turns applied on every paste (0..=3).
    pub user_rotation_offset: u8,
    /// Cell states keyed by position relative to the capture origin.
    pub cells: BTreeMap<CellPos, CellState>,
    /// Sanitized auxiliary records. Every key must also be a key of `cells`.
    pub auxiliary: BTreeMap<CellPos, AuxRecord>,
}

/// A blueprint that breaks the structural invariants capture guarantees.
///
/// Seeing one means the blueprint was assembled outside `capture` (e.g.
/// hand-edited or decoded from a damaged file). Operations abort rather than
/// guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalInvariantViolation {
    /// An auxiliary record is keyed by a position with no cell.
    OrphanAuxiliary { key: CellPos },
    /// `user_rotation_offset` is outside 0..=3.
    RotationOffsetOutOfRange { offset: u8 },
}

impl fmt::Display for FatalInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalInvariantViolation::OrphanAuxiliary { key } => {
                write!(f, "auxiliary record at {key} has no matching cell")
            }
            FatalInvariantViolation::RotationOffsetOutOfRange { offset } => {
                write!(f, "rotation offset {offset} is outside 0..=3")
            }
        }
    }
}

impl std::error::Error for FatalInvariantViolation {}

impl Blueprint {
    /// An empty blueprint. Capture never returns one of these; it exists for
    /// building blueprints incrementally.
    pub fn new(name: impl Into<String>, origin_orientation: Cardinal) -> Self {
        Self {
            name: name.into(),
            origin_orientation,
            source_kind: String::new(),
            user_rotation_offset: 0,
            cells: BTreeMap::new(),
            auxiliary: BTreeMap::new(),
        }
    }

    pub fn with_source_kind(mut self, source_kind: impl Into<String>) -> Self {
        self.source_kind = source_kind.into();
        self
    }

    pub fn insert_cell(&mut self, pos: CellPos, state: CellState) {
        self.cells.insert(pos, state);
    }

    /// Attach an auxiliary record to an existing cell.
    pub fn insert_aux(
        &mut self,
        pos: CellPos,
        record: AuxRecord,
    ) -> Result<(), FatalInvariantViolation> {
        if !self.cells.contains_key(&pos) {
            return Err(FatalInvariantViolation::OrphanAuxiliary { key: pos });
        }
        self.auxiliary.insert(pos, record);
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check the invariants `capture` guarantees.
    pub fn validate(&self) -> Result<(), FatalInvariantViolation> {
        if self.user_rotation_offset > 3 {
            return Err(FatalInvariantViolation::RotationOffsetOutOfRange {
                offset: self.user_rotation_offset,
            });
        }
        if let Some(key) = self.auxiliary.keys().find(|k| !self.cells.contains_key(k)) {
            return Err(FatalInvariantViolation::OrphanAuxiliary { key: *key });
        }
        Ok(())
    }

    /// Quarter turns actually applied for a paste requesting `requested`.
    pub fn effective_steps(&self, requested: u8) -> u8 {
        (requested % 4 + self.user_rotation_offset % 4) % 4
    }

    /// Requested steps that turn the captured facing onto `target`.
    pub fn steps_to_face(&self, target: Cardinal) -> u8 {
        self.origin_orientation.steps_to(target)
    }

    /// Add `delta` quarter turns to the remembered rotation offset.
    pub fn rotate_offset(&mut self, delta: i32) {
        let current = i32::from(self.user_rotation_offset % 4);
        self.user_rotation_offset = (current + delta).rem_euclid(4) as u8;
    }

    /// Inclusive bounding box of the relative cell keys.
    pub fn bounds(&self) -> Option<(CellPos, CellPos)> {
        let mut keys = self.cells.keys();
        let first = *keys.next()?;
        Some(keys.fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))))
    }
}
