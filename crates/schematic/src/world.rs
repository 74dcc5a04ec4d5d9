//! World accessor interface and the in-memory sparse `CellGrid`.
//!
//! The clipboard only ever touches a world through `WorldAccess`. `CellGrid`
//! is the implementation used by the Bevy plugin and the tests.

use std::collections::{HashMap, HashSet};
use std::fmt;

use bevy::prelude::Resource;

use crate::agent::AgentId;
use crate::aux_record::AuxRecord;
use crate::cell::{BlockId, CellState};
use crate::config::{WORLD_HORIZONTAL_LIMIT, WORLD_MAX_Y, WORLD_MIN_Y};
use crate::geometry::CellPos;

/// A single-cell write that the world refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    OutOfBounds(CellPos),
    /// The world vetoed the write (protected region, claim, ...).
    Rejected { pos: CellPos, reason: String },
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::OutOfBounds(pos) => write!(f, "{pos} is outside the world"),
            WriteError::Rejected { pos, reason } => write!(f, "write at {pos} rejected: {reason}"),
        }
    }
}

impl std::error::Error for WriteError {}

/// Everything capture, planning and commit need from a world.
pub trait WorldAccess {
    /// Current state at `pos`, `None` for void.
    fn state(&self, pos: CellPos) -> Option<CellState>;

    /// Raw (unsanitized) auxiliary document at `pos`.
    fn aux(&self, pos: CellPos) -> Option<AuxRecord>;

    fn in_bounds(&self, pos: CellPos) -> bool;

    /// Whether an existing state may be overwritten by a paste.
    fn is_replaceable(&self, state: &CellState) -> bool;

    fn set_state(&mut self, pos: CellPos, state: CellState) -> Result<(), WriteError>;

    fn set_aux(&mut self, pos: CellPos, aux: AuxRecord);

    /// Attribute the cell at `pos` to `owner`.
    fn set_owner(&mut self, pos: CellPos, owner: &AgentId);

    /// Tell dependents that the cell at `pos` changed.
    fn notify_changed(&mut self, pos: CellPos);
}

// =============================================================================
// GridBounds
// =============================================================================

/// Inclusive addressable volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min: CellPos,
    pub max: CellPos,
}

impl GridBounds {
    pub fn new(min: CellPos, max: CellPos) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, p: CellPos) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            min: CellPos::new(-WORLD_HORIZONTAL_LIMIT, WORLD_MIN_Y, -WORLD_HORIZONTAL_LIMIT),
            max: CellPos::new(WORLD_HORIZONTAL_LIMIT, WORLD_MAX_Y, WORLD_HORIZONTAL_LIMIT),
        }
    }
}

// =============================================================================
// CellGrid
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub state: CellState,
    pub aux: Option<AuxRecord>,
    pub owner: Option<AgentId>,
}

/// Sparse in-memory world.
#[derive(Resource, Debug, Clone, Default)]
pub struct CellGrid {
    pub bounds: GridBounds,
    cells: HashMap<CellPos, GridCell>,
    replaceable: HashSet<BlockId>,
    protected: HashSet<CellPos>,
    changed: Vec<CellPos>,
    writes: u64,
}

impl CellGrid {
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    /// Put a cell directly, bypassing bounds checks, notifications and the
    /// write counter. For world setup.
    pub fn place(&mut self, pos: CellPos, state: CellState) {
        self.cells.insert(
            pos,
            GridCell {
                state,
                aux: None,
                owner: None,
            },
        );
    }

    /// Attach a raw auxiliary document to an existing cell.
    pub fn place_aux(&mut self, pos: CellPos, aux: AuxRecord) {
        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.aux = Some(aux);
        }
    }

    pub fn place_owned(&mut self, pos: CellPos, state: CellState, owner: AgentId) {
        self.place(pos, state);
        self.set_owner(pos, &owner);
    }

    pub fn remove(&mut self, pos: CellPos) -> Option<GridCell> {
        self.cells.remove(&pos)
    }

    /// Block ids that pastes may overwrite (grass, snow layers, ...).
    pub fn mark_replaceable(&mut self, block: BlockId) {
        self.replaceable.insert(block);
    }

    /// Refuse every write at `pos`.
    pub fn protect(&mut self, pos: CellPos) {
        self.protected.insert(pos);
    }

    pub fn get(&self, pos: CellPos) -> Option<&GridCell> {
        self.cells.get(&pos)
    }

    pub fn owner(&self, pos: CellPos) -> Option<&AgentId> {
        self.cells.get(&pos).and_then(|c| c.owner.as_ref())
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of successful `set_state` calls since creation.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Positions reported through `notify_changed`, oldest first.
    pub fn drain_changed(&mut self) -> Vec<CellPos> {
        std::mem::take(&mut self.changed)
    }

    pub fn pending_changes(&self) -> &[CellPos] {
        &self.changed
    }
}

impl WorldAccess for CellGrid {
    fn state(&self, pos: CellPos) -> Option<CellState> {
        self.cells.get(&pos).map(|c| c.state.clone())
    }

    fn aux(&self, pos: CellPos) -> Option<AuxRecord> {
        self.cells.get(&pos).and_then(|c| c.aux.clone())
    }

    fn in_bounds(&self, pos: CellPos) -> bool {
        self.bounds.contains(pos)
    }

    fn is_replaceable(&self, state: &CellState) -> bool {
        self.replaceable.contains(&state.block)
    }

    fn set_state(&mut self, pos: CellPos, state: CellState) -> Result<(), WriteError> {
        if !self.bounds.contains(pos) {
            return Err(WriteError::OutOfBounds(pos));
        }
        if self.protected.contains(&pos) {
            return Err(WriteError::Rejected {
                pos,
                reason: "protected".to_string(),
            });
        }
        // A new state replaces the whole cell, including its old aux data
        // and attribution.
        self.place(pos, state);
        self.writes += 1;
        Ok(())
    }

    fn set_aux(&mut self, pos: CellPos, aux: AuxRecord) {
        self.place_aux(pos, aux);
    }

    fn set_owner(&mut self, pos: CellPos, owner: &AgentId) {
        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.owner = Some(owner.clone());
        }
    }

    fn notify_changed(&mut self, pos: CellPos) {
        self.changed.push(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let b = GridBounds::new(CellPos::new(0, 0, 0), CellPos::new(15, 15, 15));
        assert!(b.contains(CellPos::new(0, 0, 0)));
        assert!(b.contains(CellPos::new(15, 15, 15)));
        assert!(!b.contains(CellPos::new(16, 0, 0)));
        assert!(!b.contains(CellPos::new(0, -1, 0)));
    }

    #[test]
    fn test_bounds_normalize_corners() {
        let b = GridBounds::new(CellPos::new(5, 5, 5), CellPos::new(-5, 0, 1));
        assert_eq!(b.min, CellPos::new(-5, 0, 1));
        assert_eq!(b.max, CellPos::new(5, 5, 5));
    }

    #[test]
    fn test_set_state_replaces_cell() {
        let mut grid = CellGrid::default();
        let pos = CellPos::new(1, 2, 3);
        grid.place_owned(pos, CellState::plain("chest"), AgentId::new("alice"));
        grid.place_aux(pos, AuxRecord::new());
        grid.set_state(pos, CellState::plain("stone")).unwrap();
        let cell = grid.get(pos).unwrap();
        assert_eq!(cell.state, CellState::plain("stone"));
        assert!(cell.aux.is_none());
        assert!(cell.owner.is_none());
        assert_eq!(grid.write_count(), 1);
    }

    #[test]
    fn test_set_state_rejections() {
        let mut grid = CellGrid::new(GridBounds::new(
            CellPos::new(0, 0, 0),
            CellPos::new(3, 3, 3),
        ));
        assert_eq!(
            grid.set_state(CellPos::new(9, 0, 0), CellState::plain("stone")),
            Err(WriteError::OutOfBounds(CellPos::new(9, 0, 0)))
        );
        grid.protect(CellPos::new(1, 1, 1));
        assert!(matches!(
            grid.set_state(CellPos::new(1, 1, 1), CellState::plain("stone")),
            Err(WriteError::Rejected { .. })
        ));
        assert_eq!(grid.write_count(), 0);
        assert_eq!(grid.cell_count(), 0);
    }

    #[test]
    fn test_replaceable_by_block() {
        let mut grid = CellGrid::default();
        grid.mark_replaceable(BlockId::new("tall_grass"));
        assert!(grid.is_replaceable(&CellState::plain("tall_grass")));
        assert!(!grid.is_replaceable(&CellState::plain("stone")));
    }

    #[test]
    fn test_notifications_drain_in_order() {
        let mut grid = CellGrid::default();
        grid.notify_changed(CellPos::new(1, 0, 0));
        grid.notify_changed(CellPos::new(2, 0, 0));
        assert_eq!(grid.pending_changes().len(), 2);
        assert_eq!(
            grid.drain_changed(),
            vec![CellPos::new(1, 0, 0), CellPos::new(2, 0, 0)]
        );
        assert!(grid.pending_changes().is_empty());
    }
}
