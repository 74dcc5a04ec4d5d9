//! Transient placement records produced by the planner.

use std::fmt;

use crate::cell::{CellState, FluidId};
use crate::geometry::CellPos;
use crate::materials::MaterialId;

/// How a placement is paid for and written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementChannel {
    /// One unit of this material, written through the world accessor.
    Item(MaterialId),
    /// No inventory cost; written through the fluid channel.
    Fluid(FluidId),
}

/// One planned, rotated and translated cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Key of the source cell in the blueprint (pre-rotation).
    pub relative_key: CellPos,
    /// Absolute destination.
    pub target: CellPos,
    /// Rotated state to write.
    pub state: CellState,
    pub channel: PlacementChannel,
}

impl Placement {
    pub fn is_fluid(&self) -> bool {
        matches!(self.channel, PlacementChannel::Fluid(_))
    }
}

/// Why a cell was not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    OutOfBounds,
    /// Destination holds something that may not be overwritten.
    Occupied,
    /// Destination already holds exactly this state.
    AlreadyPresent,
    /// The state has no item form.
    Unplaceable,
    FluidRejected,
    /// The world refused the write during commit.
    WriteFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::OutOfBounds => "out of bounds",
            SkipReason::Occupied => "occupied",
            SkipReason::AlreadyPresent => "already present",
            SkipReason::Unplaceable => "unplaceable",
            SkipReason::FluidRejected => "fluid placement failed",
            SkipReason::WriteFailed => "write failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCell {
    pub relative_key: CellPos,
    pub target: CellPos,
    pub reason: SkipReason,
}

/// Count skipped cells per reason, in first-seen order.
pub fn tally_skips(skipped: &[SkippedCell]) -> Vec<(SkipReason, usize)> {
    let mut tally: Vec<(SkipReason, usize)> = Vec::new();
    for s in skipped {
        match tally.iter_mut().find(|(r, _)| *r == s.reason) {
            Some((_, n)) => *n += 1,
            None => tally.push((s.reason, 1)),
        }
    }
    tally
}
