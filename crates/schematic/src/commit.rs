//! Phase 2: write a resolved plan into the world.

use std::collections::BTreeMap;
use std::fmt;

use bevy::log::debug;

use crate::aux_record::AuxRecord;
use crate::fluids::{FluidChannel, FluidRefusal};
use crate::geometry::CellPos;
use crate::materials::MaterialId;
use crate::placement::{Placement, PlacementChannel, SkipReason, SkippedCell};
use crate::resolver::CommitTicket;
use crate::world::WorldAccess;

/// A per-cell failure during commit. Never aborts the remaining cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitWarning {
    CellSkipped(SkippedCell),
}

impl fmt::Display for CommitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitWarning::CellSkipped(cell) => {
                write!(f, "skipped {}: {}", cell.target, cell.reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlacementReport {
    pub placed: usize,
    pub skipped: usize,
    pub warnings: Vec<CommitWarning>,
    /// Materials charged for this commit (empty when exempt).
    pub spent: BTreeMap<MaterialId, u64>,
}

/// Write `placements` in order, consuming `ticket`.
///
/// Item placements go through `world.set_state`, followed by the cell's
/// auxiliary record (keyed by `relative_key`), owner attribution and a change
/// notification. Fluid placements go through `fluids`, which writes into the
/// same world and is exempt from charging whenever the ticket is. Materials
/// already paid for are not refunded when a write fails.
pub fn commit(
    ticket: CommitTicket,
    placements: &[Placement],
    auxiliary: &BTreeMap<CellPos, AuxRecord>,
    world: &mut dyn WorldAccess,
    fluids: &mut dyn FluidChannel,
) -> PlacementReport {
    let agent = ticket.agent().clone();
    let exempt = ticket.is_exempt();
    let mut report = PlacementReport {
        spent: ticket.spent().clone(),
        ..Default::default()
    };

    for placement in placements {
        let failure = match &placement.channel {
            PlacementChannel::Fluid(fluid) => {
                match fluids.try_place_fluid(world, placement.target, fluid, &agent, exempt) {
                    Ok(()) => None,
                    Err(FluidRefusal::TankEmpty) => Some(SkipReason::FluidRejected),
                    Err(FluidRefusal::Write(e)) => {
                        debug!("commit: fluid {}", e);
                        Some(SkipReason::WriteFailed)
                    }
                }
            }
            PlacementChannel::Item(_) => {
                match world.set_state(placement.target, placement.state.clone()) {
                    Ok(()) => {
                        if let Some(aux) = auxiliary.get(&placement.relative_key) {
                            world.set_aux(placement.target, aux.clone());
                        }
                        world.set_owner(placement.target, &agent);
                        world.notify_changed(placement.target);
                        None
                    }
                    Err(e) => {
                        debug!("commit: {}", e);
                        Some(SkipReason::WriteFailed)
                    }
                }
            }
        };
        match failure {
            None => report.placed += 1,
            Some(reason) => {
                report.skipped += 1;
                report.warnings.push(CommitWarning::CellSkipped(SkippedCell {
                    relative_key: placement.relative_key,
                    target: placement.target,
                    reason,
                }));
            }
        }
    }
    debug!(
        "commit: {} placed, {} skipped for {}",
        report.placed, report.skipped, agent
    );
    report
}
