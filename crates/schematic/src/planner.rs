//! Phase 1: turn a blueprint into a placement list and a bill of materials.
//!
//! Planning is pure. It reads the world to classify destinations but never
//! writes to it, and never touches resource pools.

use std::collections::BTreeMap;

use bevy::log::debug;

use crate::blueprint::{Blueprint, FatalInvariantViolation};
use crate::geometry::CellPos;
use crate::materials::{Backing, MaterialBacked, MaterialId, MaterialSource};
use crate::placement::{Placement, PlacementChannel, SkipReason, SkippedCell};
use crate::rotation::{checked_rotate_position, rotate_cell_state};
use crate::world::WorldAccess;

/// Placements in blueprint order plus the materials they consume.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    pub placements: Vec<Placement>,
    pub required: BTreeMap<MaterialId, u64>,
    pub skipped: Vec<SkippedCell>,
    /// Quarter turns actually applied.
    pub steps: u8,
}

impl Plan {
    /// Number of fluid placements (not part of `required`).
    pub fn fluid_count(&self) -> usize {
        self.placements.iter().filter(|p| p.is_fluid()).count()
    }

    pub fn total_required(&self) -> u64 {
        self.required.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// Nothing to place. Callers must stop before resolving resources.
    Empty { skipped: Vec<SkippedCell> },
    Ready(Plan),
}

impl PlanOutcome {
    pub fn skipped(&self) -> &[SkippedCell] {
        match self {
            PlanOutcome::Empty { skipped } => skipped,
            PlanOutcome::Ready(plan) => &plan.skipped,
        }
    }
}

/// Plan a paste of `blueprint` at `anchor`.
///
/// `requested_steps` is combined with the blueprint's own rotation offset.
/// Fails only when the blueprint breaks its structural invariants.
pub fn plan<W: WorldAccess + ?Sized>(
    blueprint: &Blueprint,
    anchor: CellPos,
    requested_steps: u8,
    world: &W,
    materials: &dyn MaterialSource,
) -> Result<PlanOutcome, FatalInvariantViolation> {
    blueprint.validate()?;
    let steps = blueprint.effective_steps(requested_steps);

    let mut out = Plan {
        steps,
        ..Default::default()
    };
    for (key, state) in &blueprint.cells {
        let offset = checked_rotate_position(*key, steps);
        let Some(target) = offset.and_then(|o| anchor.checked_add(o)) else {
            // Not addressable at all, so certainly outside the world.
            out.skipped.push(SkippedCell {
                relative_key: *key,
                target: anchor.saturating_add(offset.unwrap_or(*key)),
                reason: SkipReason::OutOfBounds,
            });
            continue;
        };
        let state = rotate_cell_state(state, steps);
        let skip = |reason| SkippedCell {
            relative_key: *key,
            target,
            reason,
        };

        if !world.in_bounds(target) {
            out.skipped.push(skip(SkipReason::OutOfBounds));
            continue;
        }
        if let Some(existing) = world.state(target) {
            if existing == state {
                out.skipped.push(skip(SkipReason::AlreadyPresent));
                continue;
            }
            if !world.is_replaceable(&existing) {
                out.skipped.push(skip(SkipReason::Occupied));
                continue;
            }
        }

        let channel = match state.backing(materials) {
            Backing::Fluid(fluid) => PlacementChannel::Fluid(fluid),
            Backing::Item(material) => {
                *out.required.entry(material.clone()).or_insert(0) += 1;
                PlacementChannel::Item(material)
            }
            Backing::Unobtainable => {
                out.skipped.push(skip(SkipReason::Unplaceable));
                continue;
            }
        };
        out.placements.push(Placement {
            relative_key: *key,
            target,
            state,
            channel,
        });
    }

    debug!(
        "plan: {} placements, {} skipped, {} materials at {} (steps {})",
        out.placements.len(),
        out.skipped.len(),
        out.total_required(),
        anchor,
        steps
    );
    if out.placements.is_empty() {
        return Ok(PlanOutcome::Empty {
            skipped: out.skipped,
        });
    }
    Ok(PlanOutcome::Ready(out))
}

/// Materials needed to build `blueprint` from scratch, ignoring any
/// destination.
pub fn bill_of_materials(
    blueprint: &Blueprint,
    materials: &dyn MaterialSource,
) -> BTreeMap<MaterialId, u64> {
    let mut bill = BTreeMap::new();
    for state in blueprint.cells.values() {
        if let Backing::Item(material) = state.backing(materials) {
            *bill.entry(material).or_insert(0) += 1;
        }
    }
    bill
}
