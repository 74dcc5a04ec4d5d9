//! The full paste pipeline: plan → resolve → commit.
//!
//! Callers never see a partially placed paste caused by missing materials:
//! either `resolve` secures everything and `commit` runs, or nothing is
//! written and the shortfall is returned.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use bevy::prelude::Resource;

use crate::agent::{AgentId, CostMode};
use crate::blueprint::{Blueprint, FatalInvariantViolation};
use crate::commit::{commit, CommitWarning};
use crate::fluids::FluidChannel;
use crate::geometry::{Cardinal, CellPos};
use crate::materials::{MaterialId, MaterialSource};
use crate::placement::{tally_skips, SkippedCell};
use crate::planner::{plan, PlanOutcome};
use crate::pools::{PoolError, PoolPriority, PoolSet, ResourcePool};
use crate::resolver::{
    preview, resolve, write_stranded, Affordability, CommitTicket, PreviewConfig, ResolveError,
    ShortfallReport,
};
use crate::world::WorldAccess;

// =============================================================================
// Agent accounts
// =============================================================================

/// Pools and cost mode of one agent.
#[derive(Debug, Default)]
pub struct AgentAccount {
    pub pools: PoolSet,
    pub cost_mode: CostMode,
}

/// Every agent's account. Paste systems borrow this mutably, so two pastes
/// never resolve against the same pools at once.
#[derive(Resource, Debug, Default)]
pub struct AgentPools {
    accounts: HashMap<AgentId, AgentAccount>,
}

impl AgentPools {
    pub fn account(&self, agent: &AgentId) -> Option<&AgentAccount> {
        self.accounts.get(agent)
    }

    /// The agent's account, created empty and `Charged` on first use.
    pub fn account_mut(&mut self, agent: &AgentId) -> &mut AgentAccount {
        self.accounts.entry(agent.clone()).or_default()
    }

    pub fn add_pool(
        &mut self,
        agent: &AgentId,
        priority: PoolPriority,
        pool: impl ResourcePool + 'static,
    ) {
        self.account_mut(agent).pools.add(priority, pool);
    }

    pub fn set_cost_mode(&mut self, agent: &AgentId, mode: CostMode) {
        self.account_mut(agent).cost_mode = mode;
    }

    pub fn cost_mode(&self, agent: &AgentId) -> CostMode {
        self.accounts
            .get(agent)
            .map(|a| a.cost_mode)
            .unwrap_or_default()
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationRequest {
    /// Raw quarter turns, added to the blueprint's own offset.
    Steps(u8),
    /// End up facing this direction, whatever the blueprint's offset.
    Face(Cardinal),
}

impl Default for RotationRequest {
    fn default() -> Self {
        RotationRequest::Steps(0)
    }
}

impl RotationRequest {
    /// Requested steps to hand to the planner.
    pub fn requested_steps(&self, blueprint: &Blueprint) -> u8 {
        match *self {
            RotationRequest::Steps(steps) => steps % 4,
            RotationRequest::Face(target) => {
                (blueprint.steps_to_face(target) + 4 - blueprint.user_rotation_offset % 4) % 4
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteRequest {
    pub agent: AgentId,
    pub anchor: CellPos,
    pub rotation: RotationRequest,
}

impl PasteRequest {
    pub fn new(agent: AgentId, anchor: CellPos) -> Self {
        Self {
            agent,
            anchor,
            rotation: RotationRequest::default(),
        }
    }

    pub fn rotated(mut self, rotation: RotationRequest) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Collaborators a paste needs.
pub struct PasteContext<'a> {
    pub world: &'a mut dyn WorldAccess,
    pub materials: &'a dyn MaterialSource,
    pub fluids: &'a mut dyn FluidChannel,
    pub account: &'a mut AgentAccount,
}

// =============================================================================
// Outcomes
// =============================================================================

/// What a paste did, merged across planning and commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteSummary {
    pub blueprint: String,
    pub agent: AgentId,
    pub anchor: CellPos,
    pub steps: u8,
    pub placed: usize,
    /// Planner skips followed by commit skips.
    pub skipped: Vec<SkippedCell>,
    pub materials_spent: BTreeMap<MaterialId, u64>,
    pub warnings: Vec<CommitWarning>,
}

impl PasteSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

impl fmt::Display for PasteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' at {}: {} placed, {} skipped",
            self.blueprint,
            self.anchor,
            self.placed,
            self.skipped.len()
        )?;
        for (i, (reason, n)) in tally_skips(&self.skipped).iter().enumerate() {
            let lead = if i == 0 { " (" } else { ", " };
            write!(f, "{lead}{reason} x{n}")?;
        }
        if !self.skipped.is_empty() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteError {
    NoActiveBlueprint,
    /// Every cell was skipped during planning.
    NothingToPaste { skipped: Vec<SkippedCell> },
    Shortfall(ShortfallReport),
    Invariant(FatalInvariantViolation),
    PoolContract {
        pool: String,
        material: MaterialId,
        error: PoolError,
        /// Units taken that could not be refunded.
        stranded: BTreeMap<MaterialId, u64>,
    },
}

impl fmt::Display for PasteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasteError::NoActiveBlueprint => write!(f, "no active blueprint"),
            PasteError::NothingToPaste { skipped } => {
                write!(f, "nothing to paste ({} cells skipped)", skipped.len())
            }
            PasteError::Shortfall(report) => write!(f, "cannot afford paste: {report}"),
            PasteError::Invariant(v) => write!(f, "invalid blueprint: {v}"),
            PasteError::PoolContract {
                pool,
                material,
                error,
                stranded,
            } => {
                write!(f, "pool '{pool}' failed on {material}: {error}")?;
                write_stranded(f, stranded)
            }
        }
    }
}

impl std::error::Error for PasteError {}

impl From<FatalInvariantViolation> for PasteError {
    fn from(v: FatalInvariantViolation) -> Self {
        PasteError::Invariant(v)
    }
}

impl From<ResolveError> for PasteError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Shortfall(report) => PasteError::Shortfall(report),
            ResolveError::PoolContract {
                pool,
                material,
                error,
                stranded,
            } => PasteError::PoolContract {
                pool,
                material,
                error,
                stranded,
            },
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Paste `blueprint` as described by `request`.
pub fn paste(
    request: &PasteRequest,
    blueprint: &Blueprint,
    ctx: PasteContext<'_>,
) -> Result<PasteSummary, PasteError> {
    let requested = request.rotation.requested_steps(blueprint);
    let plan = match plan(blueprint, request.anchor, requested, &*ctx.world, ctx.materials)? {
        PlanOutcome::Empty { skipped } => return Err(PasteError::NothingToPaste { skipped }),
        PlanOutcome::Ready(plan) => plan,
    };

    let ticket = match ctx.account.cost_mode {
        CostMode::Exempt => CommitTicket::exempt(request.agent.clone()),
        CostMode::Charged => resolve(&plan.required, &request.agent, &mut ctx.account.pools)?,
    };
    let report = commit(
        ticket,
        &plan.placements,
        &blueprint.auxiliary,
        ctx.world,
        ctx.fluids,
    );

    let mut skipped = plan.skipped;
    skipped.extend(report.warnings.iter().map(|w| match w {
        CommitWarning::CellSkipped(cell) => cell.clone(),
    }));
    Ok(PasteSummary {
        blueprint: blueprint.name.clone(),
        agent: request.agent.clone(),
        anchor: request.anchor,
        steps: plan.steps,
        placed: report.placed,
        skipped,
        materials_spent: report.spent,
        warnings: report.warnings,
    })
}

/// Read-only estimate of a paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastePreview {
    pub placements: usize,
    pub skipped: usize,
    pub required: BTreeMap<MaterialId, u64>,
    pub affordability: Affordability,
}

/// Plan `blueprint` and estimate affordability without touching the world or
/// any pool.
pub fn preview_paste<W: WorldAccess + ?Sized>(
    request: &PasteRequest,
    blueprint: &Blueprint,
    world: &W,
    materials: &dyn MaterialSource,
    account: &AgentAccount,
    config: &PreviewConfig,
) -> Result<PastePreview, PasteError> {
    let requested = request.rotation.requested_steps(blueprint);
    match plan(blueprint, request.anchor, requested, world, materials)? {
        PlanOutcome::Empty { skipped } => Err(PasteError::NothingToPaste { skipped }),
        PlanOutcome::Ready(plan) => {
            let affordability = match account.cost_mode {
                CostMode::Exempt => Affordability::Affordable,
                CostMode::Charged => preview(&plan.required, &account.pools, config),
            };
            Ok(PastePreview {
                placements: plan.placements.len(),
                skipped: plan.skipped.len(),
                required: plan.required,
                affordability,
            })
        }
    }
}
