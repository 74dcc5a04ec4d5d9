//! Fluid sub-channel: fluid sources are paid for and placed here rather than
//! through material pools and the generic cell writer.

use std::collections::HashMap;
use std::fmt;

use bevy::prelude::Resource;

use crate::agent::AgentId;
use crate::cell::{CellState, FluidId};
use crate::geometry::CellPos;
use crate::world::{WorldAccess, WriteError};

/// Why a fluid source was not placed. Nothing is charged in either case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FluidRefusal {
    TankEmpty,
    Write(WriteError),
}

impl fmt::Display for FluidRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FluidRefusal::TankEmpty => write!(f, "tank is empty"),
            FluidRefusal::Write(e) => write!(f, "{e}"),
        }
    }
}

pub trait FluidChannel {
    /// Place one source of `fluid` at `pos` in `world` on behalf of `agent`.
    ///
    /// The world write happens before the tank is charged, so a refused write
    /// costs nothing. `exempt` agents are never charged.
    fn try_place_fluid(
        &mut self,
        world: &mut dyn WorldAccess,
        pos: CellPos,
        fluid: &FluidId,
        agent: &AgentId,
        exempt: bool,
    ) -> Result<(), FluidRefusal>;
}

/// Per-agent fluid tanks measured in source units.
#[derive(Resource, Debug, Clone, Default)]
pub struct FluidReservoir {
    tanks: HashMap<(AgentId, FluidId), u64>,
}

impl FluidReservoir {
    pub fn fill(&mut self, agent: AgentId, fluid: FluidId, units: u64) {
        *self.tanks.entry((agent, fluid)).or_insert(0) += units;
    }

    pub fn level(&self, agent: &AgentId, fluid: &FluidId) -> u64 {
        self.tanks
            .get(&(agent.clone(), fluid.clone()))
            .copied()
            .unwrap_or(0)
    }
}

impl FluidChannel for FluidReservoir {
    fn try_place_fluid(
        &mut self,
        world: &mut dyn WorldAccess,
        pos: CellPos,
        fluid: &FluidId,
        agent: &AgentId,
        exempt: bool,
    ) -> Result<(), FluidRefusal> {
        let key = (agent.clone(), fluid.clone());
        if !exempt && self.tanks.get(&key).copied().unwrap_or(0) == 0 {
            return Err(FluidRefusal::TankEmpty);
        }
        world
            .set_state(pos, CellState::fluid_source(fluid.0.clone()))
            .map_err(FluidRefusal::Write)?;
        if !exempt {
            if let Some(level) = self.tanks.get_mut(&key) {
                *level -= 1;
            }
        }
        world.set_owner(pos, agent);
        world.notify_changed(pos);
        Ok(())
    }
}
