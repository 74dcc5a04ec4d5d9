//! # TestWorld: headless harness for clipboard integration tests
//!
//! Wraps `bevy::app::App` + `MinimalPlugins` + `ClipboardPlugin` behind a
//! fluent builder. Requests are sent as events and take effect on `tick()`.

use bevy::app::App;
use bevy::prelude::*;

use crate::agent::{AgentId, CostMode};
use crate::aux_record::AuxRecord;
use crate::blueprint::Blueprint;
use crate::cell::{BlockId, CellState, FluidId};
use crate::clipboard::Clipboard;
use crate::config::PRIORITY_NETWORK;
use crate::fluids::FluidReservoir;
use crate::footprint::{Footprint, FootprintRegistry, StructureHandle};
use crate::geometry::{Cardinal, CellPos};
use crate::materials::{MaterialCatalog, MaterialId};
use crate::outcome_log::{ClipboardLog, ClipboardOutcome};
use crate::paste::{AgentPools, PasteRequest, RotationRequest};
use crate::plugin::{CaptureStructure, CaptureTarget, PasteBlueprint, PreviewPaste};
use crate::pools::{LedgerPool, NetworkPool, PoolPriority, ResourcePool};
use crate::world::{CellGrid, GridBounds, GridCell};
use crate::ClipboardPlugin;

pub struct TestWorld {
    app: App,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Empty unbounded-ish grid, identity material catalog, no pools.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(ClipboardPlugin);
        app.insert_resource(MaterialCatalog::identity());
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // World setup (builder pattern, consumes and returns Self)
    // -----------------------------------------------------------------------

    pub fn with_bounds(mut self, min: CellPos, max: CellPos) -> Self {
        self.grid_mut().bounds = GridBounds::new(min, max);
        self
    }

    pub fn with_cell(mut self, pos: CellPos, state: CellState) -> Self {
        self.grid_mut().place(pos, state);
        self
    }

    pub fn with_aux(mut self, pos: CellPos, aux: AuxRecord) -> Self {
        self.grid_mut().place_aux(pos, aux);
        self
    }

    pub fn with_replaceable(mut self, block: &str) -> Self {
        self.grid_mut().mark_replaceable(BlockId::new(block));
        self
    }

    pub fn with_protected(mut self, pos: CellPos) -> Self {
        self.grid_mut().protect(pos);
        self
    }

    pub fn with_unobtainable(mut self, block: &str) -> Self {
        self.app
            .world_mut()
            .resource_mut::<MaterialCatalog>()
            .mark_unobtainable(BlockId::new(block));
        self
    }

    pub fn with_material(mut self, block: &str, material: &str) -> Self {
        self.app
            .world_mut()
            .resource_mut::<MaterialCatalog>()
            .register(BlockId::new(block), MaterialId::new(material));
        self
    }

    /// Give `agent` a direct ledger pool holding `stock`.
    pub fn with_pool(
        self,
        agent: &str,
        name: &str,
        priority: PoolPriority,
        stock: &[(&str, u64)],
    ) -> Self {
        let pool = stock.iter().fold(LedgerPool::new(name), |pool, (m, n)| {
            pool.with_stock(MaterialId::new(*m), *n)
        });
        self.with_any_pool(agent, priority, pool)
    }

    pub fn with_network(
        self,
        agent: &str,
        name: &str,
        linked: bool,
        stock: &[(&str, u64)],
    ) -> Self {
        let mut pool = stock.iter().fold(NetworkPool::new(name), |pool, (m, n)| {
            pool.with_stock(MaterialId::new(*m), *n)
        });
        pool.set_linked(linked);
        self.with_any_pool(agent, PRIORITY_NETWORK, pool)
    }

    pub fn with_any_pool(
        mut self,
        agent: &str,
        priority: PoolPriority,
        pool: impl ResourcePool + 'static,
    ) -> Self {
        self.app
            .world_mut()
            .resource_mut::<AgentPools>()
            .add_pool(&AgentId::new(agent), priority, pool);
        self
    }

    /// Put `agent` in unlimited-resource mode.
    pub fn unlimited(mut self, agent: &str) -> Self {
        self.app
            .world_mut()
            .resource_mut::<AgentPools>()
            .set_cost_mode(&AgentId::new(agent), CostMode::Exempt);
        self
    }

    pub fn with_fluid(mut self, agent: &str, fluid: &str, units: u64) -> Self {
        self.app.world_mut().resource_mut::<FluidReservoir>().fill(
            AgentId::new(agent),
            FluidId::new(fluid),
            units,
        );
        self
    }

    pub fn with_structure(mut self, handle: u64, footprint: Footprint) -> Self {
        self.app
            .world_mut()
            .resource_mut::<FootprintRegistry>()
            .register(StructureHandle(handle), footprint);
        self
    }

    pub fn with_active(mut self, blueprint: Blueprint) -> Self {
        self.app
            .world_mut()
            .resource_mut::<Clipboard>()
            .set_active(blueprint);
        self
    }

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    pub fn capture(&mut self, positions: &[CellPos], origin: CellPos, facing: Cardinal) {
        self.app.world_mut().send_event(CaptureStructure {
            target: CaptureTarget::Positions {
                positions: positions.to_vec(),
                origin,
                facing,
            },
            name: None,
        });
        self.tick();
    }

    pub fn capture_structure(&mut self, handle: u64, name: &str) {
        self.app.world_mut().send_event(CaptureStructure {
            target: CaptureTarget::Structure(StructureHandle(handle)),
            name: Some(name.to_string()),
        });
        self.tick();
    }

    pub fn paste(&mut self, agent: &str, anchor: CellPos, steps: u8) {
        self.paste_with(agent, anchor, RotationRequest::Steps(steps));
    }

    pub fn paste_with(&mut self, agent: &str, anchor: CellPos, rotation: RotationRequest) {
        let request = PasteRequest::new(AgentId::new(agent), anchor).rotated(rotation);
        self.app.world_mut().send_event(PasteBlueprint { request });
        self.tick();
    }

    pub fn preview(&mut self, agent: &str, anchor: CellPos, steps: u8) {
        let request =
            PasteRequest::new(AgentId::new(agent), anchor).rotated(RotationRequest::Steps(steps));
        self.app.world_mut().send_event(PreviewPaste { request });
        self.tick();
    }

    /// Run one `Update`.
    pub fn tick(&mut self) {
        self.app.update();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    fn grid_mut(&mut self) -> Mut<'_, CellGrid> {
        self.app.world_mut().resource_mut::<CellGrid>()
    }

    pub fn grid(&self) -> &CellGrid {
        self.resource::<CellGrid>()
    }

    pub fn cell(&self, pos: CellPos) -> Option<&GridCell> {
        self.grid().get(pos)
    }

    pub fn active(&self) -> Option<&Blueprint> {
        self.resource::<Clipboard>().get_active()
    }

    pub fn last_outcome(&self) -> Option<&ClipboardOutcome> {
        self.resource::<ClipboardLog>().last()
    }

    /// Available units of `material` in the named pool of `agent`.
    pub fn pool_stock(&self, agent: &str, pool: &str, material: &str) -> u64 {
        self.resource::<AgentPools>()
            .account(&AgentId::new(agent))
            .and_then(|a| a.pools.get(pool))
            .map(|p| p.available(&MaterialId::new(material)))
            .unwrap_or(0)
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    pub fn assert_block(&self, pos: CellPos, block: &str) {
        let cell = self
            .cell(pos)
            .unwrap_or_else(|| panic!("expected '{block}' at {pos}, found void"));
        assert_eq!(cell.state.block.as_str(), block, "wrong block at {pos}");
    }

    pub fn assert_void(&self, pos: CellPos) {
        assert!(self.cell(pos).is_none(), "expected void at {pos}");
    }

    pub fn assert_writes(&self, expected: u64) {
        assert_eq!(self.grid().write_count(), expected, "grid write count");
    }
}
