//! Mapping from cell states to the countable materials that pay for them.

use std::collections::{HashMap, HashSet};
use std::fmt;

use bevy::prelude::Resource;
use bitcode::{Decode, Encode};

use crate::cell::{BlockId, CellState, FluidId};

/// Identifier of a countable material held in resource pools.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct MaterialId(pub String);

impl MaterialId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the material backing a cell state, if the state has an item form.
pub trait MaterialSource {
    fn material_for(&self, state: &CellState) -> Option<MaterialId>;
}

/// How a cell is paid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backing {
    /// One unit of a countable material.
    Item(MaterialId),
    /// Charged through the fluid channel; no material cost.
    Fluid(FluidId),
    /// No item form exists. Such cells are never placed.
    Unobtainable,
}

/// Implemented by things that know how they are paid for.
pub trait MaterialBacked {
    fn backing(&self, source: &dyn MaterialSource) -> Backing;
}

impl MaterialBacked for CellState {
    fn backing(&self, source: &dyn MaterialSource) -> Backing {
        if let Some(fluid) = self.fluid() {
            return Backing::Fluid(fluid.clone());
        }
        match source.material_for(self) {
            Some(material) => Backing::Item(material),
            None => Backing::Unobtainable,
        }
    }
}

/// Block → material table.
///
/// With `identity_fallback` set, unregistered blocks are backed by a material
/// of the same name unless explicitly marked unobtainable.
#[derive(Resource, Debug, Clone, Default)]
pub struct MaterialCatalog {
    items: HashMap<BlockId, MaterialId>,
    unobtainable: HashSet<BlockId>,
    pub identity_fallback: bool,
}

impl MaterialCatalog {
    /// A catalog where every block is its own material.
    pub fn identity() -> Self {
        Self {
            identity_fallback: true,
            ..Default::default()
        }
    }

    pub fn register(&mut self, block: BlockId, material: MaterialId) {
        self.unobtainable.remove(&block);
        self.items.insert(block, material);
    }

    pub fn mark_unobtainable(&mut self, block: BlockId) {
        self.items.remove(&block);
        self.unobtainable.insert(block);
    }
}

impl MaterialSource for MaterialCatalog {
    fn material_for(&self, state: &CellState) -> Option<MaterialId> {
        if let Some(material) = self.items.get(&state.block) {
            return Some(material.clone());
        }
        if self.identity_fallback && !self.unobtainable.contains(&state.block) {
            return Some(MaterialId::new(state.block.as_str()));
        }
        None
    }
}
