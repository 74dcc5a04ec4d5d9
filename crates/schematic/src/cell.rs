//! Cell state model: what occupies one addressable position.
//!
//! A `CellState` pairs an opaque block identifier with a closed `CellKind`
//! (which decides how its auxiliary data is sanitized and how it is paid for)
//! and a single orientation-valued property. Void is never represented as a
//! state; absence of a cell means void.

use std::collections::BTreeMap;
use std::fmt;

use bitcode::{Decode, Encode};

use crate::geometry::{Axis, Cardinal, Direction};

/// Opaque identifier of a cell type (e.g. `"stone_bricks"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a fluid (e.g. `"water"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub struct FluidId(pub String);

impl FluidId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for FluidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of cell kinds. Resolved once at capture/plan time; nothing
/// downstream inspects the block id to decide behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Encode, Decode)]
pub enum CellKind {
    /// An ordinary structural cell.
    #[default]
    Plain,
    /// A cell attached to a logistics network (priorities, access rules).
    Networked,
    /// A multi-slot cell whose auxiliary data carries an array of slots.
    Composite,
    /// A fluid source. Has no discrete item form; paid through the fluid
    /// channel instead of the material pools.
    FluidSource { fluid: FluidId },
}

/// The orientation-valued property of a cell, if it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Encode, Decode)]
pub enum Orientation {
    #[default]
    None,
    /// A horizontal-only facing (stairs, doors, furnaces).
    Horizontal(Cardinal),
    /// A six-way facing (pistons, observers). Up/Down survive rotation.
    Facing(Direction),
    /// An axis property (logs, pillars).
    Axis(Axis),
}

/// The full state of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct CellState {
    pub block: BlockId,
    pub kind: CellKind,
    pub orientation: Orientation,
    /// Non-oriented extra properties, copied verbatim.
    pub properties: BTreeMap<String, String>,
}

impl CellState {
    /// A plain, unoriented cell.
    pub fn plain(block: impl Into<String>) -> Self {
        Self {
            block: BlockId::new(block),
            kind: CellKind::Plain,
            orientation: Orientation::None,
            properties: BTreeMap::new(),
        }
    }

    /// A fluid source cell for `fluid`, using the fluid name as block id.
    pub fn fluid_source(fluid: impl Into<String>) -> Self {
        let fluid = FluidId::new(fluid);
        Self {
            block: BlockId::new(fluid.0.clone()),
            kind: CellKind::FluidSource { fluid },
            orientation: Orientation::None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_kind(mut self, kind: CellKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn facing(self, cardinal: Cardinal) -> Self {
        self.with_orientation(Orientation::Horizontal(cardinal))
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn fluid(&self) -> Option<&FluidId> {
        match &self.kind {
            CellKind::FluidSource { fluid } => Some(fluid),
            _ => None,
        }
    }

    pub fn is_fluid_source(&self) -> bool {
        self.fluid().is_some()
    }
}
