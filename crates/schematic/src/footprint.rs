//! Structure footprints supplied by an external scanner.
//!
//! The clipboard never decides which cells make up a structure; it asks a
//! `FootprintProvider` for the occupied positions, origin and facing.

use std::collections::{BTreeSet, HashMap};

use bevy::prelude::Resource;

use crate::geometry::{Cardinal, CellPos};

/// Opaque handle of a detected structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureHandle(pub u64);

/// What a scanner reports about one structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub positions: BTreeSet<CellPos>,
    pub origin: CellPos,
    pub facing: Cardinal,
    pub source_kind: String,
}

pub trait FootprintProvider {
    fn footprint(&self, handle: StructureHandle) -> Option<Footprint>;
}

/// Static table of footprints, filled in by whatever scans the world.
#[derive(Resource, Debug, Clone, Default)]
pub struct FootprintRegistry {
    structures: HashMap<StructureHandle, Footprint>,
}

impl FootprintRegistry {
    pub fn register(&mut self, handle: StructureHandle, footprint: Footprint) {
        self.structures.insert(handle, footprint);
    }

    pub fn remove(&mut self, handle: StructureHandle) -> Option<Footprint> {
        self.structures.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

impl FootprintProvider for FootprintRegistry {
    fn footprint(&self, handle: StructureHandle) -> Option<Footprint> {
        self.structures.get(&handle).cloned()
    }
}
