//! Ranked sources of countable materials.

pub mod ledger;
pub mod network;

use std::fmt;

use crate::materials::MaterialId;

pub use ledger::LedgerPool;
pub use network::NetworkPool;

/// How cheaply a pool can be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolAccess {
    /// Local and authoritative (possession, adjacent containers).
    Direct,
    /// Behind a link; the preview does not read its contents.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    Insufficient {
        material: MaterialId,
        requested: u64,
        available: u64,
    },
    Unlinked,
    Refused(String),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Insufficient {
                material,
                requested,
                available,
            } => write!(
                f,
                "insufficient {material}: requested {requested}, available {available}"
            ),
            PoolError::Unlinked => write!(f, "pool is not linked"),
            PoolError::Refused(reason) => write!(f, "deduction refused: {reason}"),
        }
    }
}

impl std::error::Error for PoolError {}

pub trait ResourcePool: Send + Sync {
    fn name(&self) -> &str;

    fn access(&self) -> PoolAccess;

    fn available(&self, material: &MaterialId) -> u64;

    /// Remove `count` units. Must succeed whenever `available` reported at
    /// least `count` and nothing else touched the pool in between.
    fn deduct(&mut self, material: &MaterialId, count: u64) -> Result<(), PoolError>;

    /// Return `count` units taken by an earlier `deduct` that was rolled back.
    fn refund(&mut self, material: &MaterialId, count: u64) -> Result<(), PoolError>;

    /// Cheap link check for remote pools.
    fn is_linked(&self) -> bool {
        true
    }
}

/// Lower ranks are drained first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PoolPriority(pub u32);

/// A priority-ordered chain of pools for one agent.
#[derive(Default)]
pub struct PoolSet {
    pools: Vec<(PoolPriority, Box<dyn ResourcePool>)>,
}

impl PoolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `pool`. Pools sharing a rank keep their insertion order.
    pub fn add(&mut self, priority: PoolPriority, pool: impl ResourcePool + 'static) {
        let at = self
            .pools
            .iter()
            .position(|(p, _)| *p > priority)
            .unwrap_or(self.pools.len());
        self.pools.insert(at, (priority, Box::new(pool)));
    }

    pub fn with(mut self, priority: PoolPriority, pool: impl ResourcePool + 'static) -> Self {
        self.add(priority, pool);
        self
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Pools in drain order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ResourcePool> {
        self.pools.iter().map(|(_, p)| p.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn ResourcePool>> {
        self.pools.iter_mut().map(|(_, p)| p)
    }

    pub fn get(&self, name: &str) -> Option<&dyn ResourcePool> {
        self.iter().find(|p| p.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn ResourcePool>> {
        self.iter_mut().find(|p| p.name() == name)
    }

    /// Sum of `available` over every pool.
    pub fn total_available(&self, material: &MaterialId) -> u64 {
        self.iter()
            .map(|p| p.available(material))
            .fold(0u64, u64::saturating_add)
    }

    /// `(pool name, available)` in drain order.
    pub fn snapshot(&self, material: &MaterialId) -> Vec<(String, u64)> {
        self.iter()
            .map(|p| (p.name().to_string(), p.available(material)))
            .collect()
    }
}

impl fmt::Debug for PoolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.pools.iter().map(|(rank, p)| (rank.0, p.name())))
            .finish()
    }
}
