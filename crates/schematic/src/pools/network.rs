//! Remote network storage reachable only through a link.

use std::collections::BTreeMap;

use crate::materials::MaterialId;

use super::{PoolAccess, PoolError, ResourcePool};

/// A `Remote` pool. While unlinked it reports nothing available and refuses
/// every deduction.
#[derive(Debug, Clone)]
pub struct NetworkPool {
    name: String,
    linked: bool,
    stock: BTreeMap<MaterialId, u64>,
}

impl NetworkPool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            linked: true,
            stock: BTreeMap::new(),
        }
    }

    pub fn with_stock(mut self, material: MaterialId, count: u64) -> Self {
        *self.stock.entry(material).or_insert(0) += count;
        self
    }

    pub fn set_linked(&mut self, linked: bool) {
        self.linked = linked;
    }

    pub fn unlinked(mut self) -> Self {
        self.linked = false;
        self
    }

    /// Stored amount regardless of link state.
    pub fn stored(&self, material: &MaterialId) -> u64 {
        self.stock.get(material).copied().unwrap_or(0)
    }
}

impl ResourcePool for NetworkPool {
    fn name(&self) -> &str {
        &self.name
    }

    fn access(&self) -> PoolAccess {
        PoolAccess::Remote
    }

    fn available(&self, material: &MaterialId) -> u64 {
        if !self.linked {
            return 0;
        }
        self.stored(material)
    }

    fn deduct(&mut self, material: &MaterialId, count: u64) -> Result<(), PoolError> {
        if !self.linked {
            return Err(PoolError::Unlinked);
        }
        let available = self.stored(material);
        if available < count {
            return Err(PoolError::Insufficient {
                material: material.clone(),
                requested: count,
                available,
            });
        }
        self.stock.insert(material.clone(), available - count);
        Ok(())
    }

    fn refund(&mut self, material: &MaterialId, count: u64) -> Result<(), PoolError> {
        if !self.linked {
            return Err(PoolError::Unlinked);
        }
        let entry = self.stock.entry(material.clone()).or_insert(0);
        *entry = entry.saturating_add(count);
        Ok(())
    }

    fn is_linked(&self) -> bool {
        self.linked
    }
}
