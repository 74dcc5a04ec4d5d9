//! Counted in-memory pool for possession and nearby containers.

use std::collections::BTreeMap;

use crate::materials::MaterialId;

use super::{PoolAccess, PoolError, ResourcePool};

#[derive(Debug, Clone)]
pub struct LedgerPool {
    name: String,
    access: PoolAccess,
    stock: BTreeMap<MaterialId, u64>,
}

impl LedgerPool {
    /// A `Direct` pool with no stock.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: PoolAccess::Direct,
            stock: BTreeMap::new(),
        }
    }

    pub fn with_access(mut self, access: PoolAccess) -> Self {
        self.access = access;
        self
    }

    pub fn with_stock(mut self, material: MaterialId, count: u64) -> Self {
        self.add(material, count);
        self
    }

    pub fn add(&mut self, material: MaterialId, count: u64) {
        let entry = self.stock.entry(material).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn stock(&self) -> &BTreeMap<MaterialId, u64> {
        &self.stock
    }
}

impl ResourcePool for LedgerPool {
    fn name(&self) -> &str {
        &self.name
    }

    fn access(&self) -> PoolAccess {
        self.access
    }

    fn available(&self, material: &MaterialId) -> u64 {
        self.stock.get(material).copied().unwrap_or(0)
    }

    fn deduct(&mut self, material: &MaterialId, count: u64) -> Result<(), PoolError> {
        if count == 0 {
            return Ok(());
        }
        let available = self.available(material);
        if available < count {
            return Err(PoolError::Insufficient {
                material: material.clone(),
                requested: count,
                available,
            });
        }
        if available == count {
            self.stock.remove(material);
        } else {
            self.stock.insert(material.clone(), available - count);
        }
        Ok(())
    }

    fn refund(&mut self, material: &MaterialId, count: u64) -> Result<(), PoolError> {
        if count > 0 {
            self.add(material.clone(), count);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduct_within_stock() {
        let iron = MaterialId::new("iron");
        let mut pool = LedgerPool::new("hands").with_stock(iron.clone(), 5);
        pool.deduct(&iron, 3).unwrap();
        assert_eq!(pool.available(&iron), 2);
        pool.deduct(&iron, 2).unwrap();
        assert_eq!(pool.available(&iron), 0);
        assert!(pool.stock().is_empty());
    }

    #[test]
    fn test_deduct_beyond_stock_fails_without_change() {
        let iron = MaterialId::new("iron");
        let mut pool = LedgerPool::new("hands").with_stock(iron.clone(), 1);
        assert_eq!(
            pool.deduct(&iron, 2),
            Err(PoolError::Insufficient {
                material: iron.clone(),
                requested: 2,
                available: 1
            })
        );
        assert_eq!(pool.available(&iron), 1);
    }
}
