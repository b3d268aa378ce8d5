//! Pooled store
//!
//! Values live in numbered pools; identities are mapped to pools. Creating
//! a pool bumps the counter, joining always targets the newest pool.
//!
//! Pools are never reclaimed: a pool whose last member leaves keeps its
//! value for the lifetime of the store. Joining before any pool exists maps
//! the identity to [`PoolId::NONE`], which resolves to nothing.

use super::Datum;
use crate::error::{AssociationError, Result};
use nominal_types::{Identity, PoolId};
use std::collections::HashMap;
use tracing::debug;

/// Many values, each shared by the identities assigned to its pool
#[derive(Debug, Clone)]
pub struct PooledDatum<T> {
    membership: HashMap<Identity, PoolId>,
    pools: HashMap<PoolId, T>,
    counter: u64,
}

impl<T> PooledDatum<T> {
    /// Create a store with no pools
    pub fn new() -> Self {
        Self {
            membership: HashMap::new(),
            pools: HashMap::new(),
            counter: 0,
        }
    }

    /// Allocate a fresh pool holding `value` and move `id` into it
    ///
    /// The null identity creates nothing and gets `None` back.
    pub fn create_pool(&mut self, id: Identity, value: T) -> Option<&mut T> {
        if id.is_null() {
            return None;
        }
        self.counter += 1;
        let pool = PoolId(self.counter);
        self.membership.insert(id, pool);
        debug!(%id, %pool, "created pool");
        Some(self.pools.entry(pool).or_insert(value))
    }

    /// Map `id` to the most recently created pool
    ///
    /// Returns the pool id, which is [`PoolId::NONE`] when no pool exists.
    /// The null identity is never mapped.
    pub fn join_latest_pool(&mut self, id: Identity) -> PoolId {
        let pool = self.latest_pool();
        if !id.is_null() {
            self.membership.insert(id, pool);
            debug!(%id, %pool, "joined pool");
        }
        pool
    }

    /// Like `join_latest_pool`, but refuses to create a dangling membership
    pub fn try_join_latest_pool(&mut self, id: Identity) -> Result<PoolId> {
        if id.is_null() {
            return Err(AssociationError::NullIdentity);
        }
        if self.counter == 0 {
            return Err(AssociationError::NoPool);
        }
        Ok(self.join_latest_pool(id))
    }

    /// The newest pool id, or [`PoolId::NONE`] if none was created
    pub fn latest_pool(&self) -> PoolId {
        PoolId(self.counter)
    }

    /// Number of pools ever created
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Pool `id` is mapped to, including dangling ones
    pub fn pool_of(&self, id: Identity) -> Option<PoolId> {
        self.membership.get(&id).copied()
    }

    /// Value of a pool, regardless of who is in it
    pub fn pool_value(&self, pool: PoolId) -> Option<&T> {
        self.pools.get(&pool)
    }

    /// Identities currently mapped to `pool`, sorted
    pub fn members(&self, pool: PoolId) -> Vec<Identity> {
        let mut members: Vec<Identity> = self
            .membership
            .iter()
            .filter(|(_, p)| **p == pool)
            .map(|(id, _)| *id)
            .collect();
        members.sort();
        members
    }

    /// Like `resolve`, but an unmapped or dangling identity is an error
    pub fn try_resolve(&self, id: Identity) -> Result<&T> {
        self.require(id)
    }
}

impl<T: Clone> PooledDatum<T> {
    /// Remove `id` from its pool, returning a copy of the pool's value
    ///
    /// The pool keeps its value for any remaining members.
    pub fn leave_pool(&mut self, id: Identity) -> Option<T> {
        let pool = self.membership.remove(&id)?;
        debug!(%id, %pool, "left pool");
        self.pools.get(&pool).cloned()
    }
}

impl<T> Default for PooledDatum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Datum for PooledDatum<T> {
    type Value = T;

    fn resolve(&self, id: Identity) -> Option<&T> {
        self.membership
            .get(&id)
            .and_then(|pool| self.pools.get(pool))
    }

    fn resolve_mut(&mut self, id: Identity) -> Option<&mut T> {
        let pool = self.membership.get(&id)?;
        self.pools.get_mut(pool)
    }

    fn require(&self, id: Identity) -> Result<&T> {
        if id.is_null() {
            return Err(AssociationError::NullIdentity);
        }
        self.resolve(id).ok_or(AssociationError::NotPooled(id))
    }

    fn require_mut(&mut self, id: Identity) -> Result<&mut T> {
        if id.is_null() {
            return Err(AssociationError::NullIdentity);
        }
        self.resolve_mut(id).ok_or(AssociationError::NotPooled(id))
    }
}
