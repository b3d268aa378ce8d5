//! Single-owner store

use super::Datum;
use crate::error::{AssociationError, Result};
use nominal_types::Identity;
use tracing::debug;

/// One value owned by at most one identity at a time
///
/// Claiming revokes the previous owner without notifying it.
#[derive(Debug, Clone)]
pub struct SolitaryDatum<T> {
    value: T,
    owner: Identity,
}

impl<T> SolitaryDatum<T> {
    /// Create an unowned store around `value`
    pub fn new(value: T) -> Self {
        Self {
            value,
            owner: Identity::NULL,
        }
    }

    /// Make `id` the sole owner and return the value
    ///
    /// The null identity cannot own anything: the current owner stays and
    /// `None` is returned. Use [`release`](Self::release) to clear the owner.
    pub fn claim(&mut self, id: Identity) -> Option<&mut T> {
        if id.is_null() {
            return None;
        }
        if self.owner != id {
            if !self.owner.is_null() {
                debug!(previous = %self.owner, new = %id, "revoked solitary owner");
            }
            self.owner = id;
        }
        Some(&mut self.value)
    }

    /// Drop the current owner, returning it if there was one
    pub fn release(&mut self) -> Option<Identity> {
        let previous = std::mem::replace(&mut self.owner, Identity::NULL);
        (!previous.is_null()).then_some(previous)
    }

    /// Overwrite the value in place, keeping the owner
    pub fn assign(&mut self, value: T) {
        self.value = value;
    }

    /// The current owner, if any
    pub fn owner(&self) -> Option<Identity> {
        (!self.owner.is_null()).then_some(self.owner)
    }

    pub fn is_owner(&self, id: Identity) -> bool {
        !id.is_null() && self.owner == id
    }

    /// Direct access to the value, skipping the ownership check
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Direct mutable access to the value, skipping the ownership check
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Like `resolve`, but a non-owner is an error
    pub fn try_resolve(&self, id: Identity) -> Result<&T> {
        self.require(id)
    }
}

impl<T> Datum for SolitaryDatum<T> {
    type Value = T;

    fn resolve(&self, id: Identity) -> Option<&T> {
        self.is_owner(id).then_some(&self.value)
    }

    fn resolve_mut(&mut self, id: Identity) -> Option<&mut T> {
        if self.is_owner(id) {
            Some(&mut self.value)
        } else {
            None
        }
    }

    fn require(&self, id: Identity) -> Result<&T> {
        if id.is_null() {
            return Err(AssociationError::NullIdentity);
        }
        self.resolve(id).ok_or(AssociationError::NotOwner(id))
    }

    fn require_mut(&mut self, id: Identity) -> Result<&mut T> {
        if id.is_null() {
            return Err(AssociationError::NullIdentity);
        }
        self.resolve_mut(id).ok_or(AssociationError::NotOwner(id))
    }
}
