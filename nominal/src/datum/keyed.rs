//! Per-identity store
//!
//! Every identity that has been written gets its own slot. Writes through
//! the null identity are dropped.

use super::Datum;
use crate::error::{AssociationError, Result};
use nominal_types::Identity;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// One independently owned value per identity
#[derive(Debug, Clone)]
pub struct KeyedDatum<T> {
    slots: HashMap<Identity, T>,
}

impl<T> KeyedDatum<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Write `value` into the slot for `id`, creating it if absent
    ///
    /// Returns the stored value, or `None` (with no mutation) if `id` is
    /// null.
    pub fn associate(&mut self, id: Identity, value: T) -> Option<&mut T> {
        self.try_associate(id, value).ok()
    }

    /// Like `associate`, but a null identity is an error
    pub fn try_associate(&mut self, id: Identity, value: T) -> Result<&mut T> {
        if id.is_null() {
            debug!("dropping keyed write through the null identity");
            return Err(AssociationError::NullIdentity);
        }
        let slot = match self.slots.entry(id) {
            Entry::Occupied(mut entry) => {
                entry.insert(value);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(value),
        };
        Ok(slot)
    }

    /// Remove and return the slot for `id`
    ///
    /// An identity without a slot leaves the store untouched.
    pub fn disassociate(&mut self, id: Identity) -> Option<T> {
        let removed = self.slots.remove(&id);
        if removed.is_some() {
            debug!(%id, "disassociated keyed slot");
        }
        removed
    }

    /// Like `disassociate`, but a missing slot is an error
    pub fn try_disassociate(&mut self, id: Identity) -> Result<T> {
        if id.is_null() {
            return Err(AssociationError::NullIdentity);
        }
        self.disassociate(id).ok_or(AssociationError::Missing(id))
    }

    /// Check if `id` has a slot
    pub fn contains(&self, id: Identity) -> bool {
        self.slots.contains_key(&id)
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Identities that currently have a slot, in no particular order
    pub fn identities(&self) -> impl Iterator<Item = Identity> + '_ {
        self.slots.keys().copied()
    }

    /// Iterate over all slots, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (Identity, &T)> + '_ {
        self.slots.iter().map(|(id, value)| (*id, value))
    }
}

impl<T: Default> KeyedDatum<T> {
    /// Read/write access that creates a default slot for an unseen identity
    ///
    /// Every call with a new non-null identity grows the store; there is no
    /// eviction. Returns `None` only for the null identity.
    pub fn entry(&mut self, id: Identity) -> Option<&mut T> {
        if id.is_null() {
            return None;
        }
        Some(self.slots.entry(id).or_default())
    }
}

impl<T> Default for KeyedDatum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Datum for KeyedDatum<T> {
    type Value = T;

    fn resolve(&self, id: Identity) -> Option<&T> {
        self.slots.get(&id)
    }

    fn resolve_mut(&mut self, id: Identity) -> Option<&mut T> {
        self.slots.get_mut(&id)
    }

    fn require(&self, id: Identity) -> Result<&T> {
        if id.is_null() {
            return Err(AssociationError::NullIdentity);
        }
        self.slots.get(&id).ok_or(AssociationError::Missing(id))
    }

    fn require_mut(&mut self, id: Identity) -> Result<&mut T> {
        if id.is_null() {
            return Err(AssociationError::NullIdentity);
        }
        self.slots.get_mut(&id).ok_or(AssociationError::Missing(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_associate_and_resolve() {
        let mut names = KeyedDatum::new();
        let id = Identity::from_raw(1);

        names.associate(id, "Tester".to_string());
        assert_eq!(names.resolve(id).map(String::as_str), Some("Tester"));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_associate_overwrites() {
        let mut names = KeyedDatum::new();
        let id = Identity::from_raw(1);

        names.associate(id, "first");
        names.associate(id, "second");
        assert_eq!(names.resolve(id), Some(&"second"));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_null_write_is_noop() {
        let mut names = KeyedDatum::new();

        assert!(names.associate(Identity::NULL, 5).is_none());
        assert!(names.is_empty());
        assert_eq!(
            names.try_associate(Identity::NULL, 5),
            Err(AssociationError::NullIdentity)
        );
    }

    #[test]
    fn test_disassociate_returns_value() {
        let mut names = KeyedDatum::new();
        let id = Identity::from_raw(4);
        names.associate(id, 10);

        assert_eq!(names.disassociate(id), Some(10));
        assert!(!names.contains(id));
        assert_eq!(names.resolve(id), None);
    }

    #[test]
    fn test_disassociate_missing_does_not_mutate() {
        let mut names = KeyedDatum::new();
        let present = Identity::from_raw(1);
        let absent = Identity::from_raw(2);
        names.associate(present, 1);

        assert_eq!(names.disassociate(absent), None);
        assert_eq!(names.try_disassociate(absent), Err(AssociationError::Missing(absent)));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_resolve_does_not_allocate() {
        let names: KeyedDatum<u32> = KeyedDatum::new();
        assert_eq!(names.resolve(Identity::from_raw(3)), None);
        assert!(names.is_empty());
    }

    #[test]
    fn test_entry_allocates_default() {
        let mut counters: KeyedDatum<u32> = KeyedDatum::new();
        let id = Identity::from_raw(3);

        assert_eq!(counters.entry(id).copied(), Some(0));
        assert_eq!(counters.len(), 1);

        if let Some(counter) = counters.entry(id) {
            *counter += 1;
        }
        assert_eq!(counters.resolve(id), Some(&1));
        assert!(counters.entry(Identity::NULL).is_none());
        assert_eq!(counters.len(), 1);
    }

    #[test]
    fn test_require_reports_missing() {
        let names: KeyedDatum<u8> = KeyedDatum::new();
        let id = Identity::from_raw(8);
        assert_eq!(names.require(id), Err(AssociationError::Missing(id)));
        assert_eq!(names.require(Identity::NULL), Err(AssociationError::NullIdentity));
    }

    proptest! {
        #[test]
        fn prop_writes_are_isolated(a in 1u64..1000, b in 1u64..1000, va: i32, vb: i32, vb2: i32) {
            prop_assume!(a != b);
            let (a, b) = (Identity::from_raw(a), Identity::from_raw(b));
            let mut store = KeyedDatum::new();

            store.associate(a, va);
            store.associate(b, vb);
            store.associate(b, vb2);

            prop_assert_eq!(store.resolve(a), Some(&va));
            prop_assert_eq!(store.resolve(b), Some(&vb2));
        }
    }
}
