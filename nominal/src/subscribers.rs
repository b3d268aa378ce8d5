//! Ordered subscriber sets
//!
//! Group stores and behaviors track who may see them. Membership is a set,
//! iteration follows subscription order so broadcasts are deterministic.

use indexmap::IndexSet;
use nominal_types::Identity;

/// Insertion-ordered set of subscribed identities
#[derive(Debug, Clone, Default)]
pub struct Subscribers {
    members: IndexSet<Identity>,
}

impl Subscribers {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity
    ///
    /// Returns true if it was newly added. The null identity is never added.
    pub fn subscribe(&mut self, id: Identity) -> bool {
        if id.is_null() {
            return false;
        }
        self.members.insert(id)
    }

    /// Remove an identity, keeping the order of the rest
    ///
    /// Returns true if it was present.
    pub fn unsubscribe(&mut self, id: Identity) -> bool {
        self.members.shift_remove(&id)
    }

    pub fn contains(&self, id: Identity) -> bool {
        self.members.contains(&id)
    }

    /// Iterate in subscription order
    pub fn iter(&self) -> impl Iterator<Item = Identity> + '_ {
        self.members.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Snapshot of the current members in order
    pub fn to_vec(&self) -> Vec<Identity> {
        self.iter().collect()
    }
}
