//! Group-shared store
//!
//! One value, visible to every subscribed identity. Unsubscribing only
//! changes visibility; the value stays where it is.

use super::Datum;
use crate::error::{AssociationError, Result};
use crate::subscribers::Subscribers;
use nominal_types::Identity;
use tracing::debug;

/// One value shared by a set of subscribed identities
#[derive(Debug, Clone)]
pub struct GroupDatum<T> {
    value: T,
    subscribers: Subscribers,
}

impl<T> GroupDatum<T> {
    /// Create a store around `value` with no subscribers
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Subscribers::new(),
        }
    }

    /// Grant `id` access to the shared value
    ///
    /// Returns true if it was newly subscribed. Null is ignored.
    pub fn subscribe(&mut self, id: Identity) -> bool {
        let added = self.subscribers.subscribe(id);
        if added {
            debug!(%id, "subscribed to group datum");
        }
        added
    }

    /// Revoke `id`'s access
    ///
    /// Returns true if it was subscribed.
    pub fn unsubscribe(&mut self, id: Identity) -> bool {
        let removed = self.subscribers.unsubscribe(id);
        if removed {
            debug!(%id, "unsubscribed from group datum");
        }
        removed
    }

    pub fn is_subscribed(&self, id: Identity) -> bool {
        self.subscribers.contains(id)
    }

    /// Current subscribers in subscription order
    pub fn subscribers(&self) -> &Subscribers {
        &self.subscribers
    }

    /// Number of subscribers
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Direct access to the value, skipping the subscription check
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Direct mutable access to the value, skipping the subscription check
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    /// Like `resolve`, but an unsubscribed identity is an error
    pub fn try_resolve(&self, id: Identity) -> Result<&T> {
        self.require(id)
    }
}

impl<T> Datum for GroupDatum<T> {
    type Value = T;

    fn resolve(&self, id: Identity) -> Option<&T> {
        self.subscribers.contains(id).then_some(&self.value)
    }

    fn resolve_mut(&mut self, id: Identity) -> Option<&mut T> {
        if self.subscribers.contains(id) {
            Some(&mut self.value)
        } else {
            None
        }
    }

    fn require(&self, id: Identity) -> Result<&T> {
        if id.is_null() {
            return Err(AssociationError::NullIdentity);
        }
        self.resolve(id).ok_or(AssociationError::NotSubscribed(id))
    }

    fn require_mut(&mut self, id: Identity) -> Result<&mut T> {
        if id.is_null() {
            return Err(AssociationError::NullIdentity);
        }
        self.resolve_mut(id).ok_or(AssociationError::NotSubscribed(id))
    }
}
