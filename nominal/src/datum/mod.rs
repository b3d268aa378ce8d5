//! Data stores
//!
//! A datum holds data without holding identity. Identities are granted
//! access to it under one of four sharing policies:
//!
//! - [`KeyedDatum`]: one independent value per identity
//! - [`GroupDatum`]: one value visible to a subscribed set of identities
//! - [`SolitaryDatum`]: one value, at most one owner at a time
//! - [`PooledDatum`]: many values, each shared by the identities in its pool
//!
//! All of them implement [`Datum`], which is what behaviors use to resolve
//! values for the identity currently executing.

use crate::error::Result;
use nominal_types::Identity;

mod group;
mod keyed;
mod pooled;
mod solitary;

pub use group::GroupDatum;
pub use keyed::KeyedDatum;
pub use pooled::PooledDatum;
pub use solitary::SolitaryDatum;

/// Common lookup interface for every store
///
/// `resolve` never allocates and never hands out a fallback value: an
/// identity without access gets `None`.
pub trait Datum {
    /// Type of the stored value
    type Value;

    /// Read the value visible to `id`
    fn resolve(&self, id: Identity) -> Option<&Self::Value>;

    /// Mutable access to the value visible to `id`
    fn resolve_mut(&mut self, id: Identity) -> Option<&mut Self::Value>;

    /// Check if `id` can currently see a value
    fn is_associated(&self, id: Identity) -> bool {
        self.resolve(id).is_some()
    }

    /// Like `resolve`, but reports why access failed
    fn require(&self, id: Identity) -> Result<&Self::Value>;

    /// Like `resolve_mut`, but reports why access failed
    fn require_mut(&mut self, id: Identity) -> Result<&mut Self::Value>;
}
