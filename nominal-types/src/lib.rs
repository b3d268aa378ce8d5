//! Shared handle types for nominal
//!
//! An [`Identity`] is a token with no data and no behavior. Stores and
//! behaviors record associations keyed by its raw value; the identity itself
//! never owns anything.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity handle
///
/// The raw value `0` is the null identity and means "no association".
/// Identities produced by [`Identity::create`] or an [`IdentityFactory`]
/// are never null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identity(u64);

static IDENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

impl Identity {
    /// The null identity
    pub const NULL: Identity = Identity(0);

    /// Create a fresh identity from the process-wide counter
    pub fn create() -> Self {
        Self(IDENTITY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a known raw value
    ///
    /// The caller is responsible for not colliding with live identities.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the underlying integer
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Check if this is the null identity
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "id:null")
        } else {
            write!(f, "id:{}", self.0)
        }
    }
}

impl From<Identity> for u64 {
    fn from(id: Identity) -> Self {
        id.0
    }
}

/// Explicit identity generator
///
/// Owns its own counter instead of sharing the process-wide one, so a host
/// can produce a reproducible sequence. Not synchronized.
#[derive(Debug, Clone)]
pub struct IdentityFactory {
    next: Option<u64>,
    issued: u64,
}

impl IdentityFactory {
    /// A factory whose first identity has raw value 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// A factory whose first identity has raw value `start`
    ///
    /// `0` is clamped to `1` since it is reserved for [`Identity::NULL`].
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: Some(start.max(1)),
            issued: 0,
        }
    }

    /// Produce the next identity
    ///
    /// Returns `None` once the raw value space is used up; the counter never
    /// wraps back to null.
    pub fn next_identity(&mut self) -> Option<Identity> {
        let raw = self.next?;
        self.next = raw.checked_add(1);
        self.issued += 1;
        Some(Identity(raw))
    }

    /// Check if another identity can still be produced
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }

    /// Number of identities produced so far
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl Default for IdentityFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Pool identifier inside a pooled store
///
/// `PoolId::NONE` is what a store hands out when an identity joins before any
/// pool exists; it never resolves to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PoolId(pub u64);

impl PoolId {
    /// The dangling pool id
    pub const NONE: PoolId = PoolId(0);

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool:{}", self.0)
    }
}
