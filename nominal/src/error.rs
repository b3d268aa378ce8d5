//! Error types for association lookups
//!
//! The plain accessors on stores and behaviors never fail loudly: they
//! return `Option` or silently skip. The `try_*` variants report the same
//! conditions through [`AssociationError`].

use nominal_types::Identity;
use thiserror::Error;

/// Why an association could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssociationError {
    /// The null identity cannot carry associations
    #[error("the null identity cannot be associated")]
    NullIdentity,

    /// Identity is not subscribed to a group store or behavior
    #[error("{0} is not subscribed")]
    NotSubscribed(Identity),

    /// Identity does not own a single-owner store
    #[error("{0} is not the current owner")]
    NotOwner(Identity),

    /// Identity is not mapped to a live pool
    #[error("{0} is not a member of any pool")]
    NotPooled(Identity),

    /// A pool was required but none has been created yet
    #[error("no pool has been created")]
    NoPool,

    /// Identity has no value in a keyed store
    #[error("no value associated with {0}")]
    Missing(Identity),
}

/// Result type using AssociationError
pub type Result<T> = std::result::Result<T, AssociationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let id = Identity::from_raw(3);
        assert_eq!(AssociationError::NotOwner(id).to_string(), "id:3 is not the current owner");
        assert_eq!(
            AssociationError::NullIdentity.to_string(),
            "the null identity cannot be associated"
        );
    }
}
