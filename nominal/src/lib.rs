//! Nominal - composition by association
//!
//! This crate separates three concerns that inheritance usually fuses:
//!
//! - **Identity** ([`Identity`]): a token with no data and no logic
//! - **Data** ([`datum`]): containers that grant identities access to values
//! - **Behavior** ([`Behavior`]): logic that runs "as" one identity at a time
//!
//! An object is just an identity plus whatever it has been associated
//! with. Each store picks its own sharing policy:
//!
//! ```text
//!   KeyedDatum    one value per identity          associate / disassociate
//!   GroupDatum    one value, many subscribers     subscribe / unsubscribe
//!   SolitaryDatum one value, one owner at a time  claim / assign
//!   PooledDatum   many values, grouped by pool    create_pool / join / leave
//! ```
//!
//! Lookups never fall back to a shared default: an identity without access
//! resolves to `None`, and the `try_*`/`require` variants explain why via
//! [`AssociationError`].
//!
//! Everything here is single-threaded and in-memory. Stores and behaviors
//! are plain values owned by whoever declares them.
//!
//! # Example
//!
//! ```rust
//! use nominal::prelude::*;
//!
//! let mut hp = KeyedDatum::new();
//! let mut crown = SolitaryDatum::new("crown");
//!
//! let knight = Identity::create();
//! let squire = Identity::create();
//! hp.associate(knight, 10);
//! hp.associate(squire, 4);
//! crown.claim(knight);
//!
//! let mut heal = Behavior::named("heal", |ctx: Dispatch, hp: &mut KeyedDatum<i32>| {
//!     if let Some(points) = ctx.resolve_mut(hp) {
//!         *points += 1;
//!     }
//! });
//! heal.subscribe(squire);
//! heal.call_for(squire, &mut hp);
//!
//! assert_eq!(hp.resolve(squire), Some(&5));
//! assert_eq!(crown.resolve(squire), None);
//! assert_eq!(crown.resolve(knight), Some(&"crown"));
//! ```

#![warn(missing_debug_implementations)]

pub mod behavior;
pub mod datum;
pub mod error;
pub mod metrics;
pub mod subscribers;

pub use behavior::{Behavior, BehaviorState, Dispatch, Invocation};
pub use datum::{Datum, GroupDatum, KeyedDatum, PooledDatum, SolitaryDatum};
pub use error::{AssociationError, Result};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use nominal_types::{Identity, IdentityFactory, PoolId};
pub use subscribers::Subscribers;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::behavior::{Behavior, Dispatch};
    pub use crate::datum::{Datum, GroupDatum, KeyedDatum, PooledDatum, SolitaryDatum};
    pub use crate::error::AssociationError;
    pub use nominal_types::{Identity, IdentityFactory, PoolId};
}
