//! Behaviors
//!
//! A behavior is logic without identity or data. Identities subscribe to
//! it, and every invocation runs "as" one subscriber: the callable receives
//! a [`Dispatch`] naming that identity, which it uses to resolve store
//! values without passing identities around by hand.
//!
//! The behavior also remembers the identity of its latest dispatch. The
//! context is not reset when the callable returns, so
//! [`Behavior::resolve_in_context`] keeps answering for that identity until
//! the next dispatch.
//!
//! # Example
//!
//! ```rust
//! use nominal::prelude::*;
//!
//! let mut names = KeyedDatum::new();
//! let mut greet = Behavior::named("greet", |ctx: Dispatch, names: &KeyedDatum<String>| {
//!     ctx.resolve(names).cloned()
//! });
//!
//! let tester = Identity::create();
//! names.associate(tester, "Tester".to_string());
//! greet.subscribe(tester);
//!
//! assert_eq!(greet.invoke_all(&names), vec![Some("Tester".to_string())]);
//! assert_eq!(greet.context(), tester);
//! ```

use crate::datum::Datum;
use crate::error::{AssociationError, Result};
use crate::metrics::DispatchMetrics;
use crate::subscribers::Subscribers;
use nominal_types::Identity;
use std::fmt;
use std::time::Instant;
use tracing::{debug, trace};

/// The identity a callable is running as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    identity: Identity,
}

impl Dispatch {
    fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// The identity currently executing
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Resolve `datum` for the identity currently executing
    pub fn resolve<'d, D: Datum + ?Sized>(&self, datum: &'d D) -> Option<&'d D::Value> {
        datum.resolve(self.identity)
    }

    /// Mutable variant of [`Dispatch::resolve`]
    pub fn resolve_mut<'d, D: Datum + ?Sized>(
        &self,
        datum: &'d mut D,
    ) -> Option<&'d mut D::Value> {
        datum.resolve_mut(self.identity)
    }
}

/// Whether a behavior has ever dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    /// No dispatch has happened yet
    Idle,
    /// The context holds the identity of the latest dispatch
    Dispatching,
}

/// A callable bound to a set of subscribed identities
///
/// `F` is any `FnMut(Dispatch, A) -> R`. The bound lives on the invoking
/// methods so a closure that borrows its arguments can be invoked with
/// fresh borrows every time.
pub struct Behavior<F> {
    callable: F,
    subscribers: Subscribers,
    context: Identity,
    metrics: DispatchMetrics,
}

impl<F> Behavior<F> {
    /// Wrap a callable with no subscribers
    pub fn new(callable: F) -> Self {
        Self::named("anonymous", callable)
    }

    /// Wrap a callable under a label used in logs and metrics
    pub fn named(name: &'static str, callable: F) -> Self {
        Self {
            callable,
            subscribers: Subscribers::new(),
            context: Identity::NULL,
            metrics: DispatchMetrics::new(name),
        }
    }

    pub fn name(&self) -> &'static str {
        self.metrics.name()
    }

    /// Bind `id` to this behavior
    ///
    /// Returns true if it was newly subscribed. Null is ignored.
    pub fn subscribe(&mut self, id: Identity) -> bool {
        let added = self.subscribers.subscribe(id);
        if added {
            debug!(behavior = self.name(), %id, "subscribed");
        }
        added
    }

    /// Unbind `id`
    ///
    /// The context is left alone even if it names `id`.
    pub fn unsubscribe(&mut self, id: Identity) -> bool {
        let removed = self.subscribers.unsubscribe(id);
        if removed {
            debug!(behavior = self.name(), %id, "unsubscribed");
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

    /// Identity of the latest dispatch, or null if none happened
    pub fn context(&self) -> Identity {
        self.context
    }

    pub fn state(&self) -> BehaviorState {
        if self.context.is_null() {
            BehaviorState::Idle
        } else {
            BehaviorState::Dispatching
        }
    }

    /// Resolve `datum` for the context identity
    pub fn resolve_in_context<'d, D: Datum + ?Sized>(&self, datum: &'d D) -> Option<&'d D::Value> {
        datum.resolve(self.context)
    }

    /// Mutable variant of [`Behavior::resolve_in_context`]
    pub fn resolve_in_context_mut<'d, D: Datum + ?Sized>(
        &self,
        datum: &'d mut D,
    ) -> Option<&'d mut D::Value> {
        datum.resolve_mut(self.context)
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Prepare a call running as `id`
    ///
    /// For a subscriber this sets the context and returns a live
    /// [`Invocation`]; anyone else gets an inert one and the context is
    /// untouched.
    pub fn invoke_for(&mut self, id: Identity) -> Invocation<'_, F> {
        if self.subscribers.contains(id) {
            self.context = id;
            Invocation {
                behavior: Some(self),
                identity: id,
            }
        } else {
            trace!(behavior = self.name(), %id, "inert invocation");
            self.metrics.record_skip();
            Invocation {
                behavior: None,
                identity: id,
            }
        }
    }

    /// Like `invoke_for`, but a non-subscriber is an error
    pub fn try_invoke_for(&mut self, id: Identity) -> Result<Invocation<'_, F>> {
        if id.is_null() {
            self.metrics.record_skip();
            return Err(AssociationError::NullIdentity);
        }
        if !self.subscribers.contains(id) {
            self.metrics.record_skip();
            return Err(AssociationError::NotSubscribed(id));
        }
        Ok(self.invoke_for(id))
    }

    /// Invoke immediately for one identity
    ///
    /// Returns `None` without running anything if `id` is not subscribed.
    pub fn call_for<A, R>(&mut self, id: Identity, args: A) -> Option<R>
    where
        F: FnMut(Dispatch, A) -> R,
    {
        self.invoke_for(id).call(args)
    }

    /// Invoke once per subscriber, in subscription order
    ///
    /// Each run sees the side effects of the previous ones. The context is
    /// left at the last subscriber.
    pub fn invoke_all<A, R>(&mut self, args: A) -> Vec<R>
    where
        F: FnMut(Dispatch, A) -> R,
        A: Clone,
    {
        self.metrics.record_sweep();
        let targets = self.subscribers.to_vec();
        let mut results = Vec::with_capacity(targets.len());
        for id in targets {
            self.context = id;
            results.push(self.dispatch(id, args.clone()));
        }
        results
    }

    /// Like `invoke_all`, but every run gets a fresh reborrow of `args`
    ///
    /// This is how one mutable store (or a tuple of them) is swept over all
    /// subscribers, since `&mut` borrows cannot be cloned.
    pub fn invoke_all_mut<T, R>(&mut self, args: &mut T) -> Vec<R>
    where
        F: FnMut(Dispatch, &mut T) -> R,
        T: ?Sized,
    {
        self.metrics.record_sweep();
        let targets = self.subscribers.to_vec();
        let mut results = Vec::with_capacity(targets.len());
        for id in targets {
            self.context = id;
            results.push(self.dispatch(id, &mut *args));
        }
        results
    }

    fn dispatch<A, R>(&mut self, id: Identity, args: A) -> R
    where
        F: FnMut(Dispatch, A) -> R,
    {
        trace!(behavior = self.name(), %id, "dispatch");
        let start = Instant::now();
        let result = (self.callable)(Dispatch::new(id), args);
        self.metrics.record_dispatch(start.elapsed());
        result
    }
}

impl<F> fmt::Debug for Behavior<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("name", &self.name())
            .field("subscribers", &self.subscribers)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// A prepared call, bound to one identity
///
/// An inert invocation (target not subscribed) never runs the callable.
pub struct Invocation<'b, F> {
    behavior: Option<&'b mut Behavior<F>>,
    identity: Identity,
}

impl<F> Invocation<'_, F> {
    /// Check if calling this would do nothing
    pub fn is_inert(&self) -> bool {
        self.behavior.is_none()
    }

    /// The identity this invocation targets
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Run the callable as the bound identity
    ///
    /// Can be called repeatedly. Returns `None` for an inert invocation.
    pub fn call<A, R>(&mut self, args: A) -> Option<R>
    where
        F: FnMut(Dispatch, A) -> R,
    {
        let identity = self.identity;
        self.behavior
            .as_deref_mut()
            .map(|behavior| behavior.dispatch(identity, args))
    }
}

impl<F> fmt::Debug for Invocation<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("identity", &self.identity)
            .field("inert", &self.is_inert())
            .finish()
    }
}
