//! Descriptors binding units into the aggregate
//!
//! A descriptor is a record of plain function pointers: how to find a unit's
//! local state inside the aggregate state, how to put an updated one back,
//! how to lift its messages, and how to run its transitions. The registry's
//! match table picks the descriptor for each message at compile time.

use crate::effect::{EffectTree, ServiceRequest, ServiceTag};

/// Result of a component transition
#[derive(Debug)]
pub struct Transition<L, M> {
    pub new_state: L,
    pub effects: EffectTree<M>,
}

impl<L, M: 'static> Transition<L, M> {
    pub fn new(state: L) -> Self {
        Self {
            new_state: state,
            effects: EffectTree::Empty,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: EffectTree<M>) -> Self {
        self.effects = self.effects.and(effect);
        self
    }
}

/// Result of a service transition: a component transition plus responses
/// addressed to the aggregate
#[derive(Debug)]
pub struct ServiceTransition<L, M, A> {
    pub new_state: L,
    pub effects: EffectTree<M>,
    pub responses: Vec<A>,
}

impl<L, M: 'static, A> ServiceTransition<L, M, A> {
    pub fn new(state: L) -> Self {
        Self {
            new_state: state,
            effects: EffectTree::Empty,
            responses: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: EffectTree<M>) -> Self {
        self.effects = self.effects.and(effect);
        self
    }

    #[must_use]
    pub fn with_response(mut self, response: A) -> Self {
        self.responses.push(response);
        self
    }

    #[must_use]
    pub fn with_responses(mut self, responses: impl IntoIterator<Item = A>) -> Self {
        self.responses.extend(responses);
        self
    }
}

impl<L, M: 'static, A> From<Transition<L, M>> for ServiceTransition<L, M, A> {
    fn from(t: Transition<L, M>) -> Self {
        Self {
            new_state: t.new_state,
            effects: t.effects,
            responses: vec![],
        }
    }
}

/// Binds a component with local state `L` and messages `M` into the
/// aggregate state `S` and message type `A`.
pub struct Descriptor<S, A, L, M> {
    /// Used in logs only
    pub name: &'static str,
    pub lift: fn(M) -> A,
    pub read: fn(&S) -> &L,
    pub write: fn(L, S) -> S,
    pub update: fn(M, &L) -> Transition<L, M>,
}

/// Binds a service into the aggregate.
///
/// Service state usually mentions `A` itself: stored continuations must end
/// up producing aggregate messages.
pub struct ServiceDescriptor<S, A, L, M> {
    pub tag: ServiceTag,
    pub lift: fn(M) -> A,
    pub read: fn(&S) -> &L,
    pub write: fn(L, S) -> S,
    pub update: fn(M, &L) -> ServiceTransition<L, M, A>,
    pub request: fn(ServiceRequest<A>, &L) -> ServiceTransition<L, M, A>,
}
