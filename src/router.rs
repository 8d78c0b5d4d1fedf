//! Message routing and effect resolution
//!
//! The router is a set of generic functions over a [`Registry`]: the
//! application's compile-time table mapping each aggregate message to its
//! unit's descriptor, and each service tag to its service descriptor.
//!
//! Everything here is synchronous. One call to [`dispatch`] runs the whole
//! cascade it triggers (service requests inside effect trees, responses
//! replayed through `dispatch`, requests those responses make, ...) depth
//! first, and returns the final state with every external task in order.

mod engine;

#[cfg(test)]
mod scenarios;

pub use engine::Engine;

use crate::descriptor::{Descriptor, ServiceDescriptor, ServiceTransition, Transition};
use crate::effect::{EffectTree, ServiceRequest, ServiceTag, Task};

/// The aggregate's match table.
///
/// `route` is a single `match` on the aggregate message that hands the
/// local message to [`update_component`] or [`update_service`] with the
/// unit's descriptor. `route_request` does the same for service tags via
/// [`request_service`], falling back to [`unknown_service`].
pub trait Registry: 'static {
    type State: 'static;
    type Msg: 'static;

    /// Initial aggregate state and the effects to resolve at start-up
    fn init() -> (Self::State, EffectTree<Self::Msg>);

    fn route(msg: Self::Msg, state: Self::State) -> Dispatched<Self::State, Self::Msg>;

    fn route_request(
        service: ServiceTag,
        request: ServiceRequest<Self::Msg>,
        state: Self::State,
    ) -> Dispatched<Self::State, Self::Msg>;
}

/// New aggregate state plus the external tasks gathered on the way
#[derive(Debug)]
pub struct Dispatched<S, A> {
    pub state: S,
    pub tasks: Vec<Task<A>>,
}

impl<S, A> Dispatched<S, A> {
    pub fn unchanged(state: S) -> Self {
        Self {
            state,
            tasks: vec![],
        }
    }

    /// Run `next` on the resulting state, appending its tasks after ours
    #[must_use]
    pub fn then(self, next: impl FnOnce(S) -> Dispatched<S, A>) -> Self {
        let Dispatched { state, mut tasks } = self;
        let step = next(state);
        tasks.extend(step.tasks);
        Dispatched {
            state: step.state,
            tasks,
        }
    }
}

type Step<R> = Dispatched<<R as Registry>::State, <R as Registry>::Msg>;

/// Deliver one aggregate message
pub fn dispatch<R: Registry>(msg: R::Msg, state: R::State) -> Step<R> {
    R::route(msg, state)
}

/// Walk an aggregate-level effect tree.
///
/// Service requests are run immediately; external tasks are collected.
pub fn resolve_effects<R: Registry>(state: R::State, tree: EffectTree<R::Msg>) -> Step<R> {
    match tree {
        EffectTree::Empty => Dispatched::unchanged(state),
        EffectTree::External(task) => Dispatched {
            state,
            tasks: vec![task],
        },
        EffectTree::Request(service, request) => {
            tracing::debug!(%service, label = %request.label, "Routing service request");
            R::route_request(service, request, state)
        }
        EffectTree::Batch(trees) => trees
            .into_iter()
            .fold(Dispatched::unchanged(state), |acc, tree| {
                acc.then(|state| resolve_effects::<R>(state, tree))
            }),
    }
}

/// Resolve `tree`, then replay `responses` in order through [`dispatch`]
pub fn process_effects_and_messages<R: Registry>(
    state: R::State,
    tree: EffectTree<R::Msg>,
    responses: Vec<R::Msg>,
) -> Step<R> {
    responses
        .into_iter()
        .fold(resolve_effects::<R>(state, tree), |acc, msg| {
            acc.then(|state| dispatch::<R>(msg, state))
        })
}

/// Run a component's update through its descriptor
pub fn update_component<R: Registry, L, M: 'static>(
    desc: &Descriptor<R::State, R::Msg, L, M>,
    msg: M,
    state: R::State,
) -> Step<R> {
    let Transition { new_state, effects } = (desc.update)(msg, (desc.read)(&state));
    let state = (desc.write)(new_state, state);
    tracing::trace!(unit = desc.name, "Component updated");
    process_effects_and_messages::<R>(state, effects.map(desc.lift), Vec::new())
}

/// Run a service's update through its descriptor
pub fn update_service<R: Registry, L, M: 'static>(
    desc: &ServiceDescriptor<R::State, R::Msg, L, M>,
    msg: M,
    state: R::State,
) -> Step<R> {
    let transition = (desc.update)(msg, (desc.read)(&state));
    tracing::trace!(service = %desc.tag, responses = transition.responses.len(), "Service updated");
    apply_service::<R, L, M>(desc, transition, state)
}

/// Hand a request to its service through the descriptor
pub fn request_service<R: Registry, L, M: 'static>(
    desc: &ServiceDescriptor<R::State, R::Msg, L, M>,
    request: ServiceRequest<R::Msg>,
    state: R::State,
) -> Step<R> {
    let transition = (desc.request)(request, (desc.read)(&state));
    apply_service::<R, L, M>(desc, transition, state)
}

/// Fallback for tags the registry does not know: nothing happens
pub fn unknown_service<R: Registry>(
    service: ServiceTag,
    request: &ServiceRequest<R::Msg>,
    state: R::State,
) -> Step<R> {
    tracing::warn!(%service, label = %request.label, "Dropping request for unregistered service");
    Dispatched::unchanged(state)
}

fn apply_service<R: Registry, L, M: 'static>(
    desc: &ServiceDescriptor<R::State, R::Msg, L, M>,
    transition: ServiceTransition<L, M, R::Msg>,
    state: R::State,
) -> Step<R> {
    let ServiceTransition {
        new_state,
        effects,
        responses,
    } = transition;
    let state = (desc.write)(new_state, state);
    process_effects_and_messages::<R>(state, effects.map(desc.lift), responses)
}
