//! Generic service contract
//!
//! A service accepts requests from any unit, parks each one in its
//! [`PendingTable`] and answers later, when a [`ServiceMsg::Resolve`] for
//! the request's id arrives. The answer is the stored continuation applied
//! to the result value, returned as an aggregate response message.
//!
//! The functions here have exactly the shapes a [`ServiceDescriptor`]
//! expects, so a plain service is just these functions plus read/write/lift.
//!
//! [`ServiceDescriptor`]: crate::descriptor::ServiceDescriptor

mod pending;


pub use pending::{PendingEntry, PendingListing, PendingTable, RequestId};

use crate::descriptor::ServiceTransition;
use crate::effect::ServiceRequest;
use serde_json::Value;

/// Local messages understood by every service
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceMsg {
    /// Answer request `id` with `value`
    Resolve { id: RequestId, value: Value },
}

pub type ServiceResult<A> = ServiceTransition<PendingTable<A>, ServiceMsg, A>;

pub fn init<A: 'static>() -> PendingTable<A> {
    PendingTable::new()
}

/// Register the request. Nothing happens until it is resolved.
pub fn request<A: 'static>(request: ServiceRequest<A>, state: &PendingTable<A>) -> ServiceResult<A> {
    let label = request.label.clone();
    let (next, id) = state.insert(request);
    tracing::debug!(%id, %label, pending = next.len(), "Request queued");
    ServiceTransition::new(next)
}

pub fn update<A: 'static>(msg: ServiceMsg, state: &PendingTable<A>) -> ServiceResult<A> {
    match msg {
        ServiceMsg::Resolve { id, value } => match state.resolve(id, value) {
            Some((next, response)) => {
                tracing::debug!(%id, pending = next.len(), "Request resolved");
                ServiceTransition::new(next).with_response(response)
            }
            None => {
                tracing::debug!(%id, "Ignoring resolve for unknown request");
                ServiceTransition::new(state.clone())
            }
        },
    }
}
