//! Effect Router - message routing and effect composition for aggregated
//! state machines
//!
//! Independently written units (components and services) are bound into one
//! aggregate state through descriptors. Transitions are pure and return
//! effect trees; the router resolves those trees, running service requests
//! in place and collecting external tasks for the host.

pub mod config;
pub mod demo;
pub mod descriptor;
pub mod effect;
pub mod error;
pub mod router;
pub mod runtime;
pub mod service;

pub use descriptor::{Descriptor, ServiceDescriptor, ServiceTransition, Transition};
pub use effect::{Continuation, EffectTree, HostEffect, ServiceRequest, ServiceTag, Task};
pub use router::{Dispatched, Engine, Registry};
pub use service::{PendingTable, RequestId, ServiceMsg};
