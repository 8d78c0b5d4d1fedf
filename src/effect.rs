//! Effect trees produced by unit transitions
//!
//! Transitions never perform work themselves. They describe it as an
//! [`EffectTree`] which the router resolves: service requests are run in
//! place, opaque [`Task`]s are collected for the host.

mod continuation;
mod task;
mod tree;


pub use continuation::Continuation;
pub use task::{HostEffect, Task};
pub use tree::{EffectTree, ServiceRequest, ServiceTag};
