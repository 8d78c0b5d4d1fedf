//! Host runtime around the engine
//!
//! The engine only returns tasks. This module is the collaborator that runs
//! them: messages arrive on an mpsc channel, each one goes through
//! [`Engine::dispatch`](crate::router::Engine::dispatch) on a single loop,
//! and every returned task is executed on its own tokio task. A finished
//! task's message goes back into the same channel like any other input.

mod executor;
pub mod traits;


pub use executor::{EngineRuntime, RuntimeHandle};
pub use traits::*;

/// Events broadcast by the runtime for monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A message went through the engine
    Dispatched { seq: u64, tasks: usize },
    /// A host effect failed; its continuation will never run
    EffectFailed { kind: String, message: String },
    Stopped { dispatched: u64 },
}
