//! Single owner of the aggregate state

use super::{dispatch, resolve_effects, Dispatched, Registry};
use crate::effect::Task;

/// Holds the aggregate state between messages.
///
/// `State: Default` is only needed as a placeholder while a dispatch holds
/// the real state by value.
pub struct Engine<R: Registry> {
    state: R::State,
    dispatched: u64,
}

impl<R: Registry> Engine<R>
where
    R::State: Default,
{
    /// Build the initial state and resolve the start-up effects.
    ///
    /// Returns the engine together with the external tasks the start-up
    /// produced.
    pub fn start() -> (Self, Vec<Task<R::Msg>>) {
        let (state, effects) = R::init();
        let Dispatched { state, tasks } = resolve_effects::<R>(state, effects);
        tracing::debug!(tasks = tasks.len(), "Engine initialized");
        (
            Self {
                state,
                dispatched: 0,
            },
            tasks,
        )
    }

    /// Deliver one message and run everything it triggers to completion.
    ///
    /// The state is moved out for the duration of the call. If an update
    /// function or continuation panics, the engine is left holding
    /// `R::State::default()` rather than the state before the message.
    pub fn dispatch(&mut self, msg: R::Msg) -> Vec<Task<R::Msg>> {
        self.dispatched += 1;
        let _span = tracing::debug_span!("dispatch", seq = self.dispatched).entered();

        let state = std::mem::take(&mut self.state);
        let Dispatched { state, tasks } = dispatch::<R>(msg, state);
        self.state = state;

        tracing::debug!(tasks = tasks.len(), "Dispatch complete");
        tasks
    }

    pub fn state(&self) -> &R::State {
        &self.state
    }

    pub fn into_state(self) -> R::State {
        self.state
    }

    /// Number of messages delivered through [`Engine::dispatch`]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}
