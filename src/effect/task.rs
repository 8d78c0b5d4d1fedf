//! Opaque external effects handed to the host

use super::continuation::{Continuation, Tagger};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A unit of external work the router forwards verbatim.
///
/// `kind` and `payload` are interpreted only by the host's executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEffect {
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl HostEffect {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

/// A host effect plus the optional way back into the message loop
#[derive(Debug, Clone)]
pub struct Task<M> {
    pub effect: HostEffect,
    on_complete: Option<Continuation<M>>,
}

impl<M: 'static> Task<M> {
    /// Run `effect` and discard its result
    pub fn fire_and_forget(effect: HostEffect) -> Self {
        Self {
            effect,
            on_complete: None,
        }
    }

    /// Run `effect` and feed its result through `on_complete`
    pub fn perform(effect: HostEffect, on_complete: Continuation<M>) -> Self {
        Self {
            effect,
            on_complete: Some(on_complete),
        }
    }

    /// Build the message produced by a completed effect, if any
    pub fn complete(&self, result: Value) -> Option<M> {
        self.on_complete.as_ref().map(|k| k.call(result))
    }

    pub fn expects_result(&self) -> bool {
        self.on_complete.is_some()
    }

    pub(crate) fn map_shared<N: 'static>(self, f: &Tagger<M, N>) -> Task<N> {
        Task {
            effect: self.effect,
            on_complete: self.on_complete.map(|k| k.map_shared(f)),
        }
    }
}
