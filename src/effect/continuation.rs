//! Opaque result continuations

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Shared mapping function threaded through [`Continuation::map`]
pub(crate) type Tagger<M, N> = Arc<dyn Fn(M) -> N + Send + Sync>;

/// Turns the eventual result of a request or host effect into a message.
///
/// Continuations are stored until the result arrives and are never
/// compared or inspected. Cloning shares the underlying function.
pub struct Continuation<M> {
    inner: Arc<dyn Fn(Value) -> M + Send + Sync>,
}

impl<M: 'static> Continuation<M> {
    pub fn new(f: impl Fn(Value) -> M + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    /// Apply the continuation to a result value
    pub fn call(&self, value: Value) -> M {
        (self.inner)(value)
    }

    /// Compose `f` after this continuation.
    pub fn map<N: 'static>(self, f: impl Fn(M) -> N + Send + Sync + 'static) -> Continuation<N> {
        self.map_shared(&(Arc::new(f) as Tagger<M, N>))
    }

    pub(crate) fn map_shared<N: 'static>(self, f: &Tagger<M, N>) -> Continuation<N> {
        let inner = self.inner;
        let f = Arc::clone(f);
        Continuation {
            inner: Arc::new(move |value| f(inner(value))),
        }
    }
}

impl<M> Clone for Continuation<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M> fmt::Debug for Continuation<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Continuation(..)")
    }
}
