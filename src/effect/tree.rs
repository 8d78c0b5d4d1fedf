//! The recursive effect tree

use super::continuation::{Continuation, Tagger};
use super::task::Task;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Name of a registered service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ServiceTag(pub &'static str);

impl fmt::Display for ServiceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Payload of a request to a service: who is asking and how to answer
#[derive(Debug, Clone)]
pub struct ServiceRequest<M> {
    pub label: String,
    pub continuation: Continuation<M>,
}

impl<M: 'static> ServiceRequest<M> {
    pub fn new(label: impl Into<String>, continuation: Continuation<M>) -> Self {
        Self {
            label: label.into(),
            continuation,
        }
    }

    fn map_shared<N: 'static>(self, f: &Tagger<M, N>) -> ServiceRequest<N> {
        ServiceRequest {
            label: self.label,
            continuation: self.continuation.map_shared(f),
        }
    }
}

/// What to do after a transition.
///
/// `M` is the message type the tree's results eventually produce. A tree
/// built by a unit carries the unit's local message type and is lifted into
/// the aggregate message type with [`EffectTree::map`] before resolution.
#[derive(Debug, Clone)]
pub enum EffectTree<M> {
    Empty,
    External(Task<M>),
    Request(ServiceTag, ServiceRequest<M>),
    /// Resolved left to right
    Batch(Vec<EffectTree<M>>),
}

impl<M: 'static> EffectTree<M> {
    pub fn empty() -> Self {
        EffectTree::Empty
    }

    pub fn external(task: Task<M>) -> Self {
        EffectTree::External(task)
    }

    pub fn request(service: ServiceTag, request: ServiceRequest<M>) -> Self {
        EffectTree::Request(service, request)
    }

    pub fn batch(trees: impl IntoIterator<Item = EffectTree<M>>) -> Self {
        EffectTree::Batch(trees.into_iter().collect())
    }

    /// Sequence `other` after `self`
    #[must_use]
    pub fn and(self, other: EffectTree<M>) -> Self {
        match (self, other) {
            (EffectTree::Empty, tree) | (tree, EffectTree::Empty) => tree,
            (EffectTree::Batch(mut trees), other) => {
                trees.push(other);
                EffectTree::Batch(trees)
            }
            (tree, other) => EffectTree::Batch(vec![tree, other]),
        }
    }

    /// True when resolving the tree does nothing at all
    pub fn is_empty(&self) -> bool {
        match self {
            EffectTree::Empty => true,
            EffectTree::Batch(trees) => trees.iter().all(EffectTree::is_empty),
            EffectTree::External(_) | EffectTree::Request(..) => false,
        }
    }

    /// Lift every result path of the tree through `f`.
    ///
    /// Continuations are composed with `f`, never replaced, so a request
    /// lifted once per ownership level still answers its original caller.
    pub fn map<N: 'static>(self, f: impl Fn(M) -> N + Send + Sync + 'static) -> EffectTree<N> {
        self.map_shared(&(Arc::new(f) as Tagger<M, N>))
    }

    fn map_shared<N: 'static>(self, f: &Tagger<M, N>) -> EffectTree<N> {
        match self {
            EffectTree::Empty => EffectTree::Empty,
            EffectTree::External(task) => EffectTree::External(task.map_shared(f)),
            EffectTree::Request(service, request) => {
                EffectTree::Request(service, request.map_shared(f))
            }
            EffectTree::Batch(trees) => {
                EffectTree::Batch(trees.into_iter().map(|t| t.map_shared(f)).collect())
            }
        }
    }
}

impl<M> Default for EffectTree<M> {
    fn default() -> Self {
        EffectTree::Empty
    }
}

impl<M: 'static> From<Vec<EffectTree<M>>> for EffectTree<M> {
    fn from(trees: Vec<EffectTree<M>>) -> Self {
        EffectTree::Batch(trees)
    }
}

impl<M: 'static> From<Task<M>> for EffectTree<M> {
    fn from(task: Task<M>) -> Self {
        EffectTree::External(task)
    }
}
