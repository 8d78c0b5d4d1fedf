//! Pending-request bookkeeping for services

use crate::effect::{Continuation, ServiceRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Id handed out by a service for one request. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request waiting for its result
#[derive(Debug)]
pub struct PendingEntry<A> {
    pub id: RequestId,
    pub label: String,
    continuation: Continuation<A>,
}

impl<A> Clone for PendingEntry<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: self.label.clone(),
            continuation: self.continuation.clone(),
        }
    }
}

/// Read-only view of a pending entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingListing {
    pub id: RequestId,
    pub label: String,
}

/// Requests a service has accepted but not yet answered.
///
/// Transitions are pure: each returns a new table and leaves `self` alone.
#[derive(Debug)]
pub struct PendingTable<A> {
    next_id: u64,
    pending: BTreeMap<RequestId, PendingEntry<A>>,
}

impl<A> Clone for PendingTable<A> {
    fn clone(&self) -> Self {
        Self {
            next_id: self.next_id,
            pending: self.pending.clone(),
        }
    }
}

impl<A> Default for PendingTable<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<A: 'static> PendingTable<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `request` under a freshly allocated id
    #[must_use]
    pub fn insert(&self, request: ServiceRequest<A>) -> (Self, RequestId) {
        let id = RequestId(self.next_id);
        let mut next = self.clone();
        next.next_id += 1;
        next.pending.insert(
            id,
            PendingEntry {
                id,
                label: request.label,
                continuation: request.continuation,
            },
        );
        (next, id)
    }

    /// Remove the entry for `id` and build its response message.
    ///
    /// Returns `None` when `id` is unknown or was already resolved.
    #[must_use]
    pub fn resolve(&self, id: RequestId, value: Value) -> Option<(Self, A)> {
        let entry = self.pending.get(&id)?;
        let response = entry.continuation.call(value);
        let mut next = self.clone();
        next.pending.remove(&id);
        Some((next, response))
    }

    /// Pending entries in id order
    pub fn listing(&self) -> Vec<PendingListing> {
        self.pending
            .values()
            .map(|e| PendingListing {
                id: e.id,
                label: e.label.clone(),
            })
            .collect()
    }

    pub fn get(&self, id: RequestId) -> Option<&PendingEntry<A>> {
        self.pending.get(&id)
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    /// The id the next request will receive
    pub fn next_id(&self) -> RequestId {
        RequestId(self.next_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
