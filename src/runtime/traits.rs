//! Trait abstractions for effect execution
//!
//! These traits enable testing the runtime with mock implementations.

use crate::effect::HostEffect;
use crate::error::ExecutorError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Runs host effects on behalf of the runtime
#[async_trait]
pub trait EffectExecutor: Send + Sync {
    /// Execute one effect, producing the value handed to its continuation
    async fn execute(&self, effect: &HostEffect) -> Result<Value, ExecutorError>;
}

#[async_trait]
impl<T: EffectExecutor + ?Sized> EffectExecutor for Arc<T> {
    async fn execute(&self, effect: &HostEffect) -> Result<Value, ExecutorError> {
        (**self).execute(effect).await
    }
}
