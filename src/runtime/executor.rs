//! The dispatch loop

use super::traits::EffectExecutor;
use super::RuntimeEvent;
use crate::config::RuntimeConfig;
use crate::effect::Task;
use crate::error::RuntimeError;
use crate::router::{Engine, Registry};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

type Observer<S> = Box<dyn Fn(&S) + Send>;

/// Owns the engine and feeds it one message at a time
pub struct EngineRuntime<R, X>
where
    R: Registry,
    X: EffectExecutor + 'static,
{
    engine: Engine<R>,
    executor: Arc<X>,
    msg_rx: mpsc::Receiver<R::Msg>,
    /// Cloned into every spawned task so results can re-enter
    msg_tx: mpsc::Sender<R::Msg>,
    event_tx: broadcast::Sender<RuntimeEvent>,
    shutdown: CancellationToken,
    /// Tasks produced while resolving start-up effects
    boot_tasks: Vec<Task<R::Msg>>,
    observer: Option<Observer<R::State>>,
}

/// Cloneable entry point for feeding messages to a running runtime
pub struct RuntimeHandle<M> {
    msg_tx: mpsc::Sender<M>,
    event_tx: broadcast::Sender<RuntimeEvent>,
    shutdown: CancellationToken,
}

impl<M> Clone for RuntimeHandle<M> {
    fn clone(&self) -> Self {
        Self {
            msg_tx: self.msg_tx.clone(),
            event_tx: self.event_tx.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<M> RuntimeHandle<M> {
    pub async fn send(&self, msg: M) -> Result<(), RuntimeError> {
        self.msg_tx.send(msg).await.map_err(|_| RuntimeError::Stopped)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.event_tx.subscribe()
    }

    /// Ask the loop to stop after the message it is currently handling
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl<R, X> EngineRuntime<R, X>
where
    R: Registry,
    R::State: Default,
    R::Msg: Send,
    X: EffectExecutor + 'static,
{
    pub fn new(config: &RuntimeConfig, executor: X) -> (Self, RuntimeHandle<R::Msg>) {
        let (msg_tx, msg_rx) = mpsc::channel(config.channel_capacity);
        let (event_tx, _) = broadcast::channel(config.event_capacity);
        let shutdown = CancellationToken::new();
        let (engine, boot_tasks) = Engine::start();

        let handle = RuntimeHandle {
            msg_tx: msg_tx.clone(),
            event_tx: event_tx.clone(),
            shutdown: shutdown.clone(),
        };
        let runtime = Self {
            engine,
            executor: Arc::new(executor),
            msg_rx,
            msg_tx,
            event_tx,
            shutdown,
            boot_tasks,
            observer: None,
        };
        (runtime, handle)
    }

    /// Call `observer` with the aggregate state after every dispatch
    #[must_use]
    pub fn with_observer(mut self, observer: impl Fn(&R::State) + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Run until shutdown is requested. Returns the final aggregate state.
    pub async fn run(mut self) -> R::State {
        tracing::info!(boot_tasks = self.boot_tasks.len(), "Starting engine runtime");

        for task in std::mem::take(&mut self.boot_tasks) {
            self.spawn_task(task);
        }

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => break,
                Some(msg) = self.msg_rx.recv() => self.process_message(msg),
            }
        }

        let dispatched = self.engine.dispatched();
        tracing::info!(dispatched, "Engine runtime stopped");
        let _ = self.event_tx.send(RuntimeEvent::Stopped { dispatched });
        self.engine.into_state()
    }

    fn process_message(&mut self, msg: R::Msg) {
        let tasks = self.engine.dispatch(msg);

        if let Some(observer) = &self.observer {
            observer(self.engine.state());
        }
        let _ = self.event_tx.send(RuntimeEvent::Dispatched {
            seq: self.engine.dispatched(),
            tasks: tasks.len(),
        });

        for task in tasks {
            self.spawn_task(task);
        }
    }

    /// Execute `task` in the background; its result re-enters as a message
    fn spawn_task(&self, task: Task<R::Msg>) {
        let executor = Arc::clone(&self.executor);
        let msg_tx = self.msg_tx.clone();
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            match executor.execute(&task.effect).await {
                Ok(result) => {
                    let Some(msg) = task.complete(result) else {
                        return;
                    };
                    if msg_tx.send(msg).await.is_err() {
                        tracing::debug!(kind = %task.effect.kind, "Runtime gone, dropping effect result");
                    }
                }
                Err(e) => {
                    tracing::warn!(kind = %task.effect.kind, error = %e, "Host effect failed");
                    let _ = event_tx.send(RuntimeEvent::EffectFailed {
                        kind: task.effect.kind.clone(),
                        message: e.to_string(),
                    });
                }
            }
        });
    }
}
