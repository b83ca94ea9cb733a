// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::WorkflowContext;
use crate::errors::{ExecutionError, RegistryError};
use crate::observability::messages::executor::StateSnapshotFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::{Executor, ExecutorFactory};
use crate::types::{Message, PayloadType};

/// A handler over private state `S`.
pub type Handler<S> =
    Arc<dyn Fn(&mut S, Message, &mut WorkflowContext) -> Result<(), ExecutionError> + Send + Sync>;

/// Explicit payload-type to handler registry, built before any run starts.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use the_handoff::backends::local::HandlerTable;
///
/// let factory = HandlerTable::<u32>::new()
///     .on("tick", |count, _message, ctx| {
///         *count += 1;
///         ctx.yield_output(json!(*count));
///         Ok(())
///     })
///     .unwrap()
///     .into_factory(|| 0);
///
/// let executor = factory.create("counter");
/// assert_eq!(executor.id(), "counter");
/// ```
pub struct HandlerTable<S> {
    handlers: HashMap<PayloadType, Handler<S>>,
    /// Registration order, reported by `input_types`.
    order: Vec<PayloadType>,
}

impl<S> Clone for HandlerTable<S> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            order: self.order.clone(),
        }
    }
}

impl<S> Default for HandlerTable<S> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<S: Send + 'static> HandlerTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `payload_type`.
    ///
    /// A type can only be registered once; a second registration is rejected
    /// rather than replacing the first.
    pub fn on<F>(mut self, payload_type: impl Into<PayloadType>, handler: F) -> Result<Self, RegistryError>
    where
        F: Fn(&mut S, Message, &mut WorkflowContext) -> Result<(), ExecutionError>
            + Send
            + Sync
            + 'static,
    {
        let payload_type = payload_type.into();
        if self.handlers.contains_key(&payload_type) {
            return Err(RegistryError::DuplicateHandler { payload_type });
        }

        self.order.push(payload_type.clone());
        self.handlers.insert(payload_type, Arc::new(handler));
        Ok(self)
    }

    pub fn input_types(&self) -> Vec<PayloadType> {
        self.order.clone()
    }

    /// Factory producing a [`FunctionExecutor`] with state from `init` for every run.
    ///
    /// The state is not captured by run checkpoints. Use
    /// [`HandlerTable::into_checkpointed_factory`] when a restored run must
    /// continue from it.
    pub fn into_factory<I>(self, init: I) -> ExecutorFactory
    where
        I: Fn() -> S + Send + Sync + 'static,
    {
        self.build_factory(init, None)
    }

    fn build_factory<I>(self, init: I, codec: Option<StateCodec<S>>) -> ExecutorFactory
    where
        I: Fn() -> S + Send + Sync + 'static,
    {
        ExecutorFactory::new("function", move |id| {
            Box::new(FunctionExecutor {
                id: id.to_string(),
                state: init(),
                handlers: self.clone(),
                codec,
            })
        })
    }
}

impl<S: Serialize + DeserializeOwned + Send + 'static> HandlerTable<S> {
    /// Like [`HandlerTable::into_factory`], but the state is serialized into
    /// run checkpoints and reloaded on restore.
    pub fn into_checkpointed_factory<I>(self, init: I) -> ExecutorFactory
    where
        I: Fn() -> S + Send + Sync + 'static,
    {
        let codec = StateCodec {
            snapshot: snapshot_json::<S>,
            restore: serde_json::from_value::<S>,
        };
        self.build_factory(init, Some(codec))
    }
}

fn snapshot_json<S: Serialize>(state: &S) -> serde_json::Result<Value> {
    serde_json::to_value(state)
}

/// Converts executor state to and from checkpoint JSON.
struct StateCodec<S> {
    snapshot: fn(&S) -> serde_json::Result<Value>,
    restore: fn(Value) -> serde_json::Result<S>,
}

impl<S> Clone for StateCodec<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for StateCodec<S> {}

/// Executor dispatching each message to the handler registered for its type.
pub struct FunctionExecutor<S> {
    id: String,
    state: S,
    handlers: HandlerTable<S>,
    codec: Option<StateCodec<S>>,
}

impl<S> FunctionExecutor<S> {
    pub fn state(&self) -> &S {
        &self.state
    }
}

#[async_trait]
impl<S: Send + 'static> Executor for FunctionExecutor<S> {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &'static str {
        "function"
    }

    fn input_types(&self) -> Vec<PayloadType> {
        self.handlers.input_types()
    }

    async fn handle(
        &mut self,
        message: Message,
        ctx: &mut WorkflowContext,
    ) -> Result<(), ExecutionError> {
        let handler = self
            .handlers
            .handlers
            .get(&message.payload_type)
            .cloned()
            .ok_or_else(|| ExecutionError::UnhandledMessageType {
                executor_id: self.id.clone(),
                payload_type: message.payload_type.clone(),
            })?;

        handler(&mut self.state, message, ctx)
    }

    fn snapshot_state(&self) -> Option<Value> {
        let codec = self.codec?;
        match (codec.snapshot)(&self.state) {
            Ok(state) => Some(state),
            Err(error) => {
                StateSnapshotFailed {
                    executor_id: &self.id,
                    error: &error,
                }
                .log();
                None
            }
        }
    }

    fn restore_state(&mut self, state: Value) -> Result<(), ExecutionError> {
        let codec = self.codec.ok_or_else(|| {
            ExecutionError::Checkpoint(format!(
                "executor '{}' does not accept checkpointed state",
                self.id
            ))
        })?;
        self.state = (codec.restore)(state).map_err(|error| {
            ExecutionError::Checkpoint(format!(
                "invalid state for executor '{}': {}",
                self.id, error
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::Effect;
    use serde_json::json;

    #[test]
    fn test_duplicate_handler_rejected() {
        let result = HandlerTable::<()>::new()
            .on("text", |_, _, _| Ok(()))
            .unwrap()
            .on("text", |_, _, _| Ok(()));

        match result {
            Err(RegistryError::DuplicateHandler { payload_type }) => {
                assert_eq!(payload_type.as_str(), "text")
            }
            Err(other) => panic!("Expected DuplicateHandler, got {}", other),
            Ok(_) => panic!("Expected DuplicateHandler"),
        }
    }

    #[test]
    fn test_input_types_follow_registration_order() {
        let table = HandlerTable::<()>::new()
            .on("b", |_, _, _| Ok(()))
            .unwrap()
            .on("a", |_, _, _| Ok(()))
            .unwrap();

        assert_eq!(
            table.input_types(),
            vec![PayloadType::from("b"), PayloadType::from("a")]
        );
    }

    #[tokio::test]
    async fn test_state_is_per_instance() {
        let factory = HandlerTable::<u32>::new()
            .on("tick", |count, _, ctx| {
                *count += 1;
                ctx.yield_output(json!(*count));
                Ok(())
            })
            .unwrap()
            .into_factory(|| 10);

        let mut first = factory.create("a");
        let mut second = factory.create("b");

        for _ in 0..2 {
            let mut ctx = WorkflowContext::new("a", 1);
            first
                .handle(Message::new("tick", json!(null), None, "a"), &mut ctx)
                .await
                .unwrap();
        }

        let mut ctx = WorkflowContext::new("b", 1);
        second
            .handle(Message::new("tick", json!(null), None, "b"), &mut ctx)
            .await
            .unwrap();

        assert_eq!(ctx.into_effects(), vec![Effect::Output(json!(11))]);
    }

    #[tokio::test]
    async fn test_unregistered_type_is_unhandled() {
        let mut executor = HandlerTable::<()>::new()
            .on("text", |_, _, _| Ok(()))
            .unwrap()
            .into_factory(|| ())
            .create("x");

        let mut ctx = WorkflowContext::new("x", 1);
        let err = executor
            .handle(Message::new("image", json!(null), None, "x"), &mut ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::UnhandledMessageType { .. }));
    }

    #[tokio::test]
    async fn test_checkpointed_state_round_trips() {
        let table = HandlerTable::<u32>::new()
            .on("tick", |count, _, _| {
                *count += 1;
                Ok(())
            })
            .unwrap();
        let plain = table.clone().into_factory(|| 0).create("plain");
        let factory = table.into_checkpointed_factory(|| 0);

        let mut executor = factory.create("c");
        for _ in 0..3 {
            let mut ctx = WorkflowContext::new("c", 1);
            executor
                .handle(Message::new("tick", json!(null), None, "c"), &mut ctx)
                .await
                .unwrap();
        }

        let snapshot = executor.snapshot_state();
        assert_eq!(snapshot, Some(json!(3)));
        assert_eq!(plain.snapshot_state(), None);

        let mut restored = factory.create("c");
        assert_eq!(restored.snapshot_state(), Some(json!(0)));
        restored.restore_state(json!(3)).unwrap();
        assert_eq!(restored.snapshot_state(), Some(json!(3)));

        let err = restored.restore_state(json!("three")).unwrap_err();
        assert!(matches!(err, ExecutionError::Checkpoint(_)));
    }
}
