// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::engine::WorkflowContext;
use crate::errors::ExecutionError;
use crate::types::{Message, PayloadType};

/// A node of the workflow graph.
///
/// Each executor declares the payload types it handles. The run engine checks
/// an incoming message against [`Executor::input_types`] before calling
/// [`Executor::handle`], so an undeclared type fails fast with
/// `ExecutionError::UnhandledMessageType`.
///
/// Handlers run to completion. The only sanctioned way to pause is
/// `WorkflowContext::request_info`; the engine owns the wait.
#[async_trait]
pub trait Executor: Send {
    /// The id this instance was created for.
    fn id(&self) -> &str;

    /// Short name of the implementation, used in logs.
    fn name(&self) -> &'static str;

    /// Payload types this executor has handlers for.
    fn input_types(&self) -> Vec<PayloadType>;

    async fn handle(
        &mut self,
        message: Message,
        ctx: &mut WorkflowContext,
    ) -> Result<(), ExecutionError>;

    /// Serializable view of private state, captured by run checkpoints.
    fn snapshot_state(&self) -> Option<Value> {
        None
    }

    /// Reload state captured by [`Executor::snapshot_state`].
    fn restore_state(&mut self, _state: Value) -> Result<(), ExecutionError> {
        Ok(())
    }
}

/// Creates a fresh executor instance for one workflow run.
///
/// A `Workflow` stores factories rather than executors so the definition stays
/// immutable and every run gets its own executor state.
#[derive(Clone)]
pub struct ExecutorFactory {
    kind: &'static str,
    build: Arc<dyn Fn(&str) -> Box<dyn Executor> + Send + Sync>,
}

impl ExecutorFactory {
    pub fn new<F>(kind: &'static str, build: F) -> Self
    where
        F: Fn(&str) -> Box<dyn Executor> + Send + Sync + 'static,
    {
        Self {
            kind,
            build: Arc::new(build),
        }
    }

    pub fn create(&self, executor_id: &str) -> Box<dyn Executor> {
        (self.build)(executor_id)
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl fmt::Debug for ExecutorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorFactory")
            .field("kind", &self.kind)
            .finish()
    }
}
