// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::engine::WorkflowContext;
use crate::errors::ExecutionError;
use crate::traits::{Executor, ExecutorFactory};
use crate::types::{Message, PayloadType};

/// Yields every payload it receives as a workflow output.
///
/// Registered in configs as `echo_output`.
pub struct YieldOutputExecutor {
    id: String,
    input_type: PayloadType,
}

impl YieldOutputExecutor {
    pub fn new(id: impl Into<String>, input_type: impl Into<PayloadType>) -> Self {
        Self {
            id: id.into(),
            input_type: input_type.into(),
        }
    }

    pub fn factory(input_type: impl Into<PayloadType>) -> ExecutorFactory {
        let input_type = input_type.into();
        ExecutorFactory::new("echo_output", move |id| {
            Box::new(Self::new(id, input_type.clone()))
        })
    }
}

#[async_trait]
impl Executor for YieldOutputExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &'static str {
        "echo_output"
    }

    fn input_types(&self) -> Vec<PayloadType> {
        vec![self.input_type.clone()]
    }

    async fn handle(
        &mut self,
        message: Message,
        ctx: &mut WorkflowContext,
    ) -> Result<(), ExecutionError> {
        ctx.yield_output(message.payload);
        Ok(())
    }
}
