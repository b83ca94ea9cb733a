// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::engine::WorkflowContext;
use crate::errors::ExecutionError;
use crate::traits::{Executor, ExecutorFactory};
use crate::types::{Message, PayloadType};

/// Passthrough executor - forwards its input payload unchanged under another type
pub struct PassthroughExecutor {
    id: String,
    input_type: PayloadType,
    output_type: PayloadType,
}

impl PassthroughExecutor {
    pub fn new(
        id: impl Into<String>,
        input_type: impl Into<PayloadType>,
        output_type: impl Into<PayloadType>,
    ) -> Self {
        Self {
            id: id.into(),
            input_type: input_type.into(),
            output_type: output_type.into(),
        }
    }

    pub fn factory(input_type: impl Into<PayloadType>, output_type: impl Into<PayloadType>) -> ExecutorFactory {
        let input_type = input_type.into();
        let output_type = output_type.into();
        ExecutorFactory::new("passthrough", move |id| {
            Box::new(Self::new(id, input_type.clone(), output_type.clone()))
        })
    }
}

#[async_trait]
impl Executor for PassthroughExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn input_types(&self) -> Vec<PayloadType> {
        vec![self.input_type.clone()]
    }

    async fn handle(
        &mut self,
        message: Message,
        ctx: &mut WorkflowContext,
    ) -> Result<(), ExecutionError> {
        ctx.send_message(self.output_type.clone(), message.payload);
        Ok(())
    }
}
