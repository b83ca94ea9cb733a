// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::engine::WorkflowContext;
use crate::errors::ExecutionError;
use crate::traits::{Executor, ExecutorFactory};
use crate::types::{Message, PayloadType, RequestResponse};

/// A stub executor that yields a fixed output for any input it accepts
pub struct StubExecutor {
    pub id: String,
    input_type: PayloadType,
    output: Value,
}

impl StubExecutor {
    pub fn factory(input_type: impl Into<PayloadType>, output: Value) -> ExecutorFactory {
        let input_type = input_type.into();
        ExecutorFactory::new("stub", move |id| {
            Box::new(StubExecutor {
                id: id.to_string(),
                input_type: input_type.clone(),
                output: output.clone(),
            })
        })
    }
}

#[async_trait]
impl Executor for StubExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &'static str {
        "stub"
    }

    fn input_types(&self) -> Vec<PayloadType> {
        vec![self.input_type.clone()]
    }

    async fn handle(&mut self, _message: Message, ctx: &mut WorkflowContext) -> Result<(), ExecutionError> {
        ctx.yield_output(self.output.clone());
        Ok(())
    }
}

/// An executor that always fails for testing failure scenarios
pub struct FailingExecutor {
    pub id: String,
    input_type: PayloadType,
}

impl FailingExecutor {
    pub fn factory(input_type: impl Into<PayloadType>) -> ExecutorFactory {
        let input_type = input_type.into();
        ExecutorFactory::new("failing", move |id| {
            Box::new(FailingExecutor {
                id: id.to_string(),
                input_type: input_type.clone(),
            })
        })
    }
}

#[async_trait]
impl Executor for FailingExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &'static str {
        "failing"
    }

    fn input_types(&self) -> Vec<PayloadType> {
        vec![self.input_type.clone()]
    }

    async fn handle(&mut self, _message: Message, _ctx: &mut WorkflowContext) -> Result<(), ExecutionError> {
        Err(ExecutionError::HandlerFailed {
            executor_id: self.id.clone(),
            message: "intentional failure for testing".to_string(),
        })
    }
}

/// An executor that asks the caller once and yields whatever it is told
pub struct AskOnceExecutor {
    pub id: String,
    input_type: PayloadType,
    request_type: PayloadType,
}

impl AskOnceExecutor {
    pub fn factory(input_type: impl Into<PayloadType>, request_type: impl Into<PayloadType>) -> ExecutorFactory {
        let input_type = input_type.into();
        let request_type = request_type.into();
        ExecutorFactory::new("ask_once", move |id| {
            Box::new(AskOnceExecutor {
                id: id.to_string(),
                input_type: input_type.clone(),
                request_type: request_type.clone(),
            })
        })
    }
}

#[async_trait]
impl Executor for AskOnceExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &'static str {
        "ask_once"
    }

    fn input_types(&self) -> Vec<PayloadType> {
        vec![
            self.input_type.clone(),
            PayloadType::response_to(&self.request_type),
        ]
    }

    async fn handle(&mut self, message: Message, ctx: &mut WorkflowContext) -> Result<(), ExecutionError> {
        if message.payload_type == self.input_type {
            ctx.request_info(self.request_type.clone(), message.payload);
        } else {
            let response: RequestResponse = message.into_payload()?;
            ctx.yield_output(response.response_data);
        }
        Ok(())
    }
}
