// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::engine::WorkflowContext;
use crate::errors::ExecutionError;
use crate::traits::{Executor, ExecutorFactory};
use crate::types::{Message, PayloadType, RequestResponse};

/// Relay node that hands its input to the caller and forwards the answer.
///
/// A message of `request_type` becomes a request-info event and pauses this
/// path of the workflow. When the caller answers, the response data is sent
/// along this node's outgoing edges as `response_type`.
pub struct RequestInfoExecutor {
    id: String,
    request_type: PayloadType,
    response_type: PayloadType,
}

impl RequestInfoExecutor {
    pub fn new(
        id: impl Into<String>,
        request_type: impl Into<PayloadType>,
        response_type: impl Into<PayloadType>,
    ) -> Self {
        Self {
            id: id.into(),
            request_type: request_type.into(),
            response_type: response_type.into(),
        }
    }

    pub fn factory(
        request_type: impl Into<PayloadType>,
        response_type: impl Into<PayloadType>,
    ) -> ExecutorFactory {
        let request_type = request_type.into();
        let response_type = response_type.into();
        ExecutorFactory::new("request_info", move |id| {
            Box::new(Self::new(id, request_type.clone(), response_type.clone()))
        })
    }
}

#[async_trait]
impl Executor for RequestInfoExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &'static str {
        "request_info"
    }

    fn input_types(&self) -> Vec<PayloadType> {
        vec![
            self.request_type.clone(),
            PayloadType::response_to(&self.request_type),
        ]
    }

    async fn handle(
        &mut self,
        message: Message,
        ctx: &mut WorkflowContext,
    ) -> Result<(), ExecutionError> {
        if message.payload_type == self.request_type {
            ctx.request_info(self.request_type.clone(), message.payload);
            return Ok(());
        }

        let response: RequestResponse = message.into_payload()?;
        ctx.send_message(self.response_type.clone(), response.response_data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::Effect;
    use crate::types::{RequestId, RequestInfoMessage};
    use serde_json::json;

    #[tokio::test]
    async fn test_request_then_forward_response() {
        let mut executor = RequestInfoExecutor::factory("approval", "approved").create("ask");

        let mut ctx = WorkflowContext::new("ask", 1);
        executor
            .handle(Message::new("approval", json!({"amount": 10}), None, "ask"), &mut ctx)
            .await
            .unwrap();
        let effects = ctx.into_effects();
        let request = match &effects[..] {
            [Effect::Request(request)] => request.clone(),
            other => panic!("Expected one request effect, got {:?}", other),
        };
        assert_eq!(request.request_type.as_str(), "approval");
        assert_eq!(request.data, json!({"amount": 10}));

        let response = RequestResponse {
            original_request: RequestInfoMessage {
                request_id: RequestId::from("r1"),
                ..request
            },
            response_data: json!("yes"),
        };
        let mut ctx = WorkflowContext::new("ask", 2);
        executor
            .handle(
                Message::new(
                    PayloadType::response_to(&PayloadType::from("approval")),
                    serde_json::to_value(&response).unwrap(),
                    None,
                    "ask",
                ),
                &mut ctx,
            )
            .await
            .unwrap();

        assert_eq!(
            ctx.into_effects(),
            vec![Effect::Send {
                payload_type: PayloadType::from("approved"),
                payload: json!("yes"),
            }]
        );
    }
}
