// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::config::consts::{AGENT_REQUEST, AGENT_RESPONSE};
use crate::engine::WorkflowContext;
use crate::errors::ExecutionError;
use crate::observability::messages::executor::{AgentInvocationCompleted, AgentInvocationStarted};
use crate::observability::messages::StructuredLog;
use crate::traits::agent::AgentRequest;
use crate::traits::{AgentClient, Executor, ExecutorFactory};
use crate::types::{Message, PayloadType};

/// Executor that forwards each request to an [`AgentClient`] and sends the reply.
///
/// The client call is awaited inside the handler, so a slow agent holds up
/// the rest of the run. Errors are not retried.
pub struct AgentExecutor {
    id: String,
    client: Arc<dyn AgentClient>,
    request_type: PayloadType,
    response_type: PayloadType,
}

impl AgentExecutor {
    pub fn new(id: impl Into<String>, client: Arc<dyn AgentClient>) -> Self {
        Self::with_types(id, client, AGENT_REQUEST, AGENT_RESPONSE)
    }

    pub fn with_types(
        id: impl Into<String>,
        client: Arc<dyn AgentClient>,
        request_type: impl Into<PayloadType>,
        response_type: impl Into<PayloadType>,
    ) -> Self {
        Self {
            id: id.into(),
            client,
            request_type: request_type.into(),
            response_type: response_type.into(),
        }
    }

    pub fn factory(
        client: Arc<dyn AgentClient>,
        request_type: impl Into<PayloadType>,
        response_type: impl Into<PayloadType>,
    ) -> ExecutorFactory {
        let request_type = request_type.into();
        let response_type = response_type.into();
        ExecutorFactory::new("agent", move |id| {
            Box::new(Self::with_types(
                id,
                Arc::clone(&client),
                request_type.clone(),
                response_type.clone(),
            ))
        })
    }
}

#[async_trait]
impl Executor for AgentExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &'static str {
        "agent"
    }

    fn input_types(&self) -> Vec<PayloadType> {
        vec![self.request_type.clone()]
    }

    async fn handle(
        &mut self,
        message: Message,
        ctx: &mut WorkflowContext,
    ) -> Result<(), ExecutionError> {
        let request: AgentRequest = message.into_payload()?;

        let start_msg = AgentInvocationStarted {
            executor_id: &self.id,
            client: self.client.name(),
            message_count: request.messages.len(),
        };
        start_msg.log();
        let start_time = Instant::now();

        let response = self.client.invoke(request).await.map_err(|source| {
            ExecutionError::AgentInvocationFailed {
                executor_id: self.id.clone(),
                client: self.client.name().to_string(),
                source,
            }
        })?;

        AgentInvocationCompleted {
            executor_id: &self.id,
            client: self.client.name(),
            duration: start_time.elapsed(),
        }
        .log();

        ctx.send(self.response_type.clone(), &response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::Effect;
    use crate::traits::agent::{AgentError, AgentResponse, ChatMessage};
    use serde_json::json;

    struct ScriptedClient {
        reply: Result<AgentResponse, AgentError>,
    }

    #[async_trait]
    impl AgentClient for ScriptedClient {
        async fn invoke(&self, _request: AgentRequest) -> Result<AgentResponse, AgentError> {
            self.reply.clone()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn request_message() -> Message {
        let request = AgentRequest {
            messages: vec![ChatMessage::user("hi")],
            ..Default::default()
        };
        Message::new(AGENT_REQUEST, serde_json::to_value(request).unwrap(), None, "agent")
    }

    #[tokio::test]
    async fn test_reply_is_sent_as_response_type() {
        let client = Arc::new(ScriptedClient {
            reply: Ok(AgentResponse {
                text: "hello".to_string(),
                structured: None,
            }),
        });
        let mut executor = AgentExecutor::new("agent", client);
        let mut ctx = WorkflowContext::new("agent", 1);

        executor.handle(request_message(), &mut ctx).await.unwrap();

        assert_eq!(
            ctx.into_effects(),
            vec![Effect::Send {
                payload_type: PayloadType::from(AGENT_RESPONSE),
                payload: json!({"text": "hello", "structured": null}),
            }]
        );
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let client = Arc::new(ScriptedClient {
            reply: Err(AgentError::Backend("rate limited".to_string())),
        });
        let mut executor = AgentExecutor::new("agent", client);
        let mut ctx = WorkflowContext::new("agent", 1);

        let err = executor.handle(request_message(), &mut ctx).await.unwrap_err();
        match err {
            ExecutionError::AgentInvocationFailed {
                executor_id,
                client,
                source,
            } => {
                assert_eq!(executor_id, "agent");
                assert_eq!(client, "scripted");
                assert_eq!(source, AgentError::Backend("rate limited".to_string()));
            }
            other => panic!("Expected AgentInvocationFailed, got {}", other),
        }
        assert!(ctx.into_effects().is_empty());
    }
}
