// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use serde_json::Value;

use crate::errors::ExecutionError;
use crate::types::{PayloadType, RequestId, RequestInfoMessage};

/// Something a handler asked the engine to do, in the order it asked.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    Send {
        payload_type: PayloadType,
        payload: Value,
    },
    Output(Value),
    Request(RequestInfoMessage),
}

/// Handle passed to every handler invocation.
///
/// A handler never touches the queue, the graph or the correlator directly.
/// It records effects here and the engine applies them once the handler
/// returns, which keeps every run single-writer.
#[derive(Debug)]
pub struct WorkflowContext {
    executor_id: String,
    superstep: u64,
    effects: Vec<Effect>,
}

impl WorkflowContext {
    pub(crate) fn new(executor_id: impl Into<String>, superstep: u64) -> Self {
        Self {
            executor_id: executor_id.into(),
            superstep,
            effects: Vec::new(),
        }
    }

    pub fn executor_id(&self) -> &str {
        &self.executor_id
    }

    pub fn superstep(&self) -> u64 {
        self.superstep
    }

    /// Send a message along every outgoing edge that accepts `payload_type`.
    pub fn send_message(&mut self, payload_type: impl Into<PayloadType>, payload: Value) {
        self.effects.push(Effect::Send {
            payload_type: payload_type.into(),
            payload,
        });
    }

    /// Serialize `value` and send it as `payload_type`.
    pub fn send<T: Serialize>(
        &mut self,
        payload_type: impl Into<PayloadType>,
        value: &T,
    ) -> Result<(), ExecutionError> {
        let payload_type = payload_type.into();
        let payload = serde_json::to_value(value).map_err(|source| {
            ExecutionError::InvalidPayload {
                payload_type: payload_type.clone(),
                source,
            }
        })?;
        self.send_message(payload_type, payload);
        Ok(())
    }

    /// Yield terminal data for the run. It never re-enters the graph.
    pub fn yield_output(&mut self, data: Value) {
        self.effects.push(Effect::Output(data));
    }

    /// Ask the caller for information and pause this logical thread.
    ///
    /// The response arrives later on this same executor as a message of type
    /// `PayloadType::response_to(&request_type)`.
    pub fn request_info(&mut self, request_type: impl Into<PayloadType>, data: Value) -> RequestId {
        let request_id = RequestId::generate();
        self.effects.push(Effect::Request(RequestInfoMessage {
            request_id: request_id.clone(),
            source_executor_id: self.executor_id.clone(),
            request_type: request_type.into(),
            data,
        }));
        request_id
    }

    pub(crate) fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_effects_keep_call_order() {
        let mut ctx = WorkflowContext::new("judge", 3);
        ctx.send_message("guess", json!(50));
        let request_id = ctx.request_info("feedback", json!({"prompt": "guess?"}));
        ctx.yield_output(json!("done"));

        let effects = ctx.into_effects();
        assert_eq!(effects.len(), 3);
        assert!(matches!(&effects[0], Effect::Send { payload_type, .. } if payload_type.as_str() == "guess"));
        match &effects[1] {
            Effect::Request(request) => {
                assert_eq!(request.request_id, request_id);
                assert_eq!(request.source_executor_id, "judge");
            }
            other => panic!("Expected request effect, got {:?}", other),
        }
        assert_eq!(effects[2], Effect::Output(json!("done")));
    }

    #[test]
    fn test_send_serializes_value() {
        #[derive(Serialize)]
        struct Guess {
            value: u32,
        }

        let mut ctx = WorkflowContext::new("guesser", 1);
        ctx.send("guess", &Guess { value: 7 }).unwrap();

        assert_eq!(
            ctx.into_effects(),
            vec![Effect::Send {
                payload_type: PayloadType::from("guess"),
                payload: json!({"value": 7}),
            }]
        );
    }
}
