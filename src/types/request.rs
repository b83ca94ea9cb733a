// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::errors::ExecutionError;
use crate::types::PayloadType;

/// Identifier of one request for external information.
///
/// Fresh ids are random v4 UUIDs; the correlator additionally refuses any id
/// it has seen before in the same run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A request for information from outside the workflow.
///
/// Emitted by a handler through `WorkflowContext::request_info`. The engine
/// never routes it along edges; it registers it with the correlator and
/// surfaces it to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestInfoMessage {
    pub request_id: RequestId,
    pub source_executor_id: String,
    pub request_type: PayloadType,
    pub data: Value,
}

/// A request paired with the data the caller answered it with.
///
/// Delivered to the executor that issued the request, as a message of type
/// `PayloadType::response_to(&request_type)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestResponse {
    pub original_request: RequestInfoMessage,
    pub response_data: Value,
}

impl RequestResponse {
    /// Deserialize the caller's answer.
    pub fn response_as<T: DeserializeOwned>(&self) -> Result<T, ExecutionError> {
        serde_json::from_value(self.response_data.clone()).map_err(|source| {
            ExecutionError::InvalidPayload {
                payload_type: PayloadType::response_to(&self.original_request.request_type),
                source,
            }
        })
    }

    /// The answer as text, if the caller sent a JSON string.
    pub fn response_text(&self) -> Option<&str> {
        self.response_data.as_str()
    }
}

/// Correlator-owned record of a request still waiting for its response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub request_id: RequestId,
    pub issuing_executor_id: String,
    pub request_type: PayloadType,
    pub payload: Value,
    pub issued_at_superstep: u64,
}

impl PendingRequest {
    pub fn to_request_message(&self) -> RequestInfoMessage {
        RequestInfoMessage {
            request_id: self.request_id.clone(),
            source_executor_id: self.issuing_executor_id.clone(),
            request_type: self.request_type.clone(),
            data: self.payload.clone(),
        }
    }
}
