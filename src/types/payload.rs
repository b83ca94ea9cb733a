// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::ExecutionError;

const RESPONSE_PREFIX: &str = "response:";

/// Tag naming the type of a message payload.
///
/// Handlers are registered per payload type and edges accept exactly one
/// payload type, so this tag drives both dispatch and routing.
///
/// # Examples
/// ```
/// use the_handoff::types::PayloadType;
///
/// let feedback = PayloadType::new("guess_feedback");
/// let response = PayloadType::response_to(&feedback);
///
/// assert_eq!(response.as_str(), "response:guess_feedback");
/// assert!(response.is_response());
/// assert!(!feedback.is_response());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadType(String);

impl PayloadType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The payload type under which responses to `request_type` are delivered.
    pub fn response_to(request_type: &PayloadType) -> Self {
        Self(format!("{}{}", RESPONSE_PREFIX, request_type.0))
    }

    pub fn is_response(&self) -> bool {
        self.0.starts_with(RESPONSE_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PayloadType {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for PayloadType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&PayloadType> for PayloadType {
    fn from(payload_type: &PayloadType) -> Self {
        payload_type.clone()
    }
}

/// Envelope for a payload travelling along one edge of the workflow.
///
/// Fan-out produces one envelope per target, so `target` is always a single
/// executor. `source` is `None` for messages injected by the caller (the
/// initial input and request responses).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub payload_type: PayloadType,
    pub payload: Value,
    pub source: Option<String>,
    pub target: String,
}

impl Message {
    pub fn new(
        payload_type: impl Into<PayloadType>,
        payload: Value,
        source: Option<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            payload_type: payload_type.into(),
            payload,
            source,
            target: target.into(),
        }
    }

    /// Deserialize the payload into the type a handler expects.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, ExecutionError> {
        serde_json::from_value(self.payload.clone()).map_err(|source| {
            ExecutionError::InvalidPayload {
                payload_type: self.payload_type.clone(),
                source,
            }
        })
    }

    /// Like [`Message::payload_as`] but consumes the message.
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<T, ExecutionError> {
        let payload_type = self.payload_type;
        serde_json::from_value(self.payload)
            .map_err(|source| ExecutionError::InvalidPayload { payload_type, source })
    }
}
