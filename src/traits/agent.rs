// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Role of a chat message sent to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }
}

/// What an agent-invoking executor hands to its client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentRequest {
    pub messages: Vec<ChatMessage>,
    /// Name of the structured reply shape the caller expects, if any.
    #[serde(default)]
    pub response_format: Option<String>,
    /// Free-form structured context for the client.
    #[serde(default)]
    pub context: Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentResponse {
    pub text: String,
    #[serde(default)]
    pub structured: Option<Value>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("invalid agent request: {0}")]
    InvalidRequest(String),

    #[error("agent backend error: {0}")]
    Backend(String),
}

/// The external chat/agent collaborator.
///
/// The engine treats `invoke` as an opaque, possibly slow call. Retry and
/// backoff belong to the implementation, not to the engine.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn invoke(&self, request: AgentRequest) -> Result<AgentResponse, AgentError>;

    fn name(&self) -> &str;
}
