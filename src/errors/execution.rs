// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while a workflow run is executing or being resumed.
//!
//! Two families live here:
//! * [`ExecutionError`] - fatal to the run. The run is marked failed and the
//!   error is returned to the caller of `start`/`resume`.
//! * [`CorrelationError`] - reported per response entry during `resume`. The
//!   remaining entries of the batch are still applied.

use thiserror::Error;

use crate::traits::agent::AgentError;
use crate::types::{PayloadType, RequestId};

#[derive(Error, Debug)]
pub enum ExecutionError {
    /// An executor received a message type it has no handler for.
    #[error("Executor '{executor_id}' has no handler for message type '{payload_type}'")]
    UnhandledMessageType {
        executor_id: String,
        payload_type: PayloadType,
    },

    /// A sent message type has no outgoing edge and the sender is not an output executor.
    #[error("Executor '{executor_id}' sent '{payload_type}' but no outgoing edge accepts it")]
    NoMatchingEdge {
        executor_id: String,
        payload_type: PayloadType,
    },

    /// A request id was registered twice. Indicates an id generation bug.
    #[error("Request id '{request_id}' was already issued in this run")]
    DuplicateRequestId { request_id: RequestId },

    /// A message was addressed to an executor the workflow doesn't contain.
    #[error("Unknown executor '{executor_id}'")]
    UnknownExecutor { executor_id: String },

    /// A handler rejected its input.
    #[error("Executor '{executor_id}' failed: {message}")]
    HandlerFailed { executor_id: String, message: String },

    /// The external agent collaborator returned an error.
    #[error("Agent '{client}' invoked by executor '{executor_id}' failed: {source}")]
    AgentInvocationFailed {
        executor_id: String,
        client: String,
        #[source]
        source: AgentError,
    },

    /// A payload couldn't be converted to or from the type a handler expects.
    #[error("Invalid '{payload_type}' payload: {source}")]
    InvalidPayload {
        payload_type: PayloadType,
        #[source]
        source: serde_json::Error,
    },

    #[error("Run '{run_id}' has already been started")]
    AlreadyStarted { run_id: String },

    #[error("Run '{run_id}' has not been started")]
    NotStarted { run_id: String },

    /// The run was aborted by an earlier fatal error.
    #[error("Run '{run_id}' has failed and can no longer make progress")]
    RunFailed { run_id: String },

    #[error("Run '{run_id}' was cancelled")]
    Cancelled { run_id: String },

    #[error("Run '{run_id}' exceeded the limit of {limit} supersteps per call")]
    SuperstepLimitExceeded { run_id: String, limit: u64 },

    #[error("Checkpoint error: {0}")]
    Checkpoint(String),
}

/// Per-entry failure when matching a response to an outstanding request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    #[error("No pending request with id '{request_id}'")]
    UnknownRequestId { request_id: RequestId },
}

impl CorrelationError {
    pub fn request_id(&self) -> &RequestId {
        match self {
            CorrelationError::UnknownRequestId { request_id } => request_id,
        }
    }
}
