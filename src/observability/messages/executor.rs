// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for handler and agent invocation events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A message is being delivered to a handler.
///
/// # Log Level
/// `debug!` - Detailed execution flow
///
/// # Example
/// ```
/// use the_handoff::observability::messages::executor::HandlerInvoked;
///
/// let msg = HandlerInvoked {
///     executor_id: "turns",
///     implementation: "turn_manager",
///     payload_type: "start_game",
///     superstep: 1,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct HandlerInvoked<'a> {
    pub executor_id: &'a str,
    pub implementation: &'a str,
    pub payload_type: &'a str,
    pub superstep: u64,
}

impl Display for HandlerInvoked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Delivering '{}' to executor '{}' ({}) in superstep {}",
            self.payload_type, self.executor_id, self.implementation, self.superstep
        )
    }
}

impl StructuredLog for HandlerInvoked<'_> {
    fn log(&self) {
        tracing::debug!(
            executor_id = self.executor_id,
            implementation = self.implementation,
            payload_type = self.payload_type,
            superstep = self.superstep,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "handler",
            span_name = name,
            executor_id = self.executor_id,
            payload_type = self.payload_type,
        )
    }
}

/// A handler returned an error.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct HandlerFailed<'a> {
    pub executor_id: &'a str,
    pub payload_type: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for HandlerFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Executor '{}' failed handling '{}': {}",
            self.executor_id, self.payload_type, self.error
        )
    }
}

impl StructuredLog for HandlerFailed<'_> {
    fn log(&self) {
        tracing::error!(
            executor_id = self.executor_id,
            payload_type = self.payload_type,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "handler_failed",
            span_name = name,
            executor_id = self.executor_id,
            error = %self.error,
        )
    }
}

/// An executor that is not a workflow output yielded data.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct OutputDiscarded<'a> {
    pub executor_id: &'a str,
}

impl Display for OutputDiscarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discarding output from '{}': not an output executor",
            self.executor_id
        )
    }
}

impl StructuredLog for OutputDiscarded<'_> {
    fn log(&self) {
        tracing::warn!(executor_id = self.executor_id, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("output_discarded", span_name = name, executor_id = self.executor_id)
    }
}

/// An executor's state could not be serialized for a checkpoint.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct StateSnapshotFailed<'a> {
    pub executor_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for StateSnapshotFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Could not snapshot state of '{}': {}",
            self.executor_id, self.error
        )
    }
}

impl StructuredLog for StateSnapshotFailed<'_> {
    fn log(&self) {
        tracing::warn!(executor_id = self.executor_id, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("state_snapshot_failed", span_name = name, executor_id = self.executor_id)
    }
}

/// An agent executor is calling its model client.
///
/// # Log Level
/// `debug!` - Detailed execution flow
pub struct AgentInvocationStarted<'a> {
    pub executor_id: &'a str,
    pub client: &'a str,
    pub message_count: usize,
}

impl Display for AgentInvocationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent '{}' invoking client '{}' with {} messages",
            self.executor_id, self.client, self.message_count
        )
    }
}

impl StructuredLog for AgentInvocationStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            executor_id = self.executor_id,
            client = self.client,
            message_count = self.message_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "agent_invocation",
            span_name = name,
            executor_id = self.executor_id,
            client = self.client,
        )
    }
}

/// An agent client call returned.
///
/// # Log Level
/// `debug!` - Detailed execution flow
pub struct AgentInvocationCompleted<'a> {
    pub executor_id: &'a str,
    pub client: &'a str,
    pub duration: Duration,
}

impl Display for AgentInvocationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Agent '{}' client '{}' responded in {:?}",
            self.executor_id, self.client, self.duration
        )
    }
}

impl StructuredLog for AgentInvocationCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            executor_id = self.executor_id,
            client = self.client,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "agent_completed",
            span_name = name,
            executor_id = self.executor_id,
            duration = ?self.duration,
        )
    }
}
