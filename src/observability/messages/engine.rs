// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for workflow run lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Run start, resume and restore
//! * Superstep progress
//! * Quiescence (paused, idle, completed)
//! * Fatal run failures

use crate::observability::messages::StructuredLog;
use crate::types::WorkflowRunState;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A run received its initial input.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_handoff::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     run_id: "4f7c",
///     start_executor: "turns",
///     executor_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub run_id: &'a str,
    pub start_executor: &'a str,
    pub executor_count: usize,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting workflow run {} at '{}' with {} executors",
            self.run_id, self.start_executor, self.executor_count
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            run_id = self.run_id,
            start_executor = self.start_executor,
            executor_count = self.executor_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            run_id = self.run_id,
            start_executor = self.start_executor,
        )
    }
}

/// Responses were applied to a paused run.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunResumed<'a> {
    pub run_id: &'a str,
    pub accepted: usize,
    pub rejected: usize,
}

impl Display for RunResumed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resuming workflow run {}: {} responses accepted, {} rejected",
            self.run_id, self.accepted, self.rejected
        )
    }
}

impl StructuredLog for RunResumed<'_> {
    fn log(&self) {
        tracing::info!(
            run_id = self.run_id,
            accepted = self.accepted,
            rejected = self.rejected,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "resume",
            span_name = name,
            run_id = self.run_id,
            accepted = self.accepted,
        )
    }
}

/// A run was rebuilt from a checkpoint.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunRestored<'a> {
    pub run_id: &'a str,
    pub pending_count: usize,
    pub queued: usize,
}

impl Display for RunRestored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Restored workflow run {} with {} pending requests and {} queued messages",
            self.run_id, self.pending_count, self.queued
        )
    }
}

impl StructuredLog for RunRestored<'_> {
    fn log(&self) {
        tracing::info!(
            run_id = self.run_id,
            pending_count = self.pending_count,
            queued = self.queued,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("restore", span_name = name, run_id = self.run_id)
    }
}

/// One superstep finished delivering its batch.
///
/// # Log Level
/// `debug!` - Detailed execution flow
///
/// # Example
/// ```
/// use the_handoff::observability::messages::engine::SuperstepCompleted;
///
/// let msg = SuperstepCompleted {
///     run_id: "4f7c",
///     superstep: 3,
///     delivered: 2,
///     queued: 1,
///     pending: 0,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct SuperstepCompleted<'a> {
    pub run_id: &'a str,
    pub superstep: u64,
    pub delivered: usize,
    pub queued: usize,
    pub pending: usize,
}

impl Display for SuperstepCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Superstep {} of run {} delivered {} messages ({} queued, {} pending requests)",
            self.superstep, self.run_id, self.delivered, self.queued, self.pending
        )
    }
}

impl StructuredLog for SuperstepCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            run_id = self.run_id,
            superstep = self.superstep,
            delivered = self.delivered,
            queued = self.queued,
            pending = self.pending,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "superstep",
            span_name = name,
            run_id = self.run_id,
            superstep = self.superstep,
        )
    }
}

/// A call ended with requests still outstanding.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunPaused<'a> {
    pub run_id: &'a str,
    pub pending_count: usize,
    pub duration: Duration,
}

impl Display for RunPaused<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow run {} paused after {:?} waiting on {} requests",
            self.run_id, self.duration, self.pending_count
        )
    }
}

impl StructuredLog for RunPaused<'_> {
    fn log(&self) {
        tracing::info!(
            run_id = self.run_id,
            pending_count = self.pending_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_paused",
            span_name = name,
            run_id = self.run_id,
            pending_count = self.pending_count,
        )
    }
}

/// A call ended with nothing queued and nothing pending.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunFinished<'a> {
    pub run_id: &'a str,
    pub state: WorkflowRunState,
    pub output_count: usize,
    pub duration: Duration,
}

impl Display for RunFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow run {} reached {} with {} outputs in {:?}",
            self.run_id, self.state, self.output_count, self.duration
        )
    }
}

impl StructuredLog for RunFinished<'_> {
    fn log(&self) {
        tracing::info!(
            run_id = self.run_id,
            state = %self.state,
            output_count = self.output_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_finished",
            span_name = name,
            run_id = self.run_id,
            state = %self.state,
            duration = ?self.duration,
        )
    }
}

/// A fatal error moved a run to `FAILED`.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_handoff::observability::messages::engine::RunFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "no edge");
/// let msg = RunFailed {
///     run_id: "4f7c",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct RunFailed<'a> {
    pub run_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Workflow run {} failed: {}", self.run_id, self.error)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(
            run_id = self.run_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "run_failed",
            span_name = name,
            run_id = self.run_id,
            error = %self.error,
        )
    }
}
