// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for workflow graph validation warnings and errors.
//!
//! This module contains message types for logging events related to:
//! * Structural errors found while validating a graph
//! * Output executors unreachable from the start executor
//! * Successful workflow construction

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A structural validation error.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_handoff::errors::ValidationError;
/// use the_handoff::observability::messages::validation::ValidationFailed;
///
/// let error = ValidationError::MissingStartExecutor;
/// let msg = ValidationFailed { error: &error };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ValidationFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for ValidationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Workflow validation failed: {}", self.error)
    }
}

impl StructuredLog for ValidationFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            error = %self.error,
        )
    }
}

/// An output executor can never receive a message.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct UnreachableOutputDetected<'a> {
    pub executor_id: &'a str,
    pub start_executor: &'a str,
}

impl Display for UnreachableOutputDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Output executor '{}' is not reachable from start executor '{}'",
            self.executor_id, self.start_executor
        )
    }
}

impl StructuredLog for UnreachableOutputDetected<'_> {
    fn log(&self) {
        tracing::warn!(
            executor_id = self.executor_id,
            start_executor = self.start_executor,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "span_name",
            name = name,
            executor_id = self.executor_id,
            start_executor = self.start_executor,
        )
    }
}

/// A workflow passed validation.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_handoff::observability::messages::validation::WorkflowBuilt;
///
/// let msg = WorkflowBuilt {
///     start_executor: "turns",
///     executor_count: 2,
///     edge_count: 2,
///     warning_count: 0,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct WorkflowBuilt<'a> {
    pub start_executor: &'a str,
    pub executor_count: usize,
    pub edge_count: usize,
    pub warning_count: usize,
}

impl Display for WorkflowBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow built: {} executors, {} edges, start '{}', {} warnings",
            self.executor_count, self.edge_count, self.start_executor, self.warning_count
        )
    }
}

impl StructuredLog for WorkflowBuilt<'_> {
    fn log(&self) {
        tracing::info!(
            start_executor = self.start_executor,
            executor_count = self.executor_count,
            edge_count = self.edge_count,
            warning_count = self.warning_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            start_executor = self.start_executor,
            executor_count = self.executor_count,
        )
    }
}
