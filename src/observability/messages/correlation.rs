// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for request/response correlation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A handler asked the caller for information.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_handoff::observability::messages::correlation::RequestRegistered;
///
/// let msg = RequestRegistered {
///     request_id: "9b1e",
///     executor_id: "turns",
///     request_type: "guess_feedback",
///     superstep: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RequestRegistered<'a> {
    pub request_id: &'a str,
    pub executor_id: &'a str,
    pub request_type: &'a str,
    pub superstep: u64,
}

impl Display for RequestRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Executor '{}' requested '{}' as {} in superstep {}",
            self.executor_id, self.request_type, self.request_id, self.superstep
        )
    }
}

impl StructuredLog for RequestRegistered<'_> {
    fn log(&self) {
        tracing::info!(
            request_id = self.request_id,
            executor_id = self.executor_id,
            request_type = self.request_type,
            superstep = self.superstep,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "request",
            span_name = name,
            request_id = self.request_id,
            executor_id = self.executor_id,
        )
    }
}

/// A pending request was answered.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RequestResolved<'a> {
    pub request_id: &'a str,
    pub executor_id: &'a str,
}

impl Display for RequestResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Request {} answered, routing response to '{}'",
            self.request_id, self.executor_id
        )
    }
}

impl StructuredLog for RequestResolved<'_> {
    fn log(&self) {
        tracing::info!(
            request_id = self.request_id,
            executor_id = self.executor_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("response", span_name = name, request_id = self.request_id)
    }
}

/// A response named a request id that is not pending.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
pub struct ResponseRejected<'a> {
    pub run_id: &'a str,
    pub request_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ResponseRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run {} ignored response for {}: {}",
            self.run_id, self.request_id, self.error
        )
    }
}

impl StructuredLog for ResponseRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            run_id = self.run_id,
            request_id = self.request_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "response_rejected",
            span_name = name,
            run_id = self.run_id,
            request_id = self.request_id,
        )
    }
}
