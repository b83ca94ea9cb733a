// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::types::{PayloadType, RequestId};

/// Lifecycle state of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowRunState {
    /// No work queued, nothing pending, and no output since the last input.
    Idle,
    InProgress,
    /// Work remains but some paths are blocked on external data.
    InProgressPendingRequests,
    /// No further internal progress possible; waiting purely on responses.
    IdleWithPendingRequests,
    Completed,
    /// Aborted by a fatal error.
    Failed,
}

impl fmt::Display for WorkflowRunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowRunState::Idle => "IDLE",
            WorkflowRunState::InProgress => "IN_PROGRESS",
            WorkflowRunState::InProgressPendingRequests => "IN_PROGRESS_PENDING_REQUESTS",
            WorkflowRunState::IdleWithPendingRequests => "IDLE_WITH_PENDING_REQUESTS",
            WorkflowRunState::Completed => "COMPLETED",
            WorkflowRunState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Event surfaced to the caller of `start`/`resume`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkflowEvent {
    RequestInfo {
        request_id: RequestId,
        source_executor_id: String,
        request_type: PayloadType,
        data: Value,
    },
    Output {
        source_executor_id: String,
        data: Value,
    },
    Status {
        state: WorkflowRunState,
    },
}

impl WorkflowEvent {
    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            WorkflowEvent::RequestInfo { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    pub fn output(&self) -> Option<&Value> {
        match self {
            WorkflowEvent::Output { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn state(&self) -> Option<WorkflowRunState> {
        match self {
            WorkflowEvent::Status { state } => Some(*state),
            _ => None,
        }
    }
}

/// The events produced by one `start` or `resume` call.
///
/// A finite, single-pass sequence: it is consumed by iteration and cannot be
/// restarted.
#[derive(Debug)]
pub struct WorkflowEvents {
    inner: std::vec::IntoIter<WorkflowEvent>,
}

impl WorkflowEvents {
    pub(crate) fn new(events: Vec<WorkflowEvent>) -> Self {
        Self {
            inner: events.into_iter(),
        }
    }

    /// Number of events not yet consumed.
    pub fn remaining(&self) -> usize {
        self.inner.len()
    }
}

impl Iterator for WorkflowEvents {
    type Item = WorkflowEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for WorkflowEvents {}
