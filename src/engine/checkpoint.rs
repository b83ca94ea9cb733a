// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::engine::correlator::Correlator;
use crate::errors::ExecutionError;
use crate::types::{Message, WorkflowRunState};

/// Serializable snapshot of a [`WorkflowRun`](crate::engine::WorkflowRun).
///
/// Captures the pending-request table, queued messages and the state of every
/// executor that exposes one. A checkpoint is only meaningful against the
/// workflow it was taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCheckpoint {
    pub run_id: String,
    pub state: WorkflowRunState,
    pub started: bool,
    pub superstep: u64,
    pub correlator: Correlator,
    pub queue: Vec<Message>,
    #[serde(default)]
    pub executor_states: BTreeMap<String, Value>,
}

impl RunCheckpoint {
    pub fn to_json_string(&self) -> Result<String, ExecutionError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExecutionError::Checkpoint(format!("failed to serialize checkpoint: {}", e)))
    }

    pub fn from_json_str(json: &str) -> Result<Self, ExecutionError> {
        serde_json::from_str(json)
            .map_err(|e| ExecutionError::Checkpoint(format!("failed to parse checkpoint: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PayloadType, RequestId, RequestInfoMessage};
    use serde_json::json;

    #[test]
    fn test_json_keeps_pending_requests() {
        let mut correlator = Correlator::new();
        correlator
            .register(
                RequestInfoMessage {
                    request_id: RequestId::from("r1"),
                    source_executor_id: "turns".to_string(),
                    request_type: PayloadType::from("guess_feedback"),
                    data: json!({"guess": 50}),
                },
                2,
            )
            .unwrap();

        let checkpoint = RunCheckpoint {
            run_id: "run-1".to_string(),
            state: WorkflowRunState::IdleWithPendingRequests,
            started: true,
            superstep: 2,
            correlator,
            queue: vec![],
            executor_states: BTreeMap::from([("turns".to_string(), json!({"lower": 1}))]),
        };

        let json = checkpoint.to_json_string().unwrap();
        assert!(json.contains("IDLE_WITH_PENDING_REQUESTS"));

        let parsed = RunCheckpoint::from_json_str(&json).unwrap();
        assert_eq!(parsed, checkpoint);
        assert!(parsed.correlator.is_pending(&RequestId::from("r1")));
    }

    #[test]
    fn test_garbage_is_a_checkpoint_error() {
        let err = RunCheckpoint::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ExecutionError::Checkpoint(_)));
    }
}
