// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Request/response correlation for one workflow run.
//!
//! The correlator owns the pending-request table. Every request id it ever
//! accepted is remembered for the lifetime of the run, so an id can be
//! neither registered twice nor answered twice.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::errors::{CorrelationError, ExecutionError};
use crate::observability::messages::correlation::{RequestRegistered, RequestResolved};
use crate::observability::messages::StructuredLog;
use crate::types::{PendingRequest, RequestId, RequestInfoMessage, RequestResponse};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Correlator {
    pending: HashMap<RequestId, PendingRequest>,
    /// Pending ids in issue order.
    order: Vec<RequestId>,
    issued: HashSet<RequestId>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly emitted request.
    pub fn register(
        &mut self,
        request: RequestInfoMessage,
        superstep: u64,
    ) -> Result<(), ExecutionError> {
        if !self.issued.insert(request.request_id.clone()) {
            return Err(ExecutionError::DuplicateRequestId {
                request_id: request.request_id,
            });
        }

        RequestRegistered {
            request_id: request.request_id.as_str(),
            executor_id: &request.source_executor_id,
            request_type: request.request_type.as_str(),
            superstep,
        }
        .log();

        self.order.push(request.request_id.clone());
        self.pending.insert(
            request.request_id.clone(),
            PendingRequest {
                request_id: request.request_id,
                issuing_executor_id: request.source_executor_id,
                request_type: request.request_type,
                payload: request.data,
                issued_at_superstep: superstep,
            },
        );
        Ok(())
    }

    /// Remove the pending request and pair it with the caller's response.
    pub fn resolve(
        &mut self,
        request_id: &RequestId,
        response_data: Value,
    ) -> Result<RequestResponse, CorrelationError> {
        let pending = self.pending.remove(request_id).ok_or_else(|| {
            CorrelationError::UnknownRequestId {
                request_id: request_id.clone(),
            }
        })?;
        self.order.retain(|id| id != request_id);

        RequestResolved {
            request_id: request_id.as_str(),
            executor_id: &pending.issuing_executor_id,
        }
        .log();

        Ok(RequestResponse {
            original_request: pending.to_request_message(),
            response_data,
        })
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self, request_id: &RequestId) -> bool {
        self.pending.contains_key(request_id)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, request_id: &RequestId) -> Option<&PendingRequest> {
        self.pending.get(request_id)
    }

    /// Pending requests in the order they were issued.
    pub fn pending(&self) -> impl Iterator<Item = &PendingRequest> {
        self.order.iter().filter_map(|id| self.pending.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PayloadType;
    use serde_json::json;

    fn request(id: &str, executor: &str) -> RequestInfoMessage {
        RequestInfoMessage {
            request_id: RequestId::from(id),
            source_executor_id: executor.to_string(),
            request_type: PayloadType::from("feedback"),
            data: json!({"prompt": "guess?"}),
        }
    }

    #[test]
    fn test_resolve_round_trip_exactly_once() {
        let mut correlator = Correlator::new();
        correlator.register(request("r1", "judge"), 1).unwrap();
        assert_eq!(correlator.pending_count(), 1);

        let response = correlator.resolve(&RequestId::from("r1"), json!("7")).unwrap();
        assert_eq!(response.original_request, request("r1", "judge"));
        assert_eq!(response.response_data, json!("7"));
        assert_eq!(correlator.pending_count(), 0);

        let second = correlator.resolve(&RequestId::from("r1"), json!("8"));
        assert_eq!(
            second,
            Err(CorrelationError::UnknownRequestId {
                request_id: RequestId::from("r1")
            })
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut correlator = Correlator::new();
        correlator.register(request("r1", "a"), 1).unwrap();

        let err = correlator.register(request("r1", "b"), 2).unwrap_err();
        assert!(matches!(err, ExecutionError::DuplicateRequestId { .. }));
        assert_eq!(correlator.get(&RequestId::from("r1")).unwrap().issuing_executor_id, "a");
    }

    #[test]
    fn test_resolved_id_cannot_be_reissued() {
        let mut correlator = Correlator::new();
        correlator.register(request("r1", "a"), 1).unwrap();
        correlator.resolve(&RequestId::from("r1"), json!(null)).unwrap();

        assert!(correlator.register(request("r1", "a"), 2).is_err());
    }

    #[test]
    fn test_unknown_id_leaves_other_requests_alone() {
        let mut correlator = Correlator::new();
        correlator.register(request("r1", "a"), 1).unwrap();
        correlator.register(request("r2", "b"), 1).unwrap();

        assert!(correlator.resolve(&RequestId::from("nope"), json!(1)).is_err());
        assert_eq!(correlator.pending_count(), 2);
        assert!(correlator.is_pending(&RequestId::from("r1")));
        assert!(correlator.is_pending(&RequestId::from("r2")));
    }

    #[test]
    fn test_pending_preserves_issue_order() {
        let mut correlator = Correlator::new();
        for (i, id) in ["r3", "r1", "r2"].iter().enumerate() {
            correlator.register(request(id, "a"), i as u64).unwrap();
        }
        correlator.resolve(&RequestId::from("r1"), json!(null)).unwrap();

        let ids: Vec<&str> = correlator.pending().map(|p| p.request_id.as_str()).collect();
        assert_eq!(ids, vec!["r3", "r2"]);
        assert_eq!(
            correlator.get(&RequestId::from("r2")).unwrap().issued_at_superstep,
            2
        );
    }
}
