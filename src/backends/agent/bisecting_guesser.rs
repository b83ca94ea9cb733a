// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::traits::agent::{AgentError, AgentRequest, AgentResponse};
use crate::traits::AgentClient;

/// Deterministic stand-in for a model that plays the guessing game.
///
/// Reads `lower` and `upper` from the request context and answers with the
/// midpoint, rounding down.
#[derive(Debug, Clone, Copy, Default)]
pub struct BisectingGuesser;

impl BisectingGuesser {
    pub fn guess(lower: u64, upper: u64) -> u64 {
        lower + (upper - lower) / 2
    }
}

fn bound(context: &Value, name: &str) -> Result<u64, AgentError> {
    context
        .get(name)
        .and_then(Value::as_u64)
        .ok_or_else(|| AgentError::InvalidRequest(format!("context is missing numeric '{}'", name)))
}

#[async_trait]
impl AgentClient for BisectingGuesser {
    async fn invoke(&self, request: AgentRequest) -> Result<AgentResponse, AgentError> {
        let lower = bound(&request.context, "lower")?;
        let upper = bound(&request.context, "upper")?;
        if lower > upper {
            return Err(AgentError::InvalidRequest(format!(
                "empty range {}..={}",
                lower, upper
            )));
        }

        let guess = Self::guess(lower, upper);
        Ok(AgentResponse {
            text: guess.to_string(),
            structured: Some(json!({ "guess": guess })),
        })
    }

    fn name(&self) -> &str {
        "bisecting_guesser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bisects_context_bounds() {
        let test_cases = vec![(1, 100, 50), (51, 100, 75), (76, 100, 88), (7, 7, 7)];

        for (lower, upper, expected) in test_cases {
            let request = AgentRequest {
                context: json!({ "lower": lower, "upper": upper }),
                ..Default::default()
            };
            let response = BisectingGuesser.invoke(request).await.unwrap();
            assert_eq!(response.text, expected.to_string());
            assert_eq!(response.structured, Some(json!({ "guess": expected })));
        }
    }

    #[tokio::test]
    async fn test_missing_bounds_is_invalid_request() {
        let err = BisectingGuesser.invoke(AgentRequest::default()).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidRequest(_)));
    }
}
