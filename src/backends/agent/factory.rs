// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{AGENT_REQUEST, AGENT_RESPONSE};
use crate::config::{ClientRegistry, ExecutorConfig, ExecutorKind};
use crate::errors::RegistryError;
use crate::traits::ExecutorFactory;

use super::AgentExecutor;

/// Factory for `type: agent` executors
pub struct AgentExecutorFactory;

impl AgentExecutorFactory {
    /// Create an agent executor factory from configuration
    ///
    /// `impl` names the client in `clients`. The optional `request_type` and
    /// `response_type` options default to `agent_request` and `agent_response`.
    pub fn create_executor(
        config: &ExecutorConfig,
        clients: &ClientRegistry,
    ) -> Result<ExecutorFactory, RegistryError> {
        let client_name = config
            .impl_
            .as_deref()
            .ok_or_else(|| RegistryError::MissingImplementation {
                executor_id: config.id.clone(),
                kind: ExecutorKind::Agent,
            })?;

        let client = clients
            .get(client_name)
            .ok_or_else(|| RegistryError::UnknownImplementation {
                executor_id: config.id.clone(),
                kind: ExecutorKind::Agent,
                impl_name: client_name.to_string(),
            })?;

        let request_type = config.string_option("request_type")?.unwrap_or(AGENT_REQUEST);
        let response_type = config.string_option("response_type")?.unwrap_or(AGENT_RESPONSE);

        Ok(AgentExecutor::factory(client, request_type, response_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PayloadType;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_custom_message_types() {
        let config = ExecutorConfig {
            id: "guesser".to_string(),
            kind: ExecutorKind::Agent,
            impl_: Some("bisecting_guesser".to_string()),
            options: HashMap::from([("request_type".to_string(), json!("ask_model"))]),
        };

        let executor = AgentExecutorFactory::create_executor(&config, &ClientRegistry::with_builtin_clients())
            .unwrap()
            .create("guesser");
        assert_eq!(executor.input_types(), vec![PayloadType::from("ask_model")]);
    }

    #[test]
    fn test_missing_client_name() {
        let config = ExecutorConfig {
            id: "guesser".to_string(),
            kind: ExecutorKind::Agent,
            impl_: None,
            options: HashMap::new(),
        };

        let err = AgentExecutorFactory::create_executor(&config, &ClientRegistry::with_builtin_clients())
            .unwrap_err();
        assert!(matches!(err, RegistryError::MissingImplementation { .. }));
    }
}
