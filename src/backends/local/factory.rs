// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND};
use crate::config::{ExecutorConfig, ExecutorKind};
use crate::errors::RegistryError;
use crate::traits::ExecutorFactory;

use super::executors::*;

/// Factory for creating local (in-process) executor factories
pub struct LocalExecutorFactory;

impl LocalExecutorFactory {
    /// Create an executor factory from configuration
    ///
    /// The `impl` field in the config determines which executor to create:
    /// - "turn_manager" -> TurnManager (options: `lower`, `upper`)
    /// - "passthrough" -> PassthroughExecutor (options: `input_type`, optional `output_type`)
    /// - "echo_output" -> YieldOutputExecutor (options: `input_type`)
    pub fn create_executor(config: &ExecutorConfig) -> Result<ExecutorFactory, RegistryError> {
        let impl_name = config
            .impl_
            .as_deref()
            .ok_or_else(|| RegistryError::MissingImplementation {
                executor_id: config.id.clone(),
                kind: ExecutorKind::Local,
            })?;

        match impl_name {
            "turn_manager" => {
                let lower = config.u32_option("lower")?.unwrap_or(DEFAULT_LOWER_BOUND);
                let upper = config.u32_option("upper")?.unwrap_or(DEFAULT_UPPER_BOUND);
                if lower > upper {
                    return Err(RegistryError::InvalidOption {
                        executor_id: config.id.clone(),
                        option: "lower".to_string(),
                        reason: format!("lower bound {} exceeds upper bound {}", lower, upper),
                    });
                }
                Ok(TurnManager::factory_with_bounds(lower, upper))
            }

            "passthrough" => {
                let input_type = config.required_string_option("input_type")?;
                let output_type = config.string_option("output_type")?.unwrap_or(input_type);
                Ok(PassthroughExecutor::factory(input_type, output_type))
            }

            "echo_output" => {
                let input_type = config.required_string_option("input_type")?;
                Ok(YieldOutputExecutor::factory(input_type))
            }

            _ => Err(RegistryError::UnknownImplementation {
                executor_id: config.id.clone(),
                kind: ExecutorKind::Local,
                impl_name: impl_name.to_string(),
            }),
        }
    }

    /// List all available local executor implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec!["turn_manager", "passthrough", "echo_output"]
    }

    /// Check if an implementation is available
    pub fn is_implementation_available(impl_name: &str) -> bool {
        Self::list_available_implementations().contains(&impl_name)
    }
}

/// Factory for `type: request_info` relay executors
pub struct RequestInfoExecutorFactory;

impl RequestInfoExecutorFactory {
    /// Requires the `request_type` option; `response_type` defaults to `<request_type>_response`.
    pub fn create_executor(config: &ExecutorConfig) -> Result<ExecutorFactory, RegistryError> {
        let request_type = config.required_string_option("request_type")?;
        let response_type = match config.string_option("response_type")? {
            Some(response_type) => response_type.to_string(),
            None => format!("{}_response", request_type),
        };
        Ok(RequestInfoExecutor::factory(request_type, response_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::consts::START_GAME;
    use crate::types::PayloadType;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn create_test_config(id: &str, impl_name: Option<&str>, options: Vec<(&str, Value)>) -> ExecutorConfig {
        ExecutorConfig {
            id: id.to_string(),
            kind: ExecutorKind::Local,
            impl_: impl_name.map(str::to_string),
            options: options
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_create_local_executors() {
        let test_cases = vec![
            ("turn_manager", vec![], PayloadType::from(START_GAME)),
            ("passthrough", vec![("input_type", json!("text"))], PayloadType::from("text")),
            ("echo_output", vec![("input_type", json!("done"))], PayloadType::from("done")),
        ];

        for (impl_name, options, expected_first_input) in test_cases {
            let config = create_test_config("test", Some(impl_name), options);
            let factory = LocalExecutorFactory::create_executor(&config)
                .unwrap_or_else(|e| panic!("Failed to create executor {}: {}", impl_name, e));

            let executor = factory.create("test");
            assert_eq!(executor.name(), impl_name);
            assert_eq!(executor.input_types()[0], expected_first_input, "{}", impl_name);
        }
    }

    #[test]
    fn test_create_executor_missing_impl() {
        let config = create_test_config("test", None, vec![]);
        let err = LocalExecutorFactory::create_executor(&config).unwrap_err();
        assert!(err.to_string().contains("missing the 'impl' field"));
    }

    #[test]
    fn test_create_executor_unknown_impl() {
        let config = create_test_config("test", Some("unknown_executor"), vec![]);
        let err = LocalExecutorFactory::create_executor(&config).unwrap_err();
        assert!(err.to_string().contains("Unknown local implementation"));
    }

    #[test]
    fn test_passthrough_requires_input_type() {
        let config = create_test_config("relay", Some("passthrough"), vec![]);
        let err = LocalExecutorFactory::create_executor(&config).unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidOption {
                executor_id: "relay".to_string(),
                option: "input_type".to_string(),
                reason: "option is required".to_string(),
            }
        );
    }

    #[test]
    fn test_turn_manager_rejects_inverted_bounds() {
        let config = create_test_config(
            "turns",
            Some("turn_manager"),
            vec![("lower", json!(10)), ("upper", json!(5))],
        );
        assert!(matches!(
            LocalExecutorFactory::create_executor(&config),
            Err(RegistryError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_request_info_default_response_type() {
        let config = create_test_config("ask", None, vec![("request_type", json!("approval"))]);
        let executor = RequestInfoExecutorFactory::create_executor(&config)
            .unwrap()
            .create("ask");

        assert_eq!(
            executor.input_types(),
            vec![
                PayloadType::from("approval"),
                PayloadType::from("response:approval")
            ]
        );
    }

    #[test]
    fn test_list_available_implementations() {
        let implementations = LocalExecutorFactory::list_available_implementations();
        assert!(implementations.contains(&"turn_manager"));
        assert!(LocalExecutorFactory::is_implementation_available("echo_output"));
        assert!(!LocalExecutorFactory::is_implementation_available("reverse_text"));
    }
}
