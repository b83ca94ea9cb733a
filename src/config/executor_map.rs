// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::backends::agent::AgentExecutorFactory;
use crate::backends::local::{LocalExecutorFactory, RequestInfoExecutorFactory};
use crate::config::{ClientRegistry, ExecutorConfig, ExecutorKind};
use crate::errors::RegistryError;
use crate::traits::ExecutorFactory;

/// A type-safe registry mapping executor IDs to the factories that create them.
///
/// The `ExecutorMap` is the static half of a workflow: it never holds executor
/// instances, only the recipe for one. Each `WorkflowRun` asks every factory for a
/// fresh instance, so executor state (counters, bounds, conversation history) is
/// scoped to exactly one run and the map itself can be shared freely.
///
/// # Examples
///
/// ```ignore
/// use the_handoff::config::ExecutorMap;
/// use the_handoff::backends::local::PassthroughExecutor;
///
/// let mut executors = ExecutorMap::new();
/// executors.insert("relay".to_string(), PassthroughExecutor::factory("in", "out"));
///
/// assert!(executors.contains_key("relay"));
/// let instance = executors.get("relay").unwrap().create("relay");
/// assert_eq!(instance.id(), "relay");
/// ```
#[derive(Clone, Default)]
pub struct ExecutorMap(pub HashMap<String, ExecutorFactory>);

impl ExecutorMap {
    /// Create a new empty executor map
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Resolve one executor config to the factory its kind and `impl` name select
    pub fn factory_for(e: &ExecutorConfig, clients: &ClientRegistry) -> Result<ExecutorFactory, RegistryError> {
        match e.kind {
            ExecutorKind::Local => LocalExecutorFactory::create_executor(e),
            ExecutorKind::Agent => AgentExecutorFactory::create_executor(e, clients),
            ExecutorKind::RequestInfo => RequestInfoExecutorFactory::create_executor(e),
        }
    }

    /// Insert a factory into the map
    pub fn insert(&mut self, id: String, factory: ExecutorFactory) {
        self.0.insert(id, factory);
    }

    /// Get a factory by executor ID
    pub fn get(&self, id: &str) -> Option<&ExecutorFactory> {
        self.0.get(id)
    }

    /// Check if an executor exists
    pub fn contains_key(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Get all executor IDs
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ExecutorFactory)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for ExecutorMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorMap")
            .field("executor_count", &self.0.len())
            .field("executor_ids", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl From<HashMap<String, ExecutorFactory>> for ExecutorMap {
    fn from(map: HashMap<String, ExecutorFactory>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn executor_config(id: &str, kind: ExecutorKind, impl_name: Option<&str>) -> ExecutorConfig {
        ExecutorConfig {
            id: id.to_string(),
            kind,
            impl_: impl_name.map(str::to_string),
            options: HashMap::new(),
        }
    }

    #[test]
    fn test_factory_for_table_driven() {
        struct TestCase {
            name: &'static str,
            config: ExecutorConfig,
            expected_kind: &'static str,
        }

        let mut relay = executor_config("ask", ExecutorKind::RequestInfo, None);
        relay.options.insert("request_type".to_string(), json!("approval"));

        let mut echo = executor_config("sink", ExecutorKind::Local, Some("echo_output"));
        echo.options.insert("input_type".to_string(), json!("text"));

        let test_cases = vec![
            TestCase {
                name: "turn manager",
                config: executor_config("turns", ExecutorKind::Local, Some("turn_manager")),
                expected_kind: "turn_manager",
            },
            TestCase {
                name: "agent",
                config: executor_config("guesser", ExecutorKind::Agent, Some("bisecting_guesser")),
                expected_kind: "agent",
            },
            TestCase {
                name: "request info relay",
                config: relay,
                expected_kind: "request_info",
            },
            TestCase {
                name: "echo output",
                config: echo,
                expected_kind: "echo_output",
            },
        ];

        let clients = ClientRegistry::with_builtin_clients();
        for test_case in test_cases {
            let factory = ExecutorMap::factory_for(&test_case.config, &clients)
                .unwrap_or_else(|e| panic!("Test case '{}' failed: {}", test_case.name, e));

            assert_eq!(factory.kind(), test_case.expected_kind, "Test case '{}'", test_case.name);
            let id = test_case.config.id.as_str();
            assert_eq!(factory.create(id).id(), id, "Test case '{}'", test_case.name);
        }
    }

    #[test]
    fn test_factory_for_unknown_local_impl() {
        let config = executor_config("x", ExecutorKind::Local, Some("does_not_exist"));
        let err = ExecutorMap::factory_for(&config, &ClientRegistry::new()).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownImplementation { .. }));
    }

    #[test]
    fn test_factory_for_unknown_client() {
        let config = executor_config("guesser", ExecutorKind::Agent, Some("bisecting_guesser"));
        let err = ExecutorMap::factory_for(&config, &ClientRegistry::new()).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownImplementation { .. }));
    }

    #[test]
    fn test_map_accessors() {
        let mut map = ExecutorMap::new();
        assert!(map.is_empty());

        map.insert(
            "relay".to_string(),
            crate::backends::local::PassthroughExecutor::factory("in", "out"),
        );
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("relay"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["relay"]);
    }
}
