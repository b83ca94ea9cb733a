// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::backends::agent::BisectingGuesser;
use crate::config::{ExecutorMap, Workflow, WorkflowBuilder, WorkflowConfig};
use crate::errors::ConfigError;
use crate::traits::AgentClient;

/// Named agent clients that `type: agent` executors can refer to by `impl`.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, Arc<dyn AgentClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the deterministic clients shipped in this crate.
    pub fn with_builtin_clients() -> Self {
        let mut registry = Self::new();
        registry.register("bisecting_guesser", Arc::new(BisectingGuesser));
        registry
    }

    /// Register `client` under `name`, replacing any previous client of that name.
    pub fn register(&mut self, name: impl Into<String>, client: Arc<dyn AgentClient>) {
        self.clients.insert(name.into(), client);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentClient>> {
        self.clients.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clients.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("clients", &self.names())
            .finish()
    }
}

/// Resolves every executor in `cfg` with the built-in clients and builds the workflow
pub fn build_workflow_from_config(cfg: &WorkflowConfig) -> Result<Workflow, ConfigError> {
    build_workflow_from_config_with_clients(cfg, &ClientRegistry::with_builtin_clients())
}

/// Resolves every executor in `cfg` against `clients` and builds the workflow
///
/// Executors are added in config order so duplicate IDs reach the builder's
/// validator instead of silently replacing each other.
pub fn build_workflow_from_config_with_clients(
    cfg: &WorkflowConfig,
    clients: &ClientRegistry,
) -> Result<Workflow, ConfigError> {
    let mut builder = WorkflowBuilder::new();

    for e in &cfg.executors {
        builder = builder.add_executor(e.id.clone(), ExecutorMap::factory_for(e, clients)?);
    }

    for edge in &cfg.edges {
        builder = builder.add_edge(edge.from.clone(), edge.to.clone(), edge.message_type.as_str());
    }

    if let Some(start) = &cfg.start {
        builder = builder.set_start_executor(start.clone());
    }

    for output in &cfg.outputs {
        builder = builder.add_output(output.clone());
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_yaml;
    use crate::errors::{BuildError, RegistryError, ValidationError};

    #[test]
    fn test_builtin_clients() {
        let registry = ClientRegistry::with_builtin_clients();
        assert_eq!(registry.names(), vec!["bisecting_guesser"]);
        assert_eq!(registry.get("bisecting_guesser").unwrap().name(), "bisecting_guesser");
        assert!(registry.get("gpt").is_none());
        assert!(ClientRegistry::new().names().is_empty());
    }

    #[test]
    fn test_build_guessing_game_from_config() {
        let cfg = parse_yaml(
            r#"
start: turns
input_type: start_game
outputs: [turns]
executors:
  - { id: turns, type: local, impl: turn_manager }
  - { id: guesser, type: agent, impl: bisecting_guesser }
edges:
  - { from: turns, to: guesser, message_type: agent_request }
  - { from: guesser, to: turns, message_type: agent_response }
"#,
        )
        .unwrap();

        let workflow = build_workflow_from_config(&cfg).unwrap();
        assert_eq!(workflow.start_executor(), "turns");
        assert_eq!(workflow.executors().len(), 2);
        assert_eq!(workflow.graph().edge_count(), 2);
        assert!(workflow.is_output("turns"));
        assert!(!workflow.is_output("guesser"));
    }

    #[test]
    fn test_duplicate_ids_fail_the_build() {
        let cfg = parse_yaml(
            r#"
start: a
executors:
  - { id: a, type: local, impl: echo_output, options: { input_type: text } }
  - { id: a, type: local, impl: echo_output, options: { input_type: text } }
"#,
        )
        .unwrap();

        match build_workflow_from_config(&cfg) {
            Err(ConfigError::Build(BuildError::InvalidGraph(errors))) => assert_eq!(
                errors,
                vec![ValidationError::DuplicateExecutorId {
                    executor_id: "a".to_string()
                }]
            ),
            other => panic!("Expected duplicate id error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_unknown_client_is_registry_error() {
        let cfg = parse_yaml(
            r#"
start: guesser
executors:
  - { id: guesser, type: agent, impl: oracle }
"#,
        )
        .unwrap();

        let err = build_workflow_from_config(&cfg).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Registry(RegistryError::UnknownImplementation { .. })
        ));
    }
}
