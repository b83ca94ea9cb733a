// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::sync::Arc;

use crate::config::{
    build_workflow_from_config_with_clients, load_config, ClientRegistry, Workflow, WorkflowConfig,
};
use crate::engine::{RunOptions, WorkflowRun};
use crate::errors::ConfigError;

/// Workflow runtime builder - turns configuration into a shareable workflow plus run options.
///
/// The `RuntimeBuilder` provides a clean interface for going from a config file
/// to something runs can be created from. It coordinates executor resolution,
/// graph validation and run options, so a host only has to create runs.
///
/// # Examples
///
/// ```
/// use the_handoff::config::{parse_yaml, RuntimeBuilder};
///
/// let config = parse_yaml(r#"
/// start: echo
/// executors:
///   - { id: echo, type: local, impl: echo_output, options: { input_type: start } }
/// "#).unwrap();
///
/// let runtime = RuntimeBuilder::from_config(&config).unwrap();
/// let run = runtime.new_run();
/// assert_eq!(run.workflow().start_executor(), "echo");
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    workflow: Arc<Workflow>,
    run_options: RunOptions,
    input_type: String,
}

impl RuntimeBuilder {
    /// Build a runtime from configuration using the built-in agent clients.
    pub fn from_config(cfg: &WorkflowConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_clients(cfg, &ClientRegistry::with_builtin_clients())
    }

    pub fn from_config_with_clients(
        cfg: &WorkflowConfig,
        clients: &ClientRegistry,
    ) -> Result<Self, ConfigError> {
        let workflow = build_workflow_from_config_with_clients(cfg, clients)?;
        Ok(Self {
            workflow: Arc::new(workflow),
            run_options: cfg.run_options.clone(),
            input_type: cfg.input_type.clone(),
        })
    }

    /// Load a YAML or TOML file and build a runtime from it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_config(&load_config(path)?)
    }

    pub fn workflow(&self) -> &Arc<Workflow> {
        &self.workflow
    }

    pub fn run_options(&self) -> &RunOptions {
        &self.run_options
    }

    /// Payload type the start executor expects for the initial input.
    pub fn input_type(&self) -> &str {
        &self.input_type
    }

    /// A fresh run of the configured workflow with the configured options.
    pub fn new_run(&self) -> WorkflowRun {
        WorkflowRun::with_options(Arc::clone(&self.workflow), self.run_options.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_toml;
    use crate::engine::StatusReporting;

    #[test]
    fn test_runtime_carries_run_options() {
        let cfg = parse_toml(
            r#"
start = "echo"
input_type = "text"

[run_options]
status_reporting = "full"

[[executors]]
id = "echo"
type = "local"
impl = "echo_output"
options = { input_type = "text" }
"#,
        )
        .unwrap();

        let runtime = RuntimeBuilder::from_config(&cfg).unwrap();
        assert_eq!(runtime.input_type(), "text");
        assert_eq!(runtime.run_options().status_reporting, StatusReporting::Full);

        let first = runtime.new_run();
        let second = runtime.new_run();
        assert_ne!(first.run_id(), second.run_id());
        assert!(Arc::ptr_eq(first.workflow(), second.workflow()));
    }
}
