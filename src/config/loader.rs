// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::validation::{validate_workflow_graph, GraphShape};
use crate::engine::RunOptions;
use crate::errors::{ConfigError, RegistryError};

/// Main configuration structure for a workflow.
///
/// This struct describes a complete workflow: its executors, the typed edges
/// between them, where input enters and which executors produce outputs.
/// It is typically loaded from a YAML or TOML file.
///
/// # Fields
/// * `start` - ID of the executor that receives the initial input
/// * `input_type` - Payload type of the initial input (defaults to `start`)
/// * `outputs` - Executors whose yields become workflow outputs (empty means all)
/// * `run_options` - Status reporting and superstep limit for runs (optional)
/// * `executors` - Executor definitions (the graph nodes)
/// * `edges` - Typed connections between executors
///
/// # Example
/// ```yaml
/// start: turns
/// input_type: start_game
/// outputs: [turns]
/// run_options:
///   status_reporting: pending_only
/// executors:
///   - id: turns
///     type: local
///     impl: turn_manager
///   - id: guesser
///     type: agent
///     impl: bisecting_guesser
/// edges:
///   - { from: turns, to: guesser, message_type: agent_request }
///   - { from: guesser, to: turns, message_type: agent_response }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    pub start: Option<String>,
    #[serde(default = "default_input_type")]
    pub input_type: String,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub run_options: RunOptions,
    pub executors: Vec<ExecutorConfig>,
    #[serde(default)]
    pub edges: Vec<EdgeConfig>,
}

fn default_input_type() -> String {
    "start".to_string()
}

impl WorkflowConfig {
    /// Borrowed graph description for validation.
    pub fn shape(&self) -> GraphShape<'_> {
        GraphShape {
            executor_ids: self.executors.iter().map(|e| e.id.as_str()).collect(),
            edges: self
                .edges
                .iter()
                .map(|e| (e.from.as_str(), e.to.as_str()))
                .collect(),
            start_executor: self.start.as_deref(),
            output_executors: self.outputs.iter().map(String::as_str).collect(),
        }
    }
}

/// Kind of executor a config entry describes.
///
/// # Variants
/// * `Local` - In-process executor selected by `impl` (turn_manager, passthrough, echo_output)
/// * `Agent` - Wraps the agent client named by `impl`
/// * `RequestInfo` - Relay node that pauses for caller input
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    Local,
    Agent,
    RequestInfo,
}

impl fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutorKind::Local => "local",
            ExecutorKind::Agent => "agent",
            ExecutorKind::RequestInfo => "request_info",
        };
        f.write_str(name)
    }
}

/// Configuration for a single executor.
///
/// # Example
/// ```yaml
/// id: relay
/// type: local
/// impl: passthrough
/// options:
///   input_type: text
///   output_type: shouted
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ExecutorKind,
    #[serde(rename = "impl")]
    pub impl_: Option<String>,
    #[serde(default)]
    pub options: HashMap<String, Value>, // executor-specific options
}

impl ExecutorConfig {
    /// A string option, `None` if absent.
    pub fn string_option(&self, name: &str) -> Result<Option<&str>, RegistryError> {
        match self.options.get(name) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.as_str())),
            Some(other) => Err(self.invalid_option(name, format!("expected a string, got {}", other))),
        }
    }

    pub fn required_string_option(&self, name: &str) -> Result<&str, RegistryError> {
        self.string_option(name)?
            .ok_or_else(|| self.invalid_option(name, "option is required".to_string()))
    }

    /// An unsigned integer option that fits in a `u32`, `None` if absent.
    pub fn u32_option(&self, name: &str) -> Result<Option<u32>, RegistryError> {
        match self.options.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    self.invalid_option(name, format!("expected an unsigned integer, got {}", value))
                }),
        }
    }

    fn invalid_option(&self, name: &str, reason: String) -> RegistryError {
        RegistryError::InvalidOption {
            executor_id: self.id.clone(),
            option: name.to_string(),
            reason,
        }
    }
}

/// A typed edge between two executors.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EdgeConfig {
    pub from: String,
    pub to: String,
    pub message_type: String,
}

/// Load a config from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<WorkflowConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => parse_yaml(&content),
        Some("toml") => parse_toml(&content),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

pub fn parse_yaml(content: &str) -> Result<WorkflowConfig, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn parse_toml(content: &str) -> Result<WorkflowConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load and validate a config file
///
/// This function loads the configuration and validates the workflow graph to
/// ensure IDs are unique and every reference resolves. Unreachable outputs are
/// logged as warnings and do not fail the load.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<WorkflowConfig, ConfigError> {
    let cfg = load_config(path)?;
    validate_workflow_graph(&cfg.shape()).map_err(ConfigError::Validation)?;
    Ok(cfg)
}
