// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

use super::RegistryError;

/// Errors that can occur during workflow graph validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two executors were registered under the same ID
    #[error("Duplicate executor ID: '{executor_id}'")]
    DuplicateExecutorId {
        /// The duplicate executor ID
        executor_id: String,
    },
    /// An edge references an executor that doesn't exist
    #[error("Edge '{source_id}' -> '{target_id}' references unknown executor '{missing}'")]
    UnknownEdgeEndpoint {
        source_id: String,
        target_id: String,
        /// The endpoint that couldn't be resolved
        missing: String,
    },
    /// No start executor was designated
    #[error("No start executor designated")]
    MissingStartExecutor,
    /// The designated start executor doesn't exist
    #[error("Start executor '{executor_id}' does not exist")]
    UnknownStartExecutor { executor_id: String },
    /// An output executor doesn't exist
    #[error("Output executor '{executor_id}' does not exist")]
    UnknownOutputExecutor { executor_id: String },
    /// An output executor can never receive a message from the start executor.
    ///
    /// This is a warning: the workflow still builds.
    #[error("Output executor '{executor_id}' is not reachable from start executor '{start_executor}'")]
    UnreachableOutput {
        executor_id: String,
        start_executor: String,
    },
}

impl ValidationError {
    /// Warnings are reported but never fail a build.
    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationError::UnreachableOutput { .. })
    }
}

/// Errors returned by `WorkflowBuilder::build`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Invalid workflow graph:\n{}", join_errors(.0))]
    InvalidGraph(Vec<ValidationError>),
}

/// Errors raised while loading a workflow configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config format for '{}': expected .yaml, .yml or .toml", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
