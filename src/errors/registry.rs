// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for executor registration and executor instantiation from config.

use thiserror::Error;

use crate::config::ExecutorKind;
use crate::types::PayloadType;

/// Errors that can occur while turning executor configs into factories
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// No implementation name was given for a kind that needs one
    #[error("Executor '{executor_id}' of kind '{kind}' is missing the 'impl' field")]
    MissingImplementation {
        executor_id: String,
        kind: ExecutorKind,
    },

    /// The implementation name is not known to the backend
    #[error("Unknown {kind} implementation '{impl_name}' for executor '{executor_id}'")]
    UnknownImplementation {
        executor_id: String,
        kind: ExecutorKind,
        impl_name: String,
    },

    /// A required option is absent or has the wrong shape
    #[error("Executor '{executor_id}' option '{option}' is invalid: {reason}")]
    InvalidOption {
        executor_id: String,
        option: String,
        reason: String,
    },

    /// Two handlers were registered for the same message type on one executor
    #[error("A handler for message type '{payload_type}' is already registered")]
    DuplicateHandler { payload_type: PayloadType },
}
