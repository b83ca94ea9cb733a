// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod registry;

pub use config::{BuildError, ConfigError, ValidationError};
pub use execution::{CorrelationError, ExecutionError};
pub use registry::RegistryError;
