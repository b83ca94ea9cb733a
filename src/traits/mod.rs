// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod agent;
pub mod executor;

pub use agent::AgentClient;
pub use executor::{Executor, ExecutorFactory};
