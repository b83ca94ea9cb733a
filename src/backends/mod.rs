// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Executor backend implementations for The Handoff workflow engine.
//!
//! This module provides the executors a workflow graph is built from. Each
//! backend implements the `Executor` trait and can be instantiated through
//! configuration-driven factories.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process Rust executors:
//! - **FunctionExecutor**: private state plus an explicit payload-type handler table
//! - **PassthroughExecutor / YieldOutputExecutor**: relay and sink nodes
//! - **RequestInfoExecutor**: pauses its path until the caller answers
//! - **TurnManager**: the number guessing game coordinator
//!
//! ## Agent Backend
//! Executors that call an external [`AgentClient`](crate::traits::AgentClient):
//! - **AgentExecutor**: awaits the client and sends its reply along the graph
//! - **BisectingGuesser**: deterministic built-in client for the guessing game
//!
//! ## Stub Backend (Test-Only)
//! Testing utilities for engine development (only available in test builds):
//! - **StubExecutor**: yields a fixed output
//! - **FailingExecutor**: simulates handler failures
//! - **AskOnceExecutor**: issues one request and yields the answer
//! - **Note**: NOT available in production builds
//!
//! # Architecture
//!
//! All backends follow a consistent factory pattern:
//! ```text
//! Configuration → Backend Factory → ExecutorFactory → Executor instance per run
//! ```
//!
//! # Examples
//!
//! ## Using Local Backend
//! ```rust
//! use the_handoff::backends::local::LocalExecutorFactory;
//! use the_handoff::config::{ExecutorConfig, ExecutorKind};
//! use std::collections::HashMap;
//!
//! let config = ExecutorConfig {
//!     id: "turns".to_string(),
//!     kind: ExecutorKind::Local,
//!     impl_: Some("turn_manager".to_string()),
//!     options: HashMap::new(),
//! };
//!
//! let factory = LocalExecutorFactory::create_executor(&config)?;
//! assert_eq!(factory.create("turns").name(), "turn_manager");
//! # Ok::<(), the_handoff::errors::RegistryError>(())
//! ```

pub mod agent;
pub mod local;
#[cfg(test)]
pub mod stub;
