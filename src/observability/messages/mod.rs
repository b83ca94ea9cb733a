// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it through `tracing` at its documented level,
//! with its fields attached as structured key/value pairs.
//!
//! # Organization
//!
//! * `engine` - Run lifecycle and superstep events
//! * `executor` - Handler and agent invocation events
//! * `correlation` - Request registration and resolution
//! * `validation` - Workflow graph validation warnings and errors
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_handoff::observability::messages::engine::RunStarted;
//! use the_handoff::observability::messages::StructuredLog;
//!
//! let msg = RunStarted {
//!     run_id: "4f7c",
//!     start_executor: "turns",
//!     executor_count: 2,
//! };
//!
//! msg.log();
//! let _span = msg.span("start");
//! ```

use tracing::Span;

pub mod correlation;
pub mod engine;
pub mod executor;
pub mod validation;

/// Emit a message through `tracing` with its fields attached.
pub trait StructuredLog {
    /// Log the message at the level documented on the message type.
    fn log(&self);

    /// A span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
