// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout The Handoff. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Keep log wording out of the engine code
//! * Attach the same structured fields to every occurrence of an event
//! * Give each event a matching span for callers that want one
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - Run lifecycle and superstep events
//! * `messages::executor` - Handler and agent invocation events
//! * `messages::correlation` - Request registration and resolution
//! * `messages::validation` - Workflow graph validation warnings and errors
//!
//! # Usage
//!
//! ```rust
//! use the_handoff::observability::messages::executor::HandlerFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = HandlerFailed {
//!     executor_id: "turns",
//!     payload_type: "agent_response",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
