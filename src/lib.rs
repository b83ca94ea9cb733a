// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // executor backends
pub mod config;     // config, builder + registry
pub mod engine;     // superstep run engine + correlation
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // executor + agent abstractions
pub mod types;      // payloads, requests, events
