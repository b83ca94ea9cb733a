// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Which `Status` events a run emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusReporting {
    /// Only the `IDLE_WITH_PENDING_REQUESTS` status that closes a paused call.
    #[default]
    PendingOnly,
    /// Also `IN_PROGRESS` at the start of every call, the best-effort
    /// `IN_PROGRESS_PENDING_REQUESTS`, and the final `IDLE`/`COMPLETED`.
    Full,
}

/// Per-run engine options.
///
/// # Example
/// ```yaml
/// run_options:
///   status_reporting: full
///   max_supersteps: 1000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    #[serde(default)]
    pub status_reporting: StatusReporting,
    /// Upper bound on supersteps executed by a single `start`/`resume` call.
    /// `None` means unbounded.
    #[serde(default)]
    pub max_supersteps: Option<u64>,
}
