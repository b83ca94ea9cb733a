// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod checkpoint;
pub mod context;
pub mod correlator;
pub mod options;
pub mod run;

pub use checkpoint::RunCheckpoint;
pub use context::WorkflowContext;
pub use correlator::Correlator;
pub use options::{RunOptions, StatusReporting};
pub use run::{ResumeOutcome, WorkflowRun};
