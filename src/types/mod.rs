// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message and event model shared by executors, the run engine and callers.

mod event;
mod payload;
mod request;

pub use event::{WorkflowEvent, WorkflowEvents, WorkflowRunState};
pub use payload::{Message, PayloadType};
pub use request::{PendingRequest, RequestId, RequestInfoMessage, RequestResponse};
