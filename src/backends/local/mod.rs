// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod executors;
pub mod factory;

pub use executors::*;
pub use factory::{LocalExecutorFactory, RequestInfoExecutorFactory};
