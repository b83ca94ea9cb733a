// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod function;
pub mod passthrough;
pub mod request_info;
pub mod turn_manager;
pub mod yield_output;

pub use function::*;
pub use passthrough::*;
pub use request_info::*;
pub use turn_manager::*;
pub use yield_output::*;
