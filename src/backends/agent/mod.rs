// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod bisecting_guesser;
pub mod executor;
pub mod factory;

pub use bisecting_guesser::BisectingGuesser;
pub use executor::AgentExecutor;
pub use factory::AgentExecutorFactory;
