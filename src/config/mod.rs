// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod executor_map;
mod loader;
mod registry;
mod runtime;
mod validation;
mod workflow;
mod workflow_graph;

pub mod consts;

pub use executor_map::ExecutorMap;
pub use loader::{
    load_and_validate_config, load_config, parse_toml, parse_yaml, EdgeConfig, ExecutorConfig,
    ExecutorKind, WorkflowConfig,
};
pub use registry::{
    build_workflow_from_config, build_workflow_from_config_with_clients, ClientRegistry,
};
pub use runtime::RuntimeBuilder;
pub use validation::{validate_workflow_graph, GraphShape};
pub use workflow::{Workflow, WorkflowBuilder};
pub use workflow_graph::{Edge, WorkflowGraph};
