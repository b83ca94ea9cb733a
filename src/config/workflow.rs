// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};

use crate::config::validation::{validate_workflow_graph, GraphShape};
use crate::config::{Edge, ExecutorMap, WorkflowGraph};
use crate::errors::{BuildError, ValidationError};
use crate::observability::messages::validation::WorkflowBuilt;
use crate::observability::messages::StructuredLog;
use crate::traits::{Executor, ExecutorFactory};
use crate::types::PayloadType;

/// Immutable workflow definition.
///
/// Holds executor factories, the typed edge list, the start executor and the
/// output executors. It carries no run state, so one `Workflow` (usually in an
/// `Arc`) can back any number of concurrent runs.
#[derive(Debug, Clone)]
pub struct Workflow {
    executors: ExecutorMap,
    graph: WorkflowGraph,
    start_executor: String,
    outputs: HashSet<String>,
    warnings: Vec<ValidationError>,
}

impl Workflow {
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    pub fn start_executor(&self) -> &str {
        &self.start_executor
    }

    /// Whether yields from `executor_id` become workflow outputs.
    ///
    /// With no outputs designated every executor counts as an output.
    pub fn is_output(&self, executor_id: &str) -> bool {
        self.outputs.is_empty() || self.outputs.contains(executor_id)
    }

    /// Whether `executor_id` was explicitly designated as an output.
    ///
    /// Only designated outputs turn an unroutable send into an output event.
    pub fn is_designated_output(&self, executor_id: &str) -> bool {
        self.outputs.contains(executor_id)
    }

    pub fn executors(&self) -> &ExecutorMap {
        &self.executors
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// Warning-level findings from `build()`, such as unreachable outputs.
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// One fresh executor instance per id, for a new run.
    pub(crate) fn instantiate_executors(&self) -> HashMap<String, Box<dyn Executor>> {
        self.executors
            .iter()
            .map(|(id, factory)| (id.clone(), factory.create(id)))
            .collect()
    }
}

/// Accumulates executors and edges, then validates them into a [`Workflow`].
///
/// # Examples
///
/// ```rust
/// use the_handoff::backends::local::{PassthroughExecutor, YieldOutputExecutor};
/// use the_handoff::config::WorkflowBuilder;
///
/// let workflow = WorkflowBuilder::new()
///     .add_executor("relay", PassthroughExecutor::factory("text", "text"))
///     .add_executor("sink", YieldOutputExecutor::factory("text"))
///     .add_edge("relay", "sink", "text")
///     .set_start_executor("relay")
///     .add_output("sink")
///     .build()
///     .unwrap();
///
/// assert_eq!(workflow.start_executor(), "relay");
/// assert!(workflow.is_output("sink"));
/// assert!(!workflow.is_output("relay"));
/// ```
#[derive(Debug, Default)]
pub struct WorkflowBuilder {
    executors: Vec<(String, ExecutorFactory)>,
    edges: Vec<Edge>,
    start_executor: Option<String>,
    outputs: Vec<String>,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_executor(mut self, id: impl Into<String>, factory: ExecutorFactory) -> Self {
        self.executors.push((id.into(), factory));
        self
    }

    pub fn add_edge(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        payload_type: impl Into<PayloadType>,
    ) -> Self {
        self.edges.push(Edge::new(source, target, payload_type));
        self
    }

    pub fn set_start_executor(mut self, id: impl Into<String>) -> Self {
        self.start_executor = Some(id.into());
        self
    }

    pub fn add_output(mut self, id: impl Into<String>) -> Self {
        self.outputs.push(id.into());
        self
    }

    /// Validate referential integrity and produce the immutable workflow.
    pub fn build(self) -> Result<Workflow, BuildError> {
        let shape = GraphShape {
            executor_ids: self.executors.iter().map(|(id, _)| id.as_str()).collect(),
            edges: self
                .edges
                .iter()
                .map(|e| (e.source.as_str(), e.target.as_str()))
                .collect(),
            start_executor: self.start_executor.as_deref(),
            output_executors: self.outputs.iter().map(String::as_str).collect(),
        };

        let warnings = validate_workflow_graph(&shape).map_err(BuildError::InvalidGraph)?;

        // Validation above guarantees a start executor is present.
        let start_executor = self.start_executor.unwrap_or_default();
        let executors: ExecutorMap = self.executors.into_iter().collect::<HashMap<_, _>>().into();
        let graph = WorkflowGraph::from(self.edges);

        WorkflowBuilt {
            start_executor: &start_executor,
            executor_count: executors.len(),
            edge_count: graph.edge_count(),
            warning_count: warnings.len(),
        }
        .log();

        Ok(Workflow {
            executors,
            graph,
            start_executor,
            outputs: self.outputs.into_iter().collect(),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::local::{PassthroughExecutor, YieldOutputExecutor};

    #[test]
    fn test_build_rejects_unknown_edge_endpoint() {
        let result = WorkflowBuilder::new()
            .add_executor("a", PassthroughExecutor::factory("x", "x"))
            .add_edge("a", "ghost", "x")
            .set_start_executor("a")
            .build();

        match result {
            Err(BuildError::InvalidGraph(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].to_string().contains("ghost"));
            }
            Ok(_) => panic!("Expected InvalidGraph"),
        }
    }

    #[test]
    fn test_build_requires_start_executor() {
        let result = WorkflowBuilder::new()
            .add_executor("a", YieldOutputExecutor::factory("x"))
            .build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::InvalidGraph(vec![ValidationError::MissingStartExecutor])
        );
    }

    #[test]
    fn test_unreachable_output_builds_with_warning() {
        let workflow = WorkflowBuilder::new()
            .add_executor("start", PassthroughExecutor::factory("x", "x"))
            .add_executor("sink", YieldOutputExecutor::factory("x"))
            .add_executor("orphan", YieldOutputExecutor::factory("x"))
            .add_edge("start", "sink", "x")
            .set_start_executor("start")
            .add_output("sink")
            .add_output("orphan")
            .build()
            .unwrap();

        assert_eq!(workflow.warnings().len(), 1);
        assert!(workflow.warnings()[0].is_warning());
    }

    #[test]
    fn test_no_outputs_means_every_executor_outputs() {
        let workflow = WorkflowBuilder::new()
            .add_executor("only", YieldOutputExecutor::factory("x"))
            .set_start_executor("only")
            .build()
            .unwrap();

        assert!(workflow.is_output("only"));
        assert!(workflow.is_output("anything"));
    }

    #[test]
    fn test_instances_are_fresh_per_call() {
        let workflow = WorkflowBuilder::new()
            .add_executor("a", PassthroughExecutor::factory("x", "y"))
            .add_executor("b", YieldOutputExecutor::factory("y"))
            .add_edge("a", "b", "y")
            .set_start_executor("a")
            .build()
            .unwrap();

        let first = workflow.instantiate_executors();
        let second = workflow.instantiate_executors();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(first["a"].id(), "a");
        assert_eq!(first["b"].input_types(), vec![PayloadType::from("y")]);
    }
}
