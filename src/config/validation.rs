// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation for workflow graphs.
//!
//! The same checks run for graphs assembled in code through `WorkflowBuilder`
//! and for graphs loaded from a config file. Both describe their graph as a
//! [`GraphShape`] and hand it to [`validate_workflow_graph`].
//!
//! # Validation Pipeline
//!
//! 1. **Uniqueness**: every executor ID is registered once
//! 2. **Edge references**: both endpoints of every edge exist
//! 3. **Start executor**: one is designated and it exists
//! 4. **Output executors**: every designated output exists
//! 5. **Reachability**: every output can be reached from the start executor
//!
//! Steps 1-4 produce errors and are accumulated so a caller sees every problem
//! at once. Step 5 needs a structurally valid graph, so it only runs when the
//! first four passed, and it only ever produces warnings.
//!
//! Cycles are not an error. A feedback loop such as guess -> judge -> guess is
//! a legitimate topology whose iterations are bounded by request-info pauses.
//!
//! # Examples
//!
//! ```rust
//! use the_handoff::config::{validate_workflow_graph, GraphShape};
//! use the_handoff::errors::ValidationError;
//!
//! let shape = GraphShape {
//!     executor_ids: vec!["turns", "guesser"],
//!     edges: vec![("turns", "guesser"), ("guesser", "turns"), ("turns", "judge")],
//!     start_executor: Some("turns"),
//!     output_executors: vec!["turns"],
//! };
//!
//! let errors = validate_workflow_graph(&shape).unwrap_err();
//! assert_eq!(errors.len(), 1);
//! assert!(matches!(errors[0], ValidationError::UnknownEdgeEndpoint { .. }));
//! ```

use std::collections::{HashMap, HashSet, VecDeque};

use crate::errors::ValidationError;
use crate::observability::messages::validation::{UnreachableOutputDetected, ValidationFailed};
use crate::observability::messages::StructuredLog;

/// Borrowed, format-neutral description of a workflow graph.
#[derive(Debug, Clone, Default)]
pub struct GraphShape<'a> {
    pub executor_ids: Vec<&'a str>,
    /// `(source, target)` pairs
    pub edges: Vec<(&'a str, &'a str)>,
    pub start_executor: Option<&'a str>,
    pub output_executors: Vec<&'a str>,
}

/// Validates a workflow graph for structural integrity.
///
/// # Returns
///
/// * `Ok(warnings)` - the graph is valid; `warnings` lists unreachable outputs
/// * `Err(errors)` - every structural error found
pub fn validate_workflow_graph(
    shape: &GraphShape<'_>,
) -> Result<Vec<ValidationError>, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(duplicate_errors) = validate_unique_executor_ids(shape) {
        errors.extend(duplicate_errors);
    }

    if let Err(edge_errors) = validate_edge_references(shape) {
        errors.extend(edge_errors);
    }

    if let Err(start_error) = validate_start_executor(shape) {
        errors.push(start_error);
    }

    if let Err(output_errors) = validate_output_executors(shape) {
        errors.extend(output_errors);
    }

    if !errors.is_empty() {
        for error in &errors {
            ValidationFailed { error }.log();
        }
        return Err(errors);
    }

    Ok(find_unreachable_outputs(shape))
}

fn validate_unique_executor_ids(shape: &GraphShape<'_>) -> Result<(), Vec<ValidationError>> {
    let mut seen_ids = HashSet::new();
    let mut errors = Vec::new();

    for id in &shape.executor_ids {
        if !seen_ids.insert(*id) {
            errors.push(ValidationError::DuplicateExecutorId {
                executor_id: id.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_edge_references(shape: &GraphShape<'_>) -> Result<(), Vec<ValidationError>> {
    let executor_ids: HashSet<&str> = shape.executor_ids.iter().copied().collect();
    let mut errors = Vec::new();

    for (source, target) in &shape.edges {
        for endpoint in [source, target] {
            if !executor_ids.contains(endpoint) {
                errors.push(ValidationError::UnknownEdgeEndpoint {
                    source_id: source.to_string(),
                    target_id: target.to_string(),
                    missing: endpoint.to_string(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_start_executor(shape: &GraphShape<'_>) -> Result<(), ValidationError> {
    match shape.start_executor {
        None => Err(ValidationError::MissingStartExecutor),
        Some(start) if !shape.executor_ids.contains(&start) => {
            Err(ValidationError::UnknownStartExecutor {
                executor_id: start.to_string(),
            })
        }
        Some(_) => Ok(()),
    }
}

fn validate_output_executors(shape: &GraphShape<'_>) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = shape
        .output_executors
        .iter()
        .filter(|id| !shape.executor_ids.contains(*id))
        .map(|id| ValidationError::UnknownOutputExecutor {
            executor_id: id.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Breadth-first search from the start executor over the edge list.
///
/// Only called on a structurally valid shape, so the start executor is known
/// to be present.
fn find_unreachable_outputs(shape: &GraphShape<'_>) -> Vec<ValidationError> {
    let Some(start) = shape.start_executor else {
        return Vec::new();
    };

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for (source, target) in &shape.edges {
        adjacency.entry(*source).or_default().push(*target);
    }

    let mut reachable = HashSet::new();
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        if !reachable.insert(node) {
            continue;
        }
        if let Some(targets) = adjacency.get(node) {
            queue.extend(targets.iter().copied());
        }
    }

    shape
        .output_executors
        .iter()
        .filter(|id| !reachable.contains(*id))
        .map(|id| {
            UnreachableOutputDetected {
                executor_id: id,
                start_executor: start,
            }
            .log();

            ValidationError::UnreachableOutput {
                executor_id: id.to_string(),
                start_executor: start.to_string(),
            }
        })
        .collect()
}
