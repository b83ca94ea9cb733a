// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Superstep run engine with request/response pause and resume.
//!
//! A [`WorkflowRun`] is one execution of a [`Workflow`]. It owns a fresh
//! instance of every executor, the [`Correlator`] holding outstanding requests,
//! and the queue of messages waiting for delivery.
//!
//! # Execution Model
//!
//! Work advances in discrete **supersteps**:
//!
//! 1. Take every message currently queued, in arrival order
//! 2. Deliver each one to the handler its target registered for its type
//! 3. Apply the handler's effects as soon as it returns: sent messages are
//!    queued for the *next* superstep (one copy per matching edge), outputs
//!    and request-info events are appended to the call's event list
//! 4. Repeat until the queue is empty
//!
//! Handlers are awaited one after another, so no two handlers of the same run
//! ever execute concurrently. Execution order is fully determined by message
//! arrival order and edge insertion order.
//!
//! ```text
//!  start(input)            resume({id: answer})
//!       |                          |
//!       v                          v
//!  [queue] --superstep--> [queue] --superstep--> ... --> quiescence
//!                 \                                         |
//!                  +-- request_info --> Correlator          v
//!                                                   events for this call
//! ```
//!
//! # Pausing
//!
//! A handler pauses its logical thread by calling
//! `WorkflowContext::request_info`. The request is registered with the
//! correlator and surfaced as `WorkflowEvent::RequestInfo`; nothing is routed
//! along edges. When the queue drains while requests are still pending the run
//! is `IDLE_WITH_PENDING_REQUESTS` and the call's events end with that status.
//! `resume` turns each answered request into a `RequestResponse` message for
//! the issuing executor and runs supersteps again.
//!
//! # Failure
//!
//! Structural errors (`UnhandledMessageType`, `NoMatchingEdge`,
//! `DuplicateRequestId`, handler failures) abort the run. The run is marked
//! `FAILED` and every later call returns `ExecutionError::RunFailed`. Unknown
//! or stale request ids in a `resume` batch are not fatal; they are reported
//! per entry in [`ResumeOutcome::rejected`].

use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::Workflow;
use crate::engine::checkpoint::RunCheckpoint;
use crate::engine::context::{Effect, WorkflowContext};
use crate::engine::correlator::Correlator;
use crate::engine::options::{RunOptions, StatusReporting};
use crate::errors::{CorrelationError, ExecutionError};
use crate::observability::messages::correlation::ResponseRejected;
use crate::observability::messages::engine::{
    RunFailed, RunFinished, RunPaused, RunRestored, RunResumed, RunStarted, SuperstepCompleted,
};
use crate::observability::messages::executor::{HandlerFailed, HandlerInvoked, OutputDiscarded};
use crate::observability::messages::StructuredLog;
use crate::traits::Executor;
use crate::types::{
    Message, PayloadType, PendingRequest, RequestId, RequestResponse, WorkflowEvent,
    WorkflowEvents, WorkflowRunState,
};

/// Result of a `resume` call.
#[derive(Debug)]
pub struct ResumeOutcome {
    /// Events produced while running to quiescence after the responses were applied.
    pub events: WorkflowEvents,
    /// Entries whose request id matched no pending request.
    pub rejected: Vec<CorrelationError>,
}

struct RunningExecutor {
    executor: Box<dyn Executor>,
    input_types: HashSet<PayloadType>,
}

impl RunningExecutor {
    fn new(executor: Box<dyn Executor>) -> Self {
        let input_types = executor.input_types().into_iter().collect();
        Self {
            executor,
            input_types,
        }
    }
}

/// Collects what one call hands back to the caller.
#[derive(Default)]
struct CallEvents {
    events: Vec<WorkflowEvent>,
    output_count: usize,
}

/// One execution of a workflow.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use serde_json::json;
/// use the_handoff::backends::local::YieldOutputExecutor;
/// use the_handoff::config::WorkflowBuilder;
/// use the_handoff::engine::WorkflowRun;
/// use the_handoff::types::{WorkflowEvent, WorkflowRunState};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let workflow = WorkflowBuilder::new()
///     .add_executor("echo", YieldOutputExecutor::factory("text"))
///     .set_start_executor("echo")
///     .build()?;
///
/// let mut run = WorkflowRun::new(Arc::new(workflow));
/// let events: Vec<WorkflowEvent> = run.start("text", json!("done")).await?.collect();
///
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].output(), Some(&json!("done")));
/// assert_eq!(run.state(), WorkflowRunState::Completed);
/// # Ok(())
/// # }
/// ```
pub struct WorkflowRun {
    run_id: String,
    workflow: Arc<Workflow>,
    options: RunOptions,
    executors: HashMap<String, RunningExecutor>,
    correlator: Correlator,
    queue: VecDeque<Message>,
    superstep: u64,
    state: WorkflowRunState,
    started: bool,
    cancellation: CancellationToken,
}

impl WorkflowRun {
    pub fn new(workflow: Arc<Workflow>) -> Self {
        Self::with_options(workflow, RunOptions::default())
    }

    pub fn with_options(workflow: Arc<Workflow>, options: RunOptions) -> Self {
        let executors = Self::instantiate(&workflow);
        Self {
            run_id: Uuid::new_v4().to_string(),
            workflow,
            options,
            executors,
            correlator: Correlator::new(),
            queue: VecDeque::new(),
            superstep: 0,
            state: WorkflowRunState::Idle,
            started: false,
            cancellation: CancellationToken::new(),
        }
    }

    fn instantiate(workflow: &Workflow) -> HashMap<String, RunningExecutor> {
        workflow
            .instantiate_executors()
            .into_iter()
            .map(|(id, executor)| (id, RunningExecutor::new(executor)))
            .collect()
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn state(&self) -> WorkflowRunState {
        self.state
    }

    pub fn workflow(&self) -> &Arc<Workflow> {
        &self.workflow
    }

    /// Total supersteps executed over the life of the run.
    pub fn superstep(&self) -> u64 {
        self.superstep
    }

    pub fn pending_count(&self) -> usize {
        self.correlator.pending_count()
    }

    /// Outstanding requests in the order they were issued.
    pub fn pending_requests(&self) -> impl Iterator<Item = &PendingRequest> {
        self.correlator.pending()
    }

    /// Token a host can use to abandon the run from another task.
    ///
    /// Cancellation is observed between supersteps. Effects handlers already
    /// performed are not rolled back.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Use a token owned by the host, for example a child of a shutdown token.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Deliver `input` to the start executor's `payload_type` handler and run
    /// supersteps until quiescence.
    pub async fn start(
        &mut self,
        payload_type: impl Into<PayloadType>,
        input: Value,
    ) -> Result<WorkflowEvents, ExecutionError> {
        self.ensure_usable()?;
        if self.started {
            return Err(ExecutionError::AlreadyStarted {
                run_id: self.run_id.clone(),
            });
        }
        self.started = true;

        let start_executor = self.workflow.start_executor().to_string();
        RunStarted {
            run_id: &self.run_id,
            start_executor: &start_executor,
            executor_count: self.executors.len(),
        }
        .log();

        self.queue
            .push_back(Message::new(payload_type, input, None, start_executor));
        self.run_to_quiescence().await
    }

    /// Answer pending requests and run supersteps until quiescence.
    ///
    /// Each entry is resolved independently. An id that matches no pending
    /// request (never issued, or already answered) is reported in
    /// [`ResumeOutcome::rejected`] and the rest of the batch still applies.
    pub async fn resume<I>(&mut self, responses: I) -> Result<ResumeOutcome, ExecutionError>
    where
        I: IntoIterator<Item = (RequestId, Value)>,
    {
        self.ensure_usable()?;
        if !self.started {
            return Err(ExecutionError::NotStarted {
                run_id: self.run_id.clone(),
            });
        }

        let mut rejected = Vec::new();
        let mut accepted = 0usize;
        for (request_id, response_data) in responses {
            match self.correlator.resolve(&request_id, response_data) {
                Ok(response) => {
                    self.enqueue_response(response)?;
                    accepted += 1;
                }
                Err(error) => {
                    ResponseRejected {
                        run_id: &self.run_id,
                        request_id: request_id.as_str(),
                        error: &error,
                    }
                    .log();
                    rejected.push(error);
                }
            }
        }

        RunResumed {
            run_id: &self.run_id,
            accepted,
            rejected: rejected.len(),
        }
        .log();

        let events = self.run_to_quiescence().await?;
        Ok(ResumeOutcome { events, rejected })
    }

    /// Capture everything needed to continue this run later.
    pub fn checkpoint(&self) -> RunCheckpoint {
        let executor_states: BTreeMap<String, Value> = self
            .executors
            .iter()
            .filter_map(|(id, running)| {
                running
                    .executor
                    .snapshot_state()
                    .map(|state| (id.clone(), state))
            })
            .collect();

        RunCheckpoint {
            run_id: self.run_id.clone(),
            state: self.state,
            started: self.started,
            superstep: self.superstep,
            correlator: self.correlator.clone(),
            queue: self.queue.iter().cloned().collect(),
            executor_states,
        }
    }

    /// Rebuild a run from a checkpoint taken against the same workflow.
    pub fn restore(
        workflow: Arc<Workflow>,
        checkpoint: RunCheckpoint,
        options: RunOptions,
    ) -> Result<Self, ExecutionError> {
        let mut executors = Self::instantiate(&workflow);

        for (id, state) in checkpoint.executor_states {
            let running = executors.get_mut(&id).ok_or_else(|| {
                ExecutionError::Checkpoint(format!("state captured for unknown executor '{}'", id))
            })?;
            running.executor.restore_state(state)?;
        }

        let referenced = checkpoint
            .queue
            .iter()
            .map(|message| &message.target)
            .chain(
                checkpoint
                    .correlator
                    .pending()
                    .map(|pending| &pending.issuing_executor_id),
            );
        for executor_id in referenced {
            if !executors.contains_key(executor_id) {
                return Err(ExecutionError::Checkpoint(format!(
                    "checkpoint references unknown executor '{}'",
                    executor_id
                )));
            }
        }

        RunRestored {
            run_id: &checkpoint.run_id,
            pending_count: checkpoint.correlator.pending_count(),
            queued: checkpoint.queue.len(),
        }
        .log();

        Ok(Self {
            run_id: checkpoint.run_id,
            workflow,
            options,
            executors,
            correlator: checkpoint.correlator,
            queue: checkpoint.queue.into(),
            superstep: checkpoint.superstep,
            state: checkpoint.state,
            started: checkpoint.started,
            cancellation: CancellationToken::new(),
        })
    }

    fn ensure_usable(&mut self) -> Result<(), ExecutionError> {
        if self.state == WorkflowRunState::Failed {
            return Err(ExecutionError::RunFailed {
                run_id: self.run_id.clone(),
            });
        }
        if self.cancellation.is_cancelled() {
            let error = ExecutionError::Cancelled {
                run_id: self.run_id.clone(),
            };
            return Err(self.fail(error));
        }
        Ok(())
    }

    fn enqueue_response(&mut self, response: RequestResponse) -> Result<(), ExecutionError> {
        let payload_type = PayloadType::response_to(&response.original_request.request_type);
        let target = response.original_request.source_executor_id.clone();
        let payload = match serde_json::to_value(&response) {
            Ok(payload) => payload,
            Err(source) => {
                let error = ExecutionError::InvalidPayload {
                    payload_type,
                    source,
                };
                return Err(self.fail(error));
            }
        };

        self.queue
            .push_back(Message::new(payload_type, payload, None, target));
        Ok(())
    }

    async fn run_to_quiescence(&mut self) -> Result<WorkflowEvents, ExecutionError> {
        let started_at = Instant::now();
        let full = self.options.status_reporting == StatusReporting::Full;
        let mut call = CallEvents::default();

        if self.queue.is_empty() {
            // Nothing was accepted: report where the run stands without changing it.
            if self.correlator.pending_count() > 0 {
                self.state = WorkflowRunState::IdleWithPendingRequests;
                call.events.push(WorkflowEvent::Status { state: self.state });
            } else if full {
                call.events.push(WorkflowEvent::Status { state: self.state });
            }
            return Ok(WorkflowEvents::new(call.events));
        }

        self.state = WorkflowRunState::InProgress;
        if full {
            call.events.push(WorkflowEvent::Status { state: self.state });
        }

        let mut steps_this_call = 0u64;
        let mut reported_partial = false;

        while !self.queue.is_empty() {
            if self.cancellation.is_cancelled() {
                let error = ExecutionError::Cancelled {
                    run_id: self.run_id.clone(),
                };
                return Err(self.fail(error));
            }
            if let Some(limit) = self.options.max_supersteps {
                if steps_this_call >= limit {
                    let error = ExecutionError::SuperstepLimitExceeded {
                        run_id: self.run_id.clone(),
                        limit,
                    };
                    return Err(self.fail(error));
                }
            }

            steps_this_call += 1;
            self.superstep += 1;

            let batch: Vec<Message> = self.queue.drain(..).collect();
            let delivered = batch.len();
            for message in batch {
                if let Err(error) = self.deliver(message, &mut call).await {
                    return Err(self.fail(error));
                }
            }

            SuperstepCompleted {
                run_id: &self.run_id,
                superstep: self.superstep,
                delivered,
                queued: self.queue.len(),
                pending: self.correlator.pending_count(),
            }
            .log();

            if self.correlator.pending_count() > 0 && !self.queue.is_empty() {
                self.state = WorkflowRunState::InProgressPendingRequests;
                if full && !reported_partial {
                    call.events.push(WorkflowEvent::Status { state: self.state });
                    reported_partial = true;
                }
            }
        }

        let pending_count = self.correlator.pending_count();
        if pending_count > 0 {
            self.state = WorkflowRunState::IdleWithPendingRequests;
            RunPaused {
                run_id: &self.run_id,
                pending_count,
                duration: started_at.elapsed(),
            }
            .log();
            call.events.push(WorkflowEvent::Status { state: self.state });
        } else {
            self.state = if call.output_count > 0 {
                WorkflowRunState::Completed
            } else {
                WorkflowRunState::Idle
            };
            RunFinished {
                run_id: &self.run_id,
                state: self.state,
                output_count: call.output_count,
                duration: started_at.elapsed(),
            }
            .log();
            if full {
                call.events.push(WorkflowEvent::Status { state: self.state });
            }
        }

        Ok(WorkflowEvents::new(call.events))
    }

    async fn deliver(&mut self, message: Message, call: &mut CallEvents) -> Result<(), ExecutionError> {
        let executor_id = message.target.clone();
        let payload_type = message.payload_type.clone();

        let running = self
            .executors
            .get_mut(&executor_id)
            .ok_or_else(|| ExecutionError::UnknownExecutor {
                executor_id: executor_id.clone(),
            })?;

        if !running.input_types.contains(&payload_type) {
            return Err(ExecutionError::UnhandledMessageType {
                executor_id,
                payload_type,
            });
        }

        HandlerInvoked {
            executor_id: &executor_id,
            implementation: running.executor.name(),
            payload_type: payload_type.as_str(),
            superstep: self.superstep,
        }
        .log();

        let mut ctx = WorkflowContext::new(executor_id.clone(), self.superstep);
        if let Err(error) = running.executor.handle(message, &mut ctx).await {
            HandlerFailed {
                executor_id: &executor_id,
                payload_type: payload_type.as_str(),
                error: &error,
            }
            .log();
            return Err(error);
        }

        self.apply_effects(&executor_id, ctx.into_effects(), call)
    }

    fn apply_effects(
        &mut self,
        executor_id: &str,
        effects: Vec<Effect>,
        call: &mut CallEvents,
    ) -> Result<(), ExecutionError> {
        for effect in effects {
            match effect {
                Effect::Send {
                    payload_type,
                    payload,
                } => self.route(executor_id, payload_type, payload, call)?,
                Effect::Output(data) => self.emit_output(executor_id, data, call),
                Effect::Request(request) => {
                    self.correlator.register(request.clone(), self.superstep)?;
                    call.events.push(WorkflowEvent::RequestInfo {
                        request_id: request.request_id,
                        source_executor_id: request.source_executor_id,
                        request_type: request.request_type,
                        data: request.data,
                    });
                }
            }
        }
        Ok(())
    }

    fn route(
        &mut self,
        executor_id: &str,
        payload_type: PayloadType,
        payload: Value,
        call: &mut CallEvents,
    ) -> Result<(), ExecutionError> {
        let targets: Vec<String> = self
            .workflow
            .graph()
            .routes(executor_id, &payload_type)
            .map(|edge| edge.target.clone())
            .collect();

        if targets.is_empty() {
            if self.workflow.is_designated_output(executor_id) {
                self.emit_output(executor_id, payload, call);
                return Ok(());
            }
            return Err(ExecutionError::NoMatchingEdge {
                executor_id: executor_id.to_string(),
                payload_type,
            });
        }

        for target in targets {
            self.queue.push_back(Message::new(
                payload_type.clone(),
                payload.clone(),
                Some(executor_id.to_string()),
                target,
            ));
        }
        Ok(())
    }

    fn emit_output(&self, executor_id: &str, data: Value, call: &mut CallEvents) {
        if self.workflow.is_output(executor_id) {
            call.events.push(WorkflowEvent::Output {
                source_executor_id: executor_id.to_string(),
                data,
            });
            call.output_count += 1;
        } else {
            OutputDiscarded { executor_id }.log();
        }
    }

    fn fail(&mut self, error: ExecutionError) -> ExecutionError {
        self.state = WorkflowRunState::Failed;
        RunFailed {
            run_id: &self.run_id,
            error: &error,
        }
        .log();
        error
    }
}
