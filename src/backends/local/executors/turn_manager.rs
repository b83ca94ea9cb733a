// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Turn manager for the number guessing game.
//!
//! The manager and an agent take turns: the manager asks the agent for a guess
//! within its current bounds, asks the human whether the guess is `higher`,
//! `lower` or `correct`, narrows the bounds and asks again.
//!
//! ```text
//!   start_game --> [turns] --agent_request--> [guesser]
//!                     ^                           |
//!                     +-------agent_response------+
//!                     |
//!          request_info(guess_feedback) <--> caller
//! ```
//!
//! A `correct` answer yields `{"guess": n, "turns": t}` as the workflow output.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::consts::{
    AGENT_REQUEST, AGENT_RESPONSE, DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND, GUESS_FEEDBACK,
    START_GAME,
};
use crate::engine::WorkflowContext;
use crate::errors::ExecutionError;
use crate::traits::agent::{AgentRequest, AgentResponse, ChatMessage};
use crate::traits::{Executor, ExecutorFactory};
use crate::types::{Message, PayloadType, RequestResponse};

/// Private state of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub lower: u32,
    pub upper: u32,
    pub turns: u32,
    pub last_guess: Option<u32>,
}

impl GameState {
    fn new(lower: u32, upper: u32) -> Self {
        Self {
            lower,
            upper,
            turns: 0,
            last_guess: None,
        }
    }
}

/// Optional bounds carried by a `start_game` input.
#[derive(Debug, Default, Deserialize)]
struct StartGame {
    lower: Option<u32>,
    upper: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feedback {
    Higher,
    Lower,
    Correct,
}

impl Feedback {
    fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "higher" | "h" => Some(Feedback::Higher),
            "lower" | "l" => Some(Feedback::Lower),
            "correct" | "c" => Some(Feedback::Correct),
            _ => None,
        }
    }
}

pub struct TurnManager {
    id: String,
    default_bounds: (u32, u32),
    state: GameState,
}

impl TurnManager {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_bounds(id, DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND)
    }

    pub fn with_bounds(id: impl Into<String>, lower: u32, upper: u32) -> Self {
        Self {
            id: id.into(),
            default_bounds: (lower, upper),
            state: GameState::new(lower, upper),
        }
    }

    pub fn factory() -> ExecutorFactory {
        Self::factory_with_bounds(DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND)
    }

    pub fn factory_with_bounds(lower: u32, upper: u32) -> ExecutorFactory {
        ExecutorFactory::new("turn_manager", move |id| {
            Box::new(Self::with_bounds(id, lower, upper))
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    fn fail(&self, message: impl Into<String>) -> ExecutionError {
        ExecutionError::HandlerFailed {
            executor_id: self.id.clone(),
            message: message.into(),
        }
    }

    fn start_game(&mut self, message: Message, ctx: &mut WorkflowContext) -> Result<(), ExecutionError> {
        let start = if message.payload.is_object() {
            message.into_payload::<StartGame>()?
        } else {
            StartGame::default()
        };

        let lower = start.lower.unwrap_or(self.default_bounds.0);
        let upper = start.upper.unwrap_or(self.default_bounds.1);
        if lower > upper {
            return Err(self.fail(format!("invalid bounds {}..={}", lower, upper)));
        }

        self.state = GameState::new(lower, upper);
        self.ask_for_guess(ctx)
    }

    fn ask_for_guess(&self, ctx: &mut WorkflowContext) -> Result<(), ExecutionError> {
        let request = AgentRequest {
            messages: vec![
                ChatMessage::system(
                    "You are playing a number guessing game. Reply with a single number.",
                ),
                ChatMessage::user(format!(
                    "Guess a number between {} and {}.",
                    self.state.lower, self.state.upper
                )),
            ],
            response_format: Some("guess".to_string()),
            context: json!({ "lower": self.state.lower, "upper": self.state.upper }),
        };
        ctx.send(AGENT_REQUEST, &request)
    }

    fn receive_guess(&mut self, message: Message, ctx: &mut WorkflowContext) -> Result<(), ExecutionError> {
        let response: AgentResponse = message.into_payload()?;
        let guess = parse_guess(&response)
            .ok_or_else(|| self.fail(format!("agent reply '{}' is not a guess", response.text)))?;

        if guess < self.state.lower || guess > self.state.upper {
            return Err(self.fail(format!(
                "guess {} is outside {}..={}",
                guess, self.state.lower, self.state.upper
            )));
        }

        self.state.turns += 1;
        self.state.last_guess = Some(guess);
        ask_for_feedback(ctx, guess, self.state.turns, None);
        Ok(())
    }

    fn receive_feedback(&mut self, message: Message, ctx: &mut WorkflowContext) -> Result<(), ExecutionError> {
        let response: RequestResponse = message.into_payload()?;
        let guess = self
            .state
            .last_guess
            .ok_or_else(|| self.fail("feedback arrived before any guess"))?;

        let Some(feedback) = response.response_text().and_then(Feedback::parse) else {
            ask_for_feedback(
                ctx,
                guess,
                self.state.turns,
                Some("Please answer higher, lower, or correct."),
            );
            return Ok(());
        };

        match feedback {
            Feedback::Correct => {
                ctx.yield_output(json!({ "guess": guess, "turns": self.state.turns }));
                Ok(())
            }
            Feedback::Higher => {
                let lower = guess.saturating_add(1);
                if guess == u32::MAX || lower > self.state.upper {
                    return Err(self.fail(format!(
                        "'higher' than {} contradicts upper bound {}",
                        guess, self.state.upper
                    )));
                }
                self.state.lower = lower;
                self.ask_for_guess(ctx)
            }
            Feedback::Lower => {
                let upper = guess
                    .checked_sub(1)
                    .filter(|upper| *upper >= self.state.lower)
                    .ok_or_else(|| {
                        self.fail(format!(
                            "'lower' than {} contradicts lower bound {}",
                            guess, self.state.lower
                        ))
                    })?;
                self.state.upper = upper;
                self.ask_for_guess(ctx)
            }
        }
    }
}

fn parse_guess(response: &AgentResponse) -> Option<u32> {
    let structured = response
        .structured
        .as_ref()
        .and_then(|value| value.get("guess"))
        .and_then(Value::as_u64)
        .and_then(|guess| u32::try_from(guess).ok());

    structured.or_else(|| response.text.trim().parse().ok())
}

fn ask_for_feedback(ctx: &mut WorkflowContext, guess: u32, turn: u32, hint: Option<&str>) {
    let question = format!("I guess {}. Is your number higher, lower, or correct?", guess);
    let prompt = match hint {
        Some(hint) => format!("{} {}", hint, question),
        None => question,
    };
    ctx.request_info(
        GUESS_FEEDBACK,
        json!({ "prompt": prompt, "guess": guess, "turn": turn }),
    );
}

#[async_trait]
impl Executor for TurnManager {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &'static str {
        "turn_manager"
    }

    fn input_types(&self) -> Vec<PayloadType> {
        vec![
            PayloadType::from(START_GAME),
            PayloadType::from(AGENT_RESPONSE),
            PayloadType::response_to(&PayloadType::from(GUESS_FEEDBACK)),
        ]
    }

    async fn handle(
        &mut self,
        message: Message,
        ctx: &mut WorkflowContext,
    ) -> Result<(), ExecutionError> {
        if message.payload_type.as_str() == START_GAME {
            self.start_game(message, ctx)
        } else if message.payload_type.as_str() == AGENT_RESPONSE {
            self.receive_guess(message, ctx)
        } else if message.payload_type.is_response() {
            self.receive_feedback(message, ctx)
        } else {
            Err(ExecutionError::UnhandledMessageType {
                executor_id: self.id.clone(),
                payload_type: message.payload_type,
            })
        }
    }

    fn snapshot_state(&self) -> Option<Value> {
        serde_json::to_value(self.state).ok()
    }

    fn restore_state(&mut self, state: Value) -> Result<(), ExecutionError> {
        self.state = serde_json::from_value(state).map_err(|source| ExecutionError::InvalidPayload {
            payload_type: PayloadType::from("turn_manager_state"),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::Effect;
    use crate::types::{RequestId, RequestInfoMessage};

    fn agent_reply(guess: u32) -> Message {
        let response = AgentResponse {
            text: guess.to_string(),
            structured: None,
        };
        Message::new(
            AGENT_RESPONSE,
            serde_json::to_value(response).unwrap(),
            Some("guesser".to_string()),
            "turns",
        )
    }

    fn feedback(answer: &str) -> Message {
        let response = RequestResponse {
            original_request: RequestInfoMessage {
                request_id: RequestId::from("r"),
                source_executor_id: "turns".to_string(),
                request_type: PayloadType::from(GUESS_FEEDBACK),
                data: json!({}),
            },
            response_data: json!(answer),
        };
        Message::new(
            PayloadType::response_to(&PayloadType::from(GUESS_FEEDBACK)),
            serde_json::to_value(response).unwrap(),
            None,
            "turns",
        )
    }

    async fn deliver(manager: &mut TurnManager, message: Message) -> Result<Vec<Effect>, ExecutionError> {
        let mut ctx = WorkflowContext::new("turns", 1);
        manager.handle(message, &mut ctx).await?;
        Ok(ctx.into_effects())
    }

    #[tokio::test]
    async fn test_start_game_asks_agent_with_bounds() {
        let mut manager = TurnManager::new("turns");
        let effects = deliver(&mut manager, Message::new(START_GAME, json!("go"), None, "turns"))
            .await
            .unwrap();

        match &effects[..] {
            [Effect::Send { payload_type, payload }] => {
                assert_eq!(payload_type.as_str(), AGENT_REQUEST);
                let request: AgentRequest = serde_json::from_value(payload.clone()).unwrap();
                assert_eq!(request.context, json!({"lower": 1, "upper": 100}));
            }
            other => panic!("Expected one agent request, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_feedback_narrows_bounds() {
        struct TestCase {
            answer: &'static str,
            expected_lower: u32,
            expected_upper: u32,
        }

        let test_cases = vec![
            TestCase {
                answer: "higher",
                expected_lower: 51,
                expected_upper: 100,
            },
            TestCase {
                answer: "LOWER",
                expected_lower: 1,
                expected_upper: 49,
            },
        ];

        for test_case in test_cases {
            let mut manager = TurnManager::new("turns");
            deliver(&mut manager, agent_reply(50)).await.unwrap();
            let effects = deliver(&mut manager, feedback(test_case.answer)).await.unwrap();

            assert_eq!(manager.state().lower, test_case.expected_lower, "{}", test_case.answer);
            assert_eq!(manager.state().upper, test_case.expected_upper, "{}", test_case.answer);
            assert!(matches!(&effects[..], [Effect::Send { .. }]));
        }
    }

    #[tokio::test]
    async fn test_correct_yields_guess_and_turns() {
        let mut manager = TurnManager::new("turns");
        deliver(&mut manager, agent_reply(42)).await.unwrap();
        let effects = deliver(&mut manager, feedback("correct")).await.unwrap();

        assert_eq!(effects, vec![Effect::Output(json!({"guess": 42, "turns": 1}))]);
    }

    #[tokio::test]
    async fn test_unrecognized_answer_asks_again() {
        let mut manager = TurnManager::new("turns");
        deliver(&mut manager, agent_reply(42)).await.unwrap();
        let effects = deliver(&mut manager, feedback("maybe")).await.unwrap();

        match &effects[..] {
            [Effect::Request(request)] => {
                assert_eq!(request.request_type.as_str(), GUESS_FEEDBACK);
                assert_eq!(request.data["guess"], json!(42));
            }
            other => panic!("Expected a repeated request, got {:?}", other),
        }
        assert_eq!(manager.state().turns, 1);
    }

    #[tokio::test]
    async fn test_contradictory_feedback_fails() {
        let mut manager = TurnManager::with_bounds("turns", 1, 10);
        deliver(&mut manager, agent_reply(10)).await.unwrap();

        let err = deliver(&mut manager, feedback("higher")).await.unwrap_err();
        assert!(matches!(err, ExecutionError::HandlerFailed { .. }));
    }

    #[tokio::test]
    async fn test_out_of_bounds_guess_fails() {
        let mut manager = TurnManager::with_bounds("turns", 1, 10);
        let err = deliver(&mut manager, agent_reply(11)).await.unwrap_err();
        assert!(err.to_string().contains("outside 1..=10"));
    }

    #[test]
    fn test_state_snapshot_round_trip() {
        let mut manager = TurnManager::new("turns");
        manager.state = GameState {
            lower: 51,
            upper: 75,
            turns: 2,
            last_guess: Some(75),
        };

        let snapshot = manager.snapshot_state().unwrap();
        let mut restored = TurnManager::new("turns");
        restored.restore_state(snapshot).unwrap();
        assert_eq!(restored.state(), manager.state());
    }
}
