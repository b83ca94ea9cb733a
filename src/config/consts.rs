// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Lowest number the guessing game accepts by default
pub const DEFAULT_LOWER_BOUND: u32 = 1;
/// Highest number the guessing game accepts by default
pub const DEFAULT_UPPER_BOUND: u32 = 100;

/// Input that starts a guessing game
pub const START_GAME: &str = "start_game";
/// Request from a turn manager to its agent for the next guess
pub const AGENT_REQUEST: &str = "agent_request";
/// Agent reply carrying a guess
pub const AGENT_RESPONSE: &str = "agent_response";
/// Request-info type asking the human whether a guess is higher, lower or correct
pub const GUESS_FEEDBACK: &str = "guess_feedback";
