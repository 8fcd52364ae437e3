use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::game::PlayerId;

/// Per-player outcome of one turn, built for the results display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerTurnResult {
    pub player_id: PlayerId,
    pub name: String,
    pub points_gained: u32,
    pub total_score: u32,
    pub was_explainer: bool,
    pub guessed_correctly: bool,
}

/// Settlement report for one finished turn. Stored in the round document
/// so late observers see the same results as the settling client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TurnResult {
    pub turn_number: u32,
    pub word: String,
    pub explainer_id: PlayerId,
    pub explainer_name: String,
    pub correct_count: u32,
    pub explainer_points: u32,
    pub player_results: Vec<PlayerTurnResult>,
}

/// Display-only mapping of the flat turn counter back onto user-facing
/// rounds: turn 5 of a 3-player game is round 2, turn 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundView {
    pub turn_number: u32,
    pub display_round: u32,
    pub turn_in_round: u32,
    pub total_rounds: u32,
}

impl RoundView {
    pub fn new(turn_number: u32, player_count: u32, total_rounds: u32) -> Self {
        Self {
            turn_number,
            display_round: turn_number.div_ceil(player_count),
            turn_in_round: (turn_number - 1) % player_count + 1,
            total_rounds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessOutcome {
    pub is_correct: bool,
}
