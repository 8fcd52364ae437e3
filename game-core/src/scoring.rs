use std::collections::HashSet;

use game_types::{Game, Guess, Player, PlayerTurnResult, RoundPhase, TurnResult};
use tracing::debug;

/// Points the explainer earns for a turn: 30 per correct guess, 0 if
/// nobody got the word.
pub fn explainer_points(correct_count: u32) -> u32 {
    30 * correct_count
}

/// Points a guesser earns by rank among correct guesses: 100 for the
/// first, 20 less for each later rank, floored at 10.
pub fn guesser_points(order: u32) -> u32 {
    100u32.saturating_sub(20 * order.saturating_sub(1)).max(10)
}

/// Everything a turn-ending write carries: the rebuilt player list, the
/// results report, and whether this was the game's last turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnSettlement {
    pub turn_number: u32,
    pub players: Vec<Player>,
    pub results: TurnResult,
    pub finishes_game: bool,
}

/// Settle the current active turn from a snapshot.
///
/// Pure and deterministic: every client that observes the same snapshot
/// computes the same settlement, which is what makes redundant turn-end
/// detection across clients harmless. Scores are rebuilt from the
/// snapshot's baseline rather than incremented in place, so a settlement
/// can never double-accumulate. Returns `None` unless the snapshot holds
/// an active round.
pub fn settle_turn(game: &Game) -> Option<TurnSettlement> {
    let round = game.round()?;
    let word = match &round.phase {
        RoundPhase::Active { word, .. } => word.clone(),
        _ => return None,
    };

    // First correct guess per player only; a duplicate correct submission
    // must not be counted twice.
    let mut seen = HashSet::new();
    let correct: Vec<&Guess> = round
        .correct_guesses()
        .filter(|g| seen.insert(g.player_id))
        .collect();

    let explainer_gain = explainer_points(correct.len() as u32);
    let explainer_name = game
        .player(round.explainer_id)
        .map(|p| p.name.clone())
        .unwrap_or_default();

    let mut players = game.players.clone();
    let mut player_results = Vec::with_capacity(players.len());
    for player in &mut players {
        let was_explainer = player.id == round.explainer_id;
        let rank = correct.iter().position(|g| g.player_id == player.id);
        let gained = if was_explainer {
            explainer_gain
        } else {
            rank.map(|i| guesser_points(i as u32 + 1)).unwrap_or(0)
        };
        player.score += gained;
        player_results.push(PlayerTurnResult {
            player_id: player.id,
            name: player.name.clone(),
            points_gained: gained,
            total_score: player.score,
            was_explainer,
            guessed_correctly: rank.is_some(),
        });
    }

    let finishes_game = round.number >= game.total_turns();
    debug!(
        turn = round.number,
        correct = correct.len(),
        finishes_game,
        "settled turn"
    );

    Some(TurnSettlement {
        turn_number: round.number,
        players,
        results: TurnResult {
            turn_number: round.number,
            word,
            explainer_id: round.explainer_id,
            explainer_name,
            correct_count: correct.len() as u32,
            explainer_points: explainer_gain,
            player_results,
        },
        finishes_game,
    })
}
