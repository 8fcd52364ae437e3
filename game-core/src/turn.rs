use game_types::{Game, RoundPhase};

/// Current wall clock as epoch milliseconds, the unit every document
/// timestamp uses.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Start and end timestamps for a turn beginning now.
pub fn turn_bounds(now: i64, round_seconds: u32) -> (i64, i64) {
    (now, now + i64::from(round_seconds) * 1000)
}

/// Whole seconds left on the round clock, rounded up so the display
/// never shows 0 while time remains. Clamped at 0 after the deadline.
pub fn remaining_seconds(end_time: i64, now: i64) -> u32 {
    let millis = (end_time - now).max(0);
    (millis as u64).div_ceil(1000) as u32
}

/// Why an active turn is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TimeUp,
    AllGuessed,
}

/// Whether the snapshot's active turn should end now, and why.
///
/// `AllGuessed` requires at least one connected non-explainer guesser;
/// otherwise a turn with no audience would end the moment it started.
pub fn end_condition(game: &Game, now: i64) -> Option<EndReason> {
    let round = game.round()?;
    let RoundPhase::Active { end_time, .. } = &round.phase else {
        return None;
    };

    let guessers: Vec<_> = game
        .connected_players()
        .filter(|p| p.id != round.explainer_id)
        .collect();
    if !guessers.is_empty()
        && guessers.iter().all(|p| {
            round
                .correct_guesses()
                .any(|g| g.player_id == p.id)
        })
    {
        return Some(EndReason::AllGuessed);
    }

    if now >= *end_time {
        return Some(EndReason::TimeUp);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_types::{
        Difficulty, Game, GameCode, GameSettings, GameStage, GameUpdate, Guess, Player, Round,
        RoundPhase,
    };

    fn active_game(names: &[&str]) -> Game {
        let mut players = names.iter().enumerate().map(|(i, n)| Player::new(*n, i == 0));
        let host = players.next().unwrap();
        let settings = GameSettings {
            max_players: 8,
            round_seconds: 60,
            total_rounds: 2,
            difficulty: Difficulty::Easy,
        };
        let mut game = Game::new(GameCode::generate(), host, settings, 0);
        for p in players {
            game.apply(GameUpdate::AddPlayer { player: p }, 0).unwrap();
        }
        let explainer = game.players[0].id;
        let mut round = Round::waiting(1, explainer);
        round.phase = RoundPhase::Active {
            word: "apple".to_string(),
            start_time: 0,
            end_time: 60_000,
        };
        game.stage = GameStage::Playing { round };
        game
    }

    fn correct_guess_by(game: &Game, index: usize, order: u32) -> Guess {
        let p = &game.players[index];
        Guess {
            player_id: p.id,
            player_name: p.name.clone(),
            text: "apple".to_string(),
            is_correct: true,
            timestamp: 5_000,
            order,
            time_remaining: 55,
        }
    }

    #[test]
    fn test_remaining_seconds_rounds_up() {
        assert_eq!(remaining_seconds(60_000, 0), 60);
        assert_eq!(remaining_seconds(60_000, 59_001), 1);
        assert_eq!(remaining_seconds(60_000, 59_999), 1);
        assert_eq!(remaining_seconds(60_000, 60_000), 0);
        assert_eq!(remaining_seconds(60_000, 99_000), 0);
    }

    #[test]
    fn test_turn_bounds() {
        let (start, end) = turn_bounds(1_000, 60);
        assert_eq!(start, 1_000);
        assert_eq!(end, 61_000);
    }

    #[test]
    fn test_time_up() {
        let game = active_game(&["Alice", "Bob"]);
        assert_eq!(end_condition(&game, 30_000), None);
        assert_eq!(end_condition(&game, 60_000), Some(EndReason::TimeUp));
        assert_eq!(end_condition(&game, 90_000), Some(EndReason::TimeUp));
    }

    #[test]
    fn test_all_guessed_ends_early() {
        let mut game = active_game(&["Alice", "Bob", "Carol"]);
        let guesses = vec![correct_guess_by(&game, 1, 1), correct_guess_by(&game, 2, 2)];
        if let GameStage::Playing { round } = &mut game.stage {
            round.guesses = guesses;
        }
        assert_eq!(end_condition(&game, 10_000), Some(EndReason::AllGuessed));
    }

    #[test]
    fn test_partial_correct_does_not_end() {
        let mut game = active_game(&["Alice", "Bob", "Carol"]);
        let guesses = vec![correct_guess_by(&game, 1, 1)];
        if let GameStage::Playing { round } = &mut game.stage {
            round.guesses = guesses;
        }
        assert_eq!(end_condition(&game, 10_000), None);
    }

    #[test]
    fn test_disconnected_guessers_do_not_block_all_guessed() {
        let mut game = active_game(&["Alice", "Bob", "Carol"]);
        game.players[2].is_connected = false;
        let guesses = vec![correct_guess_by(&game, 1, 1)];
        if let GameStage::Playing { round } = &mut game.stage {
            round.guesses = guesses;
        }
        assert_eq!(end_condition(&game, 10_000), Some(EndReason::AllGuessed));
    }

    #[test]
    fn test_no_guessers_waits_for_clock() {
        let mut game = active_game(&["Alice", "Bob"]);
        game.players[1].is_connected = false;
        assert_eq!(end_condition(&game, 10_000), None);
        assert_eq!(end_condition(&game, 60_000), Some(EndReason::TimeUp));
    }

    #[test]
    fn test_inactive_round_never_ends() {
        let mut game = active_game(&["Alice", "Bob"]);
        if let GameStage::Playing { round } = &mut game.stage {
            round.phase = RoundPhase::Waiting;
        }
        assert_eq!(end_condition(&game, 90_000), None);
    }
}
