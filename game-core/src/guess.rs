use game_types::{Guess, Player, Round};

/// Case-insensitive, whitespace-trimmed exact equality. No partial
/// credit, no fuzzy matching.
pub fn is_correct_guess(guess: &str, word: &str) -> bool {
    guess.trim().to_lowercase() == word.trim().to_lowercase()
}

/// Stamp a submission into a guess record against the round snapshot the
/// submitter read: correctness is evaluated now and never again, and a
/// correct guess takes the next rank after the correct guesses already
/// recorded.
pub fn build_guess(
    player: &Player,
    text: &str,
    word: &str,
    round: &Round,
    timestamp: i64,
    time_remaining: u32,
) -> Guess {
    let is_correct = is_correct_guess(text, word);
    let order = if is_correct {
        round.correct_guesses().count() as u32 + 1
    } else {
        0
    };
    Guess {
        player_id: player.id,
        player_name: player.name.clone(),
        text: text.trim().to_string(),
        is_correct,
        timestamp,
        order,
        time_remaining,
    }
}
