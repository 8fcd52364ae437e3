pub mod clue;
pub mod guess;
pub mod hints;
pub mod rotation;
pub mod scoring;
pub mod turn;

pub use clue::validate_clue;
pub use guess::{build_guess, is_correct_guess};
pub use hints::{HintSchedule, HINT_OFFSETS, HINT_PLACEHOLDER};
pub use rotation::next_explainer;
pub use scoring::{explainer_points, guesser_points, settle_turn, TurnSettlement};
pub use turn::{end_condition, now_millis, remaining_seconds, turn_bounds, EndReason};
