use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Why a clue was refused. Advisory: the explainer's client declines to
/// persist the clue and surfaces the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClueRejection {
    #[error("the clue contains the word")]
    ContainsWord,
    #[error("the clue spells out the word")]
    SpellsOut,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("game not found")]
    GameNotFound,
    #[error("invalid game code")]
    InvalidCode,
    #[error("room is full")]
    RoomFull,
    #[error("name \"{name}\" is already taken")]
    DuplicateName { name: String },
    #[error("player is not in this game")]
    PlayerNotFound,
    #[error("only the host can start the game")]
    NotHost,
    #[error("need at least {min} players to start")]
    NotEnoughPlayers { min: usize },
    #[error("game has already started")]
    AlreadyStarted,
    #[error("round is not active")]
    RoundNotActive,
    #[error("guess cannot be empty")]
    EmptyGuess,
    #[error("the explainer cannot guess")]
    ExplainerCannotGuess,
    #[error("only the explainer can set the clue")]
    NotExplainer,
    #[error("already guessed correctly this turn")]
    AlreadyGuessed,
    #[error("invalid clue: {0}")]
    InvalidClue(ClueRejection),
}
