use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::errors::GameError;
use crate::player::Player;
use crate::views::TurnResult;

pub type PlayerId = Uuid;

const CODE_LEN: usize = 6;
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Six-character room code, uppercase alphanumeric. Doubles as the
/// document key in the replicated store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameCode(String);

impl GameCode {
    pub fn parse(code: &str) -> Result<Self, GameError> {
        let code = code.trim().to_uppercase();
        if code.len() != CODE_LEN || !code.bytes().all(|b| CODE_CHARSET.contains(&b)) {
            return Err(GameError::InvalidCode);
        }
        Ok(Self(code))
    }

    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..CODE_LEN)
            .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Immutable after game creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSettings {
    pub max_players: usize,
    pub round_seconds: u32,
    pub total_rounds: u32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Guess {
    pub player_id: PlayerId,
    pub player_name: String,
    pub text: String,
    /// Computed once at submission time, never re-evaluated.
    pub is_correct: bool,
    /// Epoch millis.
    pub timestamp: i64,
    /// 1-based rank among correct guesses this turn, 0 if incorrect.
    pub order: u32,
    /// Whole seconds left in the round at submission.
    pub time_remaining: u32,
}

/// Lifecycle of the single live round. Each variant carries only the
/// fields meaningful in that phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundPhase {
    Waiting,
    Active {
        word: String,
        /// Epoch millis. Remaining time is always re-derived from these
        /// bounds so reloaded clients reconstruct the same deadline.
        start_time: i64,
        end_time: i64,
    },
    Finished {
        word: String,
        results: TurnResult,
    },
}

/// One explainer's turn. A user-facing "round" spans all players once;
/// `number` counts turns across the whole game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Round {
    pub number: u32,
    pub explainer_id: PlayerId,
    pub clue: String,
    pub guesses: Vec<Guess>,
    pub phase: RoundPhase,
}

impl Round {
    pub fn waiting(number: u32, explainer_id: PlayerId) -> Self {
        Self {
            number,
            explainer_id,
            clue: String::new(),
            guesses: Vec::new(),
            phase: RoundPhase::Waiting,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, RoundPhase::Active { .. })
    }

    pub fn word(&self) -> Option<&str> {
        match &self.phase {
            RoundPhase::Waiting => None,
            RoundPhase::Active { word, .. } | RoundPhase::Finished { word, .. } => Some(word),
        }
    }

    /// Correct guesses in submission order.
    pub fn correct_guesses(&self) -> impl Iterator<Item = &Guess> {
        self.guesses.iter().filter(|g| g.is_correct)
    }

    pub fn has_correct_guess(&self, player_id: PlayerId) -> bool {
        self.guesses
            .iter()
            .any(|g| g.is_correct && g.player_id == player_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameStage {
    Lobby,
    Playing { round: Round },
    Finished { round: Round },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Game {
    pub code: GameCode,
    pub players: Vec<Player>,
    pub settings: GameSettings,
    pub stage: GameStage,
    /// Epoch millis of the last applied update. Consumed by external
    /// cleanup policy only, never by the engine.
    pub last_activity: i64,
}

impl Game {
    /// A fresh lobby with the creating player as host.
    pub fn new(code: GameCode, host: Player, settings: GameSettings, now: i64) -> Self {
        Self {
            code,
            players: vec![host],
            settings,
            stage: GameStage::Lobby,
            last_activity: now,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    /// Connected players in join order; rotation and display both rely on
    /// this ordering.
    pub fn connected_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_connected)
    }

    pub fn round(&self) -> Option<&Round> {
        match &self.stage {
            GameStage::Lobby => None,
            GameStage::Playing { round } | GameStage::Finished { round } => Some(round),
        }
    }

    pub fn total_turns(&self) -> u32 {
        self.settings.total_rounds * self.players.len() as u32
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.stage, GameStage::Finished { .. })
    }
}
