use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::game::{Game, GameStage, Guess, PlayerId, Round, RoundPhase};
use crate::player::Player;
use crate::views::TurnResult;

/// One intended transition against the shared game document.
///
/// Every client computes updates as a pure function of the latest snapshot
/// it observed, and the reducer in [`Game::apply`] merges them
/// conditionally: an operation naming a turn that has moved on, or a phase
/// the round is no longer in, collapses into a no-op. That is what lets
/// many unsynchronized writers race on the same document and still
/// converge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameUpdate {
    /// Join, or rejoin under the same id (reconnect).
    AddPlayer { player: Player },
    SetConnected {
        player_id: PlayerId,
        connected: bool,
    },
    /// Lobby → playing, with turn 1 already shaped.
    StartGame { round: Round },
    /// Waiting → active, written only by the explainer's client.
    StartTurn {
        number: u32,
        word: String,
        start_time: i64,
        end_time: i64,
    },
    SetClue { number: u32, clue: String },
    /// Full superset replacement of the guess list, never a blind append:
    /// the writer read the current list and extended it.
    SetGuesses { number: u32, guesses: Vec<Guess> },
    /// Watchdog reassignment of a stalled waiting turn.
    ReassignExplainer {
        number: u32,
        from: PlayerId,
        to: PlayerId,
    },
    /// Active → finished, carrying recomputed scores and the settlement
    /// report. `finishes_game` marks the last turn of the game.
    FinishTurn {
        number: u32,
        players: Vec<Player>,
        results: TurnResult,
        finishes_game: bool,
    },
    /// Finished turn → next waiting turn.
    AdvanceTurn { round: Round },
}

impl Game {
    /// Merge one update into the document. `Ok(true)` means the document
    /// changed (and `last_activity` was bumped to `now`); `Ok(false)`
    /// means the update was stale or redundant and was dropped; `Err`
    /// means it was invalid and must be surfaced to the caller.
    pub fn apply(&mut self, update: GameUpdate, now: i64) -> Result<bool, GameError> {
        let applied = self.apply_inner(update)?;
        if applied {
            self.last_activity = now;
        }
        Ok(applied)
    }

    fn apply_inner(&mut self, update: GameUpdate) -> Result<bool, GameError> {
        match update {
            GameUpdate::AddPlayer { player } => self.apply_add_player(player),
            GameUpdate::SetConnected {
                player_id,
                connected,
            } => {
                let Some(p) = self.players.iter_mut().find(|p| p.id == player_id) else {
                    return Err(GameError::PlayerNotFound);
                };
                if p.is_connected == connected {
                    return Ok(false);
                }
                p.is_connected = connected;
                Ok(true)
            }
            GameUpdate::StartGame { round } => {
                if !matches!(self.stage, GameStage::Lobby) {
                    return Ok(false);
                }
                self.stage = GameStage::Playing { round };
                Ok(true)
            }
            GameUpdate::StartTurn {
                number,
                word,
                start_time,
                end_time,
            } => {
                let Some(round) = self.playing_round_mut(number) else {
                    return Ok(false);
                };
                if !matches!(round.phase, RoundPhase::Waiting) {
                    return Ok(false);
                }
                round.phase = RoundPhase::Active {
                    word,
                    start_time,
                    end_time,
                };
                Ok(true)
            }
            GameUpdate::SetClue { number, clue } => {
                let Some(round) = self.playing_round_mut(number) else {
                    return Ok(false);
                };
                if !round.is_active() || round.clue == clue {
                    return Ok(false);
                }
                round.clue = clue;
                Ok(true)
            }
            GameUpdate::SetGuesses { number, guesses } => {
                let Some(round) = self.playing_round_mut(number) else {
                    return Ok(false);
                };
                // Only ever grow the list; a shorter write lost the race
                // against a newer superset.
                if !round.is_active() || guesses.len() <= round.guesses.len() {
                    return Ok(false);
                }
                round.guesses = guesses;
                Ok(true)
            }
            GameUpdate::ReassignExplainer { number, from, to } => {
                if self.player(to).is_none() {
                    return Err(GameError::PlayerNotFound);
                }
                let Some(round) = self.playing_round_mut(number) else {
                    return Ok(false);
                };
                if !matches!(round.phase, RoundPhase::Waiting) || round.explainer_id != from {
                    return Ok(false);
                }
                round.explainer_id = to;
                Ok(true)
            }
            GameUpdate::FinishTurn {
                number,
                players,
                results,
                finishes_game,
            } => {
                let Some(round) = self.playing_round_mut(number) else {
                    return Ok(false);
                };
                let word = match &round.phase {
                    RoundPhase::Active { word, .. } => word.clone(),
                    _ => return Ok(false),
                };
                round.phase = RoundPhase::Finished { word, results };
                let round = round.clone();
                self.players = players;
                if finishes_game {
                    self.stage = GameStage::Finished { round };
                }
                Ok(true)
            }
            GameUpdate::AdvanceTurn { round: next } => {
                let GameStage::Playing { round } = &mut self.stage else {
                    return Ok(false);
                };
                if !matches!(round.phase, RoundPhase::Finished { .. })
                    || next.number != round.number + 1
                {
                    return Ok(false);
                }
                *round = next;
                Ok(true)
            }
        }
    }

    fn apply_add_player(&mut self, player: Player) -> Result<bool, GameError> {
        if let Some(existing) = self.players.iter_mut().find(|p| p.id == player.id) {
            // Rejoin under the same id.
            if existing.is_connected {
                return Ok(false);
            }
            existing.is_connected = true;
            return Ok(true);
        }
        if !matches!(self.stage, GameStage::Lobby) {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() >= self.settings.max_players {
            return Err(GameError::RoomFull);
        }
        if self.player_by_name(&player.name).is_some() {
            return Err(GameError::DuplicateName { name: player.name });
        }
        self.players.push(player);
        Ok(true)
    }

    fn playing_round_mut(&mut self, number: u32) -> Option<&mut Round> {
        match &mut self.stage {
            GameStage::Playing { round } if round.number == number => Some(round),
            _ => None,
        }
    }
}
