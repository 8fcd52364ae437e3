use std::sync::Arc;
use std::time::Duration;

use game_core::{
    build_guess, end_condition, next_explainer, now_millis, remaining_seconds, settle_turn,
    turn_bounds, validate_clue, HintSchedule,
};
use game_store::{ReplicatedStore, StoreError, WordSource};
use game_types::{
    Game, GameCode, GameError, GameSettings, GameStage, GameUpdate, GuessOutcome, Player,
    PlayerId, Round, RoundPhase, RoundView, TurnResult,
};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cleanup;
use crate::clue::ClueEditor;
use crate::config::EngineConfig;
use crate::events::EngineEvent;

pub const MIN_PLAYERS: usize = 2;

const GUESS_WRITE_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-turn local guards. The reducer already makes duplicate writes
/// harmless; these just keep one client from spamming the same intent
/// on every wakeup.
#[derive(Default)]
struct TurnGuards {
    /// Turn this client has written `StartTurn` for.
    started_turn: Option<u32>,
    /// Turn whose activation has been announced to the event stream.
    observed_turn: Option<u32>,
    /// Hints already emitted: (turn, count).
    hinted: Option<(u32, usize)>,
    /// Turn this client has written `FinishTurn` for.
    settled_turn: Option<u32>,
    /// Turn whose results have been announced.
    reported_turn: Option<u32>,
    /// Turn an advance task has been scheduled after.
    advance_for: Option<u32>,
    finished_reported: bool,
    /// Watchdog: (turn, since-millis) a waiting turn's explainer has
    /// been seen disconnected.
    waiting_since: Option<(u32, i64)>,
    advance_task: Option<JoinHandle<()>>,
    cleanup_task: Option<JoinHandle<()>>,
}

/// One participant's turn engine.
///
/// There is no referee process: every client runs one of these against
/// the shared game document. Each wakeup (a store change or the
/// one-second tick) re-reads the latest snapshot and re-derives what, if
/// anything, this client should do. All writes are conditional reducer
/// operations, so two engines deciding the same thing concurrently
/// converge with the first writer winning and the other collapsing into
/// a no-op.
pub struct TurnEngine {
    store: Arc<dyn ReplicatedStore>,
    words: Arc<dyn WordSource>,
    config: EngineConfig,
    code: GameCode,
    player_id: PlayerId,
    events: UnboundedSender<EngineEvent>,
    clue_editor: ClueEditor,
    guards: Mutex<TurnGuards>,
}

impl TurnEngine {
    pub fn new(
        store: Arc<dyn ReplicatedStore>,
        words: Arc<dyn WordSource>,
        config: EngineConfig,
        code: GameCode,
        player_id: PlayerId,
    ) -> (Arc<Self>, UnboundedReceiver<EngineEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let clue_editor = ClueEditor::new(
            store.clone(),
            code.clone(),
            Duration::from_millis(config.clue_debounce_ms),
        );
        let engine = Arc::new(Self {
            store,
            words,
            config,
            code,
            player_id,
            events,
            clue_editor,
            guards: Mutex::new(TurnGuards::default()),
        });
        (engine, receiver)
    }

    pub fn code(&self) -> &GameCode {
        &self.code
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Create a fresh lobby document. Returns the stored game; the
    /// caller's player id is its sole (host) player.
    pub async fn create_game(
        store: &dyn ReplicatedStore,
        host_name: &str,
        settings: GameSettings,
    ) -> Result<Game, EngineError> {
        let host = Player::new(host_name, true);
        let game = Game::new(GameCode::generate(), host, settings, now_millis());
        store.create(game.clone()).await?;
        info!(code = %game.code, "created game");
        Ok(game)
    }

    /// Join an existing lobby under a new name. Returns the updated game
    /// and the joining player's id.
    pub async fn join_game(
        store: &dyn ReplicatedStore,
        code: &GameCode,
        name: &str,
    ) -> Result<(Game, PlayerId), EngineError> {
        let player = Player::new(name, false);
        let player_id = player.id;
        store
            .write(code, GameUpdate::AddPlayer { player }, now_millis())
            .await?;
        let game = store.read(code).await?;
        info!(code = %code, player = name, "joined game");
        Ok((game, player_id))
    }

    /// Reconnect an existing player after a dropped session.
    pub async fn rejoin_game(
        store: &dyn ReplicatedStore,
        code: &GameCode,
        player_id: PlayerId,
    ) -> Result<Game, EngineError> {
        store
            .write(
                code,
                GameUpdate::SetConnected {
                    player_id,
                    connected: true,
                },
                now_millis(),
            )
            .await?;
        Ok(store.read(code).await?)
    }

    /// Drive the engine until the game document disappears.
    pub async fn run(self: Arc<Self>) -> Result<(), EngineError> {
        let mut sub = self.store.subscribe(&self.code).await?;
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut latest = match sub.current() {
            Some(game) => {
                let _ = self.events.send(EngineEvent::Snapshot { game: game.clone() });
                self.handle_snapshot(&game, false).await;
                game
            }
            None => {
                let _ = self.events.send(EngineEvent::GameDeleted);
                return Ok(());
            }
        };

        loop {
            tokio::select! {
                changed = sub.changed() => match changed {
                    Ok(Some(game)) => {
                        let _ = self.events.send(EngineEvent::Snapshot { game: game.clone() });
                        self.handle_snapshot(&game, false).await;
                        latest = game;
                    }
                    Ok(None) | Err(StoreError::Closed) => {
                        self.shutdown().await;
                        let _ = self.events.send(EngineEvent::GameDeleted);
                        return Ok(());
                    }
                    Err(e) => {
                        self.shutdown().await;
                        return Err(e.into());
                    }
                },
                // A tick re-derives intent from the newest version seen;
                // if a newer one exists the pending notification follows
                // immediately anyway.
                _ = tick.tick() => self.handle_snapshot(&latest, true).await,
            }
        }
    }

    /// Host only: lobby → playing with turn 1 waiting on the first
    /// player.
    pub async fn start_game(&self) -> Result<(), EngineError> {
        let game = self.store.read(&self.code).await?;
        let me = game.player(self.player_id).ok_or(GameError::PlayerNotFound)?;
        if !me.is_host {
            return Err(GameError::NotHost.into());
        }
        if !matches!(game.stage, GameStage::Lobby) {
            return Err(GameError::AlreadyStarted.into());
        }
        if game.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers { min: MIN_PLAYERS }.into());
        }

        let round = Round::waiting(1, game.players[0].id);
        self.store
            .write(&self.code, GameUpdate::StartGame { round }, now_millis())
            .await?;
        info!(code = %self.code, players = game.players.len(), "game started");
        Ok(())
    }

    /// Evaluate and record a guess against the latest snapshot. Wrong
    /// guesses are recorded too and may be retried without limit.
    pub async fn submit_guess(&self, text: &str) -> Result<GuessOutcome, EngineError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GameError::EmptyGuess.into());
        }

        let mut outcome = None;
        for attempt in 0..GUESS_WRITE_ATTEMPTS {
            let game = self.store.read(&self.code).await?;
            let me = game
                .player(self.player_id)
                .ok_or(GameError::PlayerNotFound)?
                .clone();
            let round = game.round().ok_or(GameError::RoundNotActive)?;
            let RoundPhase::Active { word, end_time, .. } = &round.phase else {
                return Err(GameError::RoundNotActive.into());
            };
            if round.explainer_id == self.player_id {
                return Err(GameError::ExplainerCannotGuess.into());
            }
            if round.has_correct_guess(self.player_id) {
                return Err(GameError::AlreadyGuessed.into());
            }

            let now = now_millis();
            let guess = build_guess(
                &me,
                text,
                word,
                round,
                now,
                remaining_seconds(*end_time, now),
            );
            let outcome = *outcome.get_or_insert(GuessOutcome {
                is_correct: guess.is_correct,
            });

            // Superset write: the list this snapshot showed, extended.
            // Losing the race means someone else appended first; re-read
            // and stack on top of their list.
            let mut guesses = round.guesses.clone();
            guesses.push(guess);
            let applied = self
                .store
                .write(
                    &self.code,
                    GameUpdate::SetGuesses {
                        number: round.number,
                        guesses,
                    },
                    now,
                )
                .await?;
            if applied {
                return Ok(outcome);
            }
            debug!(attempt, "guess write lost a race, retrying");
        }

        warn!(code = %self.code, "guess dropped after repeated write races");
        Ok(outcome.unwrap_or(GuessOutcome { is_correct: false }))
    }

    /// Explainer only: validate the clue and queue the debounced write.
    pub async fn update_clue(&self, text: &str) -> Result<(), EngineError> {
        let game = self.store.read(&self.code).await?;
        let round = game.round().ok_or(GameError::RoundNotActive)?;
        let RoundPhase::Active { word, .. } = &round.phase else {
            return Err(GameError::RoundNotActive.into());
        };
        if round.explainer_id != self.player_id {
            return Err(GameError::NotExplainer.into());
        }
        validate_clue(text, word).map_err(GameError::InvalidClue)?;

        self.clue_editor.schedule(round.number, text.to_string()).await;
        Ok(())
    }

    /// Flag this player disconnected. A host leaving a finished game
    /// tears the document down immediately instead.
    pub async fn leave(&self) -> Result<(), EngineError> {
        self.shutdown().await;

        let game = self.store.read(&self.code).await?;
        let is_host = game.player(self.player_id).is_some_and(|p| p.is_host);
        if is_host && game.is_finished() {
            cleanup::delete_now(self.store.as_ref(), &self.code).await;
            return Ok(());
        }

        self.store
            .write(
                &self.code,
                GameUpdate::SetConnected {
                    player_id: self.player_id,
                    connected: false,
                },
                now_millis(),
            )
            .await?;
        Ok(())
    }

    async fn shutdown(&self) {
        self.clue_editor.cancel().await;
        let mut guards = self.guards.lock().await;
        if let Some(task) = guards.advance_task.take() {
            task.abort();
        }
        if let Some(task) = guards.cleanup_task.take() {
            task.abort();
        }
    }

    async fn handle_snapshot(&self, game: &Game, is_tick: bool) {
        let now = now_millis();
        let mut guards = self.guards.lock().await;
        match &game.stage {
            GameStage::Lobby => {}
            GameStage::Playing { round } => match &round.phase {
                RoundPhase::Waiting => {
                    self.handle_waiting(game, round, now, &mut guards).await;
                }
                RoundPhase::Active {
                    word,
                    start_time,
                    end_time,
                } => {
                    self.handle_active(
                        game, round, word, *start_time, *end_time, now, is_tick, &mut guards,
                    )
                    .await;
                }
                RoundPhase::Finished { results, .. } => {
                    self.handle_turn_finished(game, round, results, &mut guards);
                }
            },
            GameStage::Finished { round } => {
                if guards.finished_reported {
                    return;
                }
                guards.finished_reported = true;
                if let RoundPhase::Finished { results, .. } = &round.phase {
                    if guards.reported_turn != Some(round.number) {
                        guards.reported_turn = Some(round.number);
                        let _ = self.events.send(EngineEvent::TurnEnded {
                            results: results.clone(),
                        });
                    }
                }
                info!(code = %self.code, "game finished");
                let _ = self.events.send(EngineEvent::GameFinished {
                    players: game.players.clone(),
                });
                if game.player(self.player_id).is_some_and(|p| p.is_host) {
                    guards.cleanup_task = Some(cleanup::spawn_finished_cleanup(
                        self.store.clone(),
                        self.code.clone(),
                        Duration::from_secs(self.config.finished_grace_seconds),
                    ));
                }
            }
        }
    }

    async fn handle_waiting(
        &self,
        game: &Game,
        round: &Round,
        now: i64,
        guards: &mut TurnGuards,
    ) {
        if round.explainer_id == self.player_id {
            if guards.started_turn == Some(round.number) {
                return;
            }
            guards.started_turn = Some(round.number);
            let word = match self.words.pick_word(game.settings.difficulty) {
                Ok(word) => word,
                Err(e) => {
                    warn!(code = %self.code, error = %e, "no word available");
                    guards.started_turn = None;
                    return;
                }
            };
            let (start_time, end_time) = turn_bounds(now, game.settings.round_seconds);
            let update = GameUpdate::StartTurn {
                number: round.number,
                word,
                start_time,
                end_time,
            };
            if let Err(e) = self.store.write(&self.code, update, now).await {
                warn!(code = %self.code, error = %e, "failed to activate turn");
                guards.started_turn = None;
            }
            return;
        }

        // Watchdog: a waiting turn whose explainer stays disconnected is
        // reassigned by whichever client notices first.
        let explainer_connected = game
            .player(round.explainer_id)
            .is_some_and(|p| p.is_connected);
        if explainer_connected {
            guards.waiting_since = None;
            return;
        }
        match guards.waiting_since {
            Some((number, since)) if number == round.number => {
                let deadline = since + self.config.explainer_watchdog_seconds as i64 * 1000;
                if now < deadline {
                    return;
                }
                let Some(next) = self.reassignment_target(game, round) else {
                    return;
                };
                warn!(
                    code = %self.code,
                    turn = round.number,
                    "explainer unresponsive, reassigning turn"
                );
                let update = GameUpdate::ReassignExplainer {
                    number: round.number,
                    from: round.explainer_id,
                    to: next,
                };
                if let Err(e) = self.store.write(&self.code, update, now).await {
                    warn!(code = %self.code, error = %e, "failed to reassign explainer");
                }
                guards.waiting_since = None;
            }
            _ => guards.waiting_since = Some((round.number, now)),
        }
    }

    /// Next connected player after the stalled explainer in join order.
    fn reassignment_target(&self, game: &Game, round: &Round) -> Option<PlayerId> {
        let start = game
            .players
            .iter()
            .position(|p| p.id == round.explainer_id)?;
        let count = game.players.len();
        (1..count)
            .map(|offset| &game.players[(start + offset) % count])
            .find(|p| p.is_connected)
            .map(|p| p.id)
    }

    #[allow(clippy::too_many_arguments)]
    async fn handle_active(
        &self,
        game: &Game,
        round: &Round,
        word: &str,
        start_time: i64,
        end_time: i64,
        now: i64,
        is_tick: bool,
        guards: &mut TurnGuards,
    ) {
        let number = round.number;
        if guards.observed_turn != Some(number) {
            guards.observed_turn = Some(number);
            guards.hinted = Some((number, 0));
            let am_explainer = round.explainer_id == self.player_id;
            info!(code = %self.code, turn = number, "turn active");
            let _ = self.events.send(EngineEvent::TurnStarted {
                number,
                explainer_id: round.explainer_id,
                word: am_explainer.then(|| word.to_string()),
                view: RoundView::new(
                    number,
                    game.players.len() as u32,
                    game.settings.total_rounds,
                ),
            });
        }

        let remaining = remaining_seconds(end_time, now);
        if is_tick {
            let _ = self.events.send(EngineEvent::Tick { number, remaining });
        }

        if remaining > 0 {
            let schedule = HintSchedule::new(word, start_time);
            let elapsed = ((now - start_time).max(0) / 1000) as u64;
            let due = schedule.due(elapsed);
            let emitted = match guards.hinted {
                Some((n, count)) if n == number => count,
                _ => 0,
            };
            if due > emitted {
                guards.hinted = Some((number, due));
                let _ = self.events.send(EngineEvent::HintRevealed {
                    number,
                    display: schedule.display(due),
                });
            }
        }

        if guards.settled_turn == Some(number) {
            return;
        }
        let Some(reason) = end_condition(game, now) else {
            return;
        };
        let Some(settlement) = settle_turn(game) else {
            return;
        };
        guards.settled_turn = Some(number);
        info!(code = %self.code, turn = number, ?reason, "turn over, settling");
        let update = GameUpdate::FinishTurn {
            number,
            players: settlement.players,
            results: settlement.results,
            finishes_game: settlement.finishes_game,
        };
        match self.store.write(&self.code, update, now).await {
            Ok(applied) => debug!(applied, turn = number, "settlement write"),
            Err(e) => {
                warn!(code = %self.code, error = %e, "failed to settle turn");
                guards.settled_turn = None;
            }
        }
    }

    fn handle_turn_finished(
        &self,
        game: &Game,
        round: &Round,
        results: &TurnResult,
        guards: &mut TurnGuards,
    ) {
        if guards.reported_turn != Some(round.number) {
            guards.reported_turn = Some(round.number);
            let _ = self.events.send(EngineEvent::TurnEnded {
                results: results.clone(),
            });
        }

        if guards.advance_for == Some(round.number) {
            return;
        }
        let next_number = round.number + 1;
        let Some(explainer) = next_explainer(&game.players, next_number) else {
            warn!(code = %self.code, turn = next_number, "nobody connected to explain");
            return;
        };
        guards.advance_for = Some(round.number);
        if let Some(task) = guards.advance_task.take() {
            task.abort();
        }

        let store = self.store.clone();
        let code = self.code.clone();
        let pause = Duration::from_secs(self.config.round_display_pause_seconds);
        guards.advance_task = Some(tokio::spawn(async move {
            tokio::time::sleep(pause).await;
            let next = Round::waiting(next_number, explainer);
            match store
                .write(&code, GameUpdate::AdvanceTurn { round: next }, now_millis())
                .await
            {
                Ok(true) => info!(code = %code, turn = next_number, "advanced to next turn"),
                Ok(false) => {}
                Err(e) => warn!(code = %code, error = %e, "failed to advance turn"),
            }
        }));
    }
}
