use std::sync::Arc;
use std::time::Duration;

use game_engine::{EngineConfig, EngineError, EngineEvent, TurnEngine};
use game_store::{BuiltinWords, MemoryStore, ReplicatedStore, WordSource};
use game_types::{Difficulty, Game, GameCode, GameSettings, PlayerId};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Short pauses so tests run in paused-clock virtual time.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        round_display_pause_seconds: 1,
        clue_debounce_ms: 50,
        explainer_watchdog_seconds: 2,
        finished_grace_seconds: 3600,
    }
}

pub fn test_settings(total_rounds: u32) -> GameSettings {
    GameSettings {
        max_players: 8,
        round_seconds: 60,
        total_rounds,
        difficulty: Difficulty::Easy,
    }
}

/// One simulated participant: their engine, its event stream, and the
/// spawned engine loop.
pub struct TestClient {
    pub engine: Arc<TurnEngine>,
    pub events: UnboundedReceiver<EngineEvent>,
    pub loop_task: JoinHandle<Result<(), EngineError>>,
    pub player_id: PlayerId,
    pub name: String,
}

/// A full table: shared in-process store plus one running engine per
/// player, the first being the host.
pub struct TestTable {
    pub store: Arc<MemoryStore>,
    pub code: GameCode,
    pub clients: Vec<TestClient>,
}

impl TestTable {
    pub fn host(&self) -> &TestClient {
        &self.clients[0]
    }

    pub fn client_for(&self, player_id: PlayerId) -> &TestClient {
        self.clients
            .iter()
            .find(|c| c.player_id == player_id)
            .expect("no client for player")
    }
}

pub async fn setup_table(names: &[&str], total_rounds: u32) -> TestTable {
    setup_table_with_config(names, total_rounds, test_config()).await
}

pub async fn setup_table_with_config(
    names: &[&str],
    total_rounds: u32,
    config: EngineConfig,
) -> TestTable {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let words: Arc<dyn WordSource> = Arc::new(BuiltinWords::new());

    let game = TurnEngine::create_game(store.as_ref(), names[0], test_settings(total_rounds))
        .await
        .expect("create game");
    let code = game.code.clone();
    let mut ids = vec![game.players[0].id];
    for name in &names[1..] {
        let (_, id) = TurnEngine::join_game(store.as_ref(), &code, name)
            .await
            .expect("join game");
        ids.push(id);
    }

    let mut clients = Vec::new();
    for (name, id) in names.iter().zip(ids) {
        let (engine, events) = TurnEngine::new(
            store.clone() as Arc<dyn ReplicatedStore>,
            words.clone(),
            config.clone(),
            code.clone(),
            id,
        );
        let loop_task = tokio::spawn(engine.clone().run());
        clients.push(TestClient {
            engine,
            events,
            loop_task,
            player_id: id,
            name: name.to_string(),
        });
    }

    TestTable {
        store,
        code,
        clients,
    }
}

/// Wait until the latest snapshot satisfies `pred`. Only use with
/// conditions that persist until the test reacts; intermediate versions
/// may be skipped.
pub async fn wait_for_game<F>(store: &MemoryStore, code: &GameCode, mut pred: F) -> Game
where
    F: FnMut(&Game) -> bool,
{
    let mut sub = store.subscribe(code).await.expect("subscribe");
    tokio::time::timeout(Duration::from_secs(300), async move {
        if let Some(game) = sub.current() {
            if pred(&game) {
                return game;
            }
        }
        loop {
            let game = sub
                .changed()
                .await
                .expect("subscription closed")
                .expect("game deleted while waiting");
            if pred(&game) {
                return game;
            }
        }
    })
    .await
    .expect("condition not reached in time")
}

/// Wait until the document is gone.
pub async fn wait_for_deletion(store: &MemoryStore, code: &GameCode) {
    let Ok(mut sub) = store.subscribe(code).await else {
        return;
    };
    tokio::time::timeout(Duration::from_secs(7200), async move {
        if sub.current().is_none() {
            return;
        }
        loop {
            match sub.changed().await {
                Ok(None) | Err(_) => return,
                Ok(Some(_)) => {}
            }
        }
    })
    .await
    .expect("game not deleted in time")
}
