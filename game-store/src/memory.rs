use async_trait::async_trait;
use dashmap::DashMap;
use game_types::{Game, GameCode, GameUpdate};
use tokio::sync::watch;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{GameSubscription, ReplicatedStore};

/// In-process store backed by one watch channel per game document.
///
/// The DashMap entry lock serializes writers on a given code, so each
/// update is applied against the state left by the previous one. That
/// gives every document a total write order even though subscribers may
/// only sample it.
#[derive(Default)]
pub struct MemoryStore {
    games: DashMap<GameCode, watch::Sender<Option<Game>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[async_trait]
impl ReplicatedStore for MemoryStore {
    async fn create(&self, game: Game) -> Result<(), StoreError> {
        let code = game.code.clone();
        match self.games.entry(code.clone()) {
            dashmap::Entry::Occupied(_) => Err(StoreError::CodeTaken),
            dashmap::Entry::Vacant(entry) => {
                let (tx, _) = watch::channel(Some(game));
                entry.insert(tx);
                debug!(code = %code, "created game document");
                Ok(())
            }
        }
    }

    async fn read(&self, code: &GameCode) -> Result<Game, StoreError> {
        let entry = self.games.get(code).ok_or(StoreError::NotFound)?;
        entry.borrow().clone().ok_or(StoreError::Closed)
    }

    async fn write(
        &self,
        code: &GameCode,
        update: GameUpdate,
        now: i64,
    ) -> Result<bool, StoreError> {
        let entry = self.games.get(code).ok_or(StoreError::NotFound)?;

        let mut applied = Ok(false);
        entry.send_if_modified(|slot| {
            let Some(game) = slot.as_mut() else {
                applied = Err(StoreError::Closed);
                return false;
            };
            match game.apply(update, now) {
                Ok(changed) => {
                    applied = Ok(changed);
                    changed
                }
                Err(e) => {
                    applied = Err(StoreError::Rejected(e));
                    false
                }
            }
        });
        applied
    }

    async fn subscribe(&self, code: &GameCode) -> Result<GameSubscription, StoreError> {
        let entry = self.games.get(code).ok_or(StoreError::NotFound)?;
        Ok(GameSubscription::new(entry.subscribe()))
    }

    async fn delete(&self, code: &GameCode) -> Result<(), StoreError> {
        let (_, tx) = self.games.remove(code).ok_or(StoreError::NotFound)?;
        tx.send_replace(None);
        debug!(code = %code, "deleted game document");
        Ok(())
    }
}
