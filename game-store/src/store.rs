use async_trait::async_trait;
use game_types::{Game, GameCode, GameUpdate};
use tokio::sync::watch;

use crate::error::StoreError;

/// A live view of one game document.
///
/// Holds the latest snapshot only. A subscriber that lags sees the
/// newest state and may skip intermediates, but never observes writes
/// out of order and never misses the final state. `None` means the
/// document was deleted.
pub struct GameSubscription {
    rx: watch::Receiver<Option<Game>>,
}

impl GameSubscription {
    pub(crate) fn new(rx: watch::Receiver<Option<Game>>) -> Self {
        Self { rx }
    }

    /// The snapshot as of the last observed change. Available
    /// immediately after subscribing, before any `changed()` call.
    pub fn current(&self) -> Option<Game> {
        self.rx.borrow().clone()
    }

    /// Wait for the next change, then return the new snapshot.
    /// `Err(Closed)` once the document's writer side is gone.
    pub async fn changed(&mut self) -> Result<Option<Game>, StoreError> {
        self.rx
            .changed()
            .await
            .map_err(|_| StoreError::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

/// The shared game document store every participating client talks to.
///
/// Writes go through the document's own transition rules: `write`
/// applies an update atomically against the latest state, so two
/// clients racing the same conditional transition settle first-writer-
/// wins and the loser's write degrades to a no-op.
#[async_trait]
pub trait ReplicatedStore: Send + Sync {
    /// Insert a fresh game document under its code.
    async fn create(&self, game: Game) -> Result<(), StoreError>;

    /// One-shot read of the latest snapshot.
    async fn read(&self, code: &GameCode) -> Result<Game, StoreError>;

    /// Apply an update to the latest state. `Ok(true)` if the document
    /// changed, `Ok(false)` if the update was stale and collapsed to a
    /// no-op, `Err(Rejected)` if the document's rules refused it.
    async fn write(
        &self,
        code: &GameCode,
        update: GameUpdate,
        now: i64,
    ) -> Result<bool, StoreError>;

    /// Open a live subscription to the document.
    async fn subscribe(&self, code: &GameCode) -> Result<GameSubscription, StoreError>;

    /// Remove the document. Subscribers observe a final `None`.
    async fn delete(&self, code: &GameCode) -> Result<(), StoreError>;
}
