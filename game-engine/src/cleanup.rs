use std::sync::Arc;
use std::time::Duration;

use game_store::{ReplicatedStore, StoreError};
use game_types::GameCode;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Let a finished game linger for the grace period, then delete it if it
/// is still there. Spawned by the host's client when it observes the
/// game finish; another client deleting first is fine.
pub fn spawn_finished_cleanup(
    store: Arc<dyn ReplicatedStore>,
    code: GameCode,
    grace: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        match store.read(&code).await {
            Ok(game) if game.is_finished() => {
                info!(code = %code, "grace period over, deleting finished game");
                delete_now(store.as_ref(), &code).await;
            }
            Ok(_) => {}
            Err(StoreError::NotFound) | Err(StoreError::Closed) => {}
            Err(e) => warn!(code = %code, error = %e, "cleanup read failed"),
        }
    })
}

/// Immediate teardown, used when the host exits a finished game.
pub async fn delete_now(store: &dyn ReplicatedStore, code: &GameCode) {
    match store.delete(code).await {
        Ok(()) => info!(code = %code, "game deleted"),
        Err(StoreError::NotFound) => {}
        Err(e) => warn!(code = %code, error = %e, "failed to delete game"),
    }
}
