use std::sync::Arc;
use std::time::Duration;

use game_store::ReplicatedStore;
use game_types::{GameCode, GameUpdate};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::warn;

/// Debounced persistence of the explainer's clue.
///
/// Each edit restarts the quiet period; only the value that survives it
/// is written. A pending write is cancelled by a newer edit, by
/// [`ClueEditor::cancel`], or when the editor is dropped.
pub struct ClueEditor {
    store: Arc<dyn ReplicatedStore>,
    code: GameCode,
    debounce: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ClueEditor {
    pub fn new(store: Arc<dyn ReplicatedStore>, code: GameCode, debounce: Duration) -> Self {
        Self {
            store,
            code,
            debounce,
            pending: Mutex::new(None),
        }
    }

    /// Queue `clue` for turn `number`, superseding any pending edit.
    pub async fn schedule(&self, number: u32, clue: String) {
        let store = self.store.clone();
        let code = self.code.clone();
        let debounce = self.debounce;

        let mut pending = self.pending.lock().await;
        if let Some(task) = pending.take() {
            task.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let now = game_core::now_millis();
            if let Err(e) = store
                .write(&code, GameUpdate::SetClue { number, clue }, now)
                .await
            {
                warn!(code = %code, error = %e, "failed to persist clue");
            }
        }));
    }

    pub async fn cancel(&self) {
        if let Some(task) = self.pending.lock().await.take() {
            task.abort();
        }
    }
}

impl Drop for ClueEditor {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.try_lock() {
            if let Some(task) = pending.take() {
                task.abort();
            }
        }
    }
}
