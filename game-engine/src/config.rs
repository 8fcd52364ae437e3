use std::env;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long finished-turn results stay on screen before any client
    /// advances to the next turn.
    pub round_display_pause_seconds: u64,
    /// Quiet period before a clue edit is persisted.
    pub clue_debounce_ms: u64,
    /// How long a waiting turn tolerates a disconnected explainer before
    /// the turn is reassigned.
    pub explainer_watchdog_seconds: u64,
    /// How long a finished game lingers before the host's client deletes
    /// the document.
    pub finished_grace_seconds: u64,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            round_display_pause_seconds: env::var("ROUND_DISPLAY_PAUSE_SECONDS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .expect("Invalid ROUND_DISPLAY_PAUSE_SECONDS"),
            clue_debounce_ms: env::var("CLUE_DEBOUNCE_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("Invalid CLUE_DEBOUNCE_MS"),
            explainer_watchdog_seconds: env::var("EXPLAINER_WATCHDOG_SECONDS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("Invalid EXPLAINER_WATCHDOG_SECONDS"),
            finished_grace_seconds: env::var("FINISHED_GRACE_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("Invalid FINISHED_GRACE_SECONDS"),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
