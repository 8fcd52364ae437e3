use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::game::PlayerId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    /// Unique case-insensitively within a game at join time.
    pub name: String,
    /// Monotonically non-decreasing.
    pub score: u32,
    /// Exactly one player per game, set at creation, never transferred.
    pub is_host: bool,
    pub is_connected: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, is_host: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            score: 0,
            is_host,
            is_connected: true,
        }
    }
}
