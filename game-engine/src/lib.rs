pub mod cleanup;
pub mod clue;
pub mod config;
pub mod engine;
pub mod events;

pub use clue::ClueEditor;
pub use config::EngineConfig;
pub use engine::{EngineError, TurnEngine, MIN_PLAYERS};
pub use events::EngineEvent;
