pub mod errors;
pub mod game;
pub mod player;
pub mod update;
pub mod views;

// Re-export all types
pub use errors::*;
pub use game::*;
pub use player::*;
pub use update::*;
pub use views::*;
