use game_types::GameError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no game with that code")]
    NotFound,
    #[error("a game with that code already exists")]
    CodeTaken,
    #[error("the game document was deleted")]
    Closed,
    #[error(transparent)]
    Rejected(#[from] GameError),
    #[error("no words available for that difficulty")]
    NoWords,
}
