use game_types::{Game, Player, PlayerId, RoundView, TurnResult};

/// What the engine tells its presentation layer.
///
/// Delivered over an unbounded channel in emission order. Derived from
/// the latest observed snapshot, so a consumer that only reacts to these
/// events sees the same game every other client converges on.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A new document version was observed.
    Snapshot { game: Game },
    /// The current turn went active. `word` is populated only on the
    /// explainer's own client.
    TurnStarted {
        number: u32,
        explainer_id: PlayerId,
        word: Option<String>,
        view: RoundView,
    },
    /// A hint letter became due; `display` is the full masked word.
    HintRevealed { number: u32, display: String },
    /// Once-a-second countdown, re-derived from the authoritative bounds.
    Tick { number: u32, remaining: u32 },
    /// The turn settled; scores in `results` are already folded in.
    TurnEnded { results: TurnResult },
    /// The last turn settled and the game is over.
    GameFinished { players: Vec<Player> },
    /// The document is gone; this client's engine loop has terminated.
    GameDeleted,
}
