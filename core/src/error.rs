use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No card with the requested id")]
    UnknownCard,
    #[error("Deck symbols do not form exact pairs")]
    UnpairedDeck,
    #[error("Exactly two cards must be face-up to resolve a pair")]
    PairNotReady,
    #[error("No game is in progress")]
    GameNotStarted,
}

pub type Result<T> = core::result::Result<T, GameError>;
