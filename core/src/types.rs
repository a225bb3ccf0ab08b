use core::fmt;
use serde::{Deserialize, Serialize};

/// Identifier of a card, stable for the lifetime of one deck.
pub type CardId = u8;

/// Count type used for pair counts and total-card counts.
pub type CardCount = u8;

/// Monotonic counter identifying one game instance; delayed callbacks carry
/// the generation they were scheduled under and are ignored once it moves on.
pub type Generation = u64;

/// Opaque face value drawn from [`SYMBOL_PALETTE`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(pub char);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed palette; a deck takes the first `pair_count` entries.
pub const SYMBOL_PALETTE: [Symbol; 12] = [
    Symbol('🍎'),
    Symbol('🍊'),
    Symbol('🍋'),
    Symbol('🍌'),
    Symbol('🍉'),
    Symbol('🍇'),
    Symbol('🍓'),
    Symbol('🍒'),
    Symbol('🍑'),
    Symbol('🥝'),
    Symbol('🍍'),
    Symbol('🥭'),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Hard,
}

impl Difficulty {
    pub const fn pair_count(self) -> CardCount {
        match self {
            Self::Easy => 8,
            Self::Hard => 12,
        }
    }

    pub const fn card_count(self) -> CardCount {
        self.pair_count() * 2
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Hard => "HARD",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}
