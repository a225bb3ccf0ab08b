use serde::{Deserialize, Serialize};

use crate::*;

/// Delay before a face-up pair is compared, so the player can see the second
/// card before it flips back or locks in.
pub const RESOLVE_DELAY_MS: u32 = 1_000;

/// Lifetime of transient status messages while a game is active.
pub const STATUS_CLEAR_MS: u32 = 2_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Info,
    Success,
    Error,
    Complete,
}

impl StatusKind {
    pub const fn css_class(self) -> &'static str {
        use StatusKind::*;
        match self {
            Info => "info",
            Success => "success",
            Error => "error",
            Complete => "complete",
        }
    }
}

/// One notification on the message surface. Everything except `Complete` is
/// transient and auto-cleared by the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind != StatusKind::Complete
    }

    pub(crate) fn start_prompt() -> Self {
        Self::new(StatusKind::Info, "👋 Click \"Start Game\" to begin!")
    }

    pub(crate) fn game_started(difficulty: Difficulty) -> Self {
        Self::new(
            StatusKind::Info,
            format!("🎮 {} MODE - Find all pairs!", difficulty.label()),
        )
    }

    pub(crate) fn match_found(found: CardCount, total: CardCount) -> Self {
        Self::new(
            StatusKind::Success,
            format!("✨ Match found! ({}/{})", found, total),
        )
    }

    pub(crate) fn mismatch() -> Self {
        Self::new(StatusKind::Error, "❌ No match! Try again.")
    }

    pub(crate) fn game_won(rating: Rating, move_count: u32, elapsed_secs: u32) -> Self {
        Self::new(
            StatusKind::Complete,
            format!(
                "🎉 YOU WON! {}\n{} moves in {}s",
                rating, move_count, elapsed_secs
            ),
        )
    }
}
