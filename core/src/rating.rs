use core::fmt;
use serde::{Deserialize, Serialize};

/// Star rating awarded at the end of a game, derived from the move count.
///
/// The thresholds deliberately skip a four-star tier: 20 moves or fewer earn
/// five stars, 21 to 30 earn three, anything above earns two.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    stars: u8,
}

impl Rating {
    pub fn from_moves(move_count: u32) -> Self {
        let stars = if move_count > 30 {
            2
        } else if move_count > 20 {
            3
        } else {
            5
        };
        Self { stars }
    }

    pub const fn stars(self) -> u8 {
        self.stars
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.stars {
            write!(f, "⭐")?;
        }
        Ok(())
    }
}
