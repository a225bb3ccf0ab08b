//! Game-state core for a memory-matching card game: deck construction and
//! shuffling, the pair-matching engine, and the game controller that owns the
//! session, status surface, and timing. Presentation is someone else's job;
//! the controller never touches a clock or a render surface.

pub use card::*;
pub use controller::*;
pub use deck::*;
pub use engine::*;
pub use error::*;
pub use message::*;
pub use rating::*;
pub use types::*;

mod card;
mod controller;
mod deck;
mod engine;
mod error;
mod message;
mod rating;
mod types;
