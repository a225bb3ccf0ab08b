use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::*;

/// Outcome of a flip attempt.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FlipOutcome {
    NoChange,
    Flipped,
    /// Two cards are now face-up; the pair must be resolved next.
    PairReady,
}

impl FlipOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use FlipOutcome::*;
        match self {
            NoChange => false,
            Flipped => true,
            PairReady => true,
        }
    }
}

/// Outcome of resolving a face-up pair.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PairOutcome {
    Matched,
    Mismatched,
    /// The matched pair was the last one.
    Won,
}

impl PairOutcome {
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Matched | Self::Won)
    }
}

/// Pair-matching state machine over one shuffled deck.
///
/// Flip attempts that are user error (finished game, card already up, two
/// cards pending resolution) report [`FlipOutcome::NoChange`]; caller bugs
/// (unknown id, resolving without a ready pair) are hard errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEngine {
    cards: Vec<Card>,
    face_up: SmallVec<[CardId; 2]>,
    move_count: u32,
    match_count: CardCount,
    pair_count: CardCount,
    complete: bool,
}

impl MatchEngine {
    pub fn new(cards: Vec<Card>) -> Result<Self> {
        let pair_count = Self::validate_deck(&cards)?;
        Ok(Self {
            cards,
            face_up: SmallVec::new(),
            move_count: 0,
            match_count: 0,
            pair_count,
            complete: false,
        })
    }

    /// A deck is playable when ids are unique and every symbol forms exactly
    /// one pair.
    fn validate_deck(cards: &[Card]) -> Result<CardCount> {
        if cards.is_empty() || cards.len() % 2 != 0 {
            return Err(GameError::UnpairedDeck);
        }

        let mut symbol_counts: BTreeMap<Symbol, usize> = BTreeMap::new();
        for card in cards {
            *symbol_counts.entry(card.symbol).or_default() += 1;
        }
        if symbol_counts.values().any(|&count| count != 2) {
            return Err(GameError::UnpairedDeck);
        }

        let mut ids: Vec<CardId> = cards.iter().map(|card| card.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != cards.len() {
            return Err(GameError::UnpairedDeck);
        }

        Ok((cards.len() / 2) as CardCount)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn face_up(&self) -> &[CardId] {
        &self.face_up
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn match_count(&self) -> CardCount {
        self.match_count
    }

    pub fn pair_count(&self) -> CardCount {
        self.pair_count
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether a pair is face-up and waiting for [`Self::resolve_pair`].
    pub fn pair_ready(&self) -> bool {
        self.face_up.len() == 2
    }

    fn card_index(&self, id: CardId) -> Result<usize> {
        self.cards
            .iter()
            .position(|card| card.id == id)
            .ok_or(GameError::UnknownCard)
    }

    /// Turn a card face-up. The second concurrent flip counts as a move and
    /// reports [`FlipOutcome::PairReady`]; no third flip is accepted until
    /// the pair is resolved.
    pub fn flip(&mut self, id: CardId) -> Result<FlipOutcome> {
        use FlipOutcome::*;

        let index = self.card_index(id)?;

        if self.complete || self.pair_ready() {
            return Ok(NoChange);
        }
        if self.cards[index].face != CardFace::Down {
            return Ok(NoChange);
        }

        self.cards[index].face = CardFace::Up;
        self.face_up.push(id);
        log::debug!("flipped card {} ({})", id, self.cards[index].symbol);

        if self.pair_ready() {
            self.move_count += 1;
            Ok(PairReady)
        } else {
            Ok(Flipped)
        }
    }

    /// Compare the two face-up cards: a match locks both in, a mismatch turns
    /// both back down. `face_up` is empty afterwards either way.
    pub fn resolve_pair(&mut self) -> Result<PairOutcome> {
        use PairOutcome::*;

        if !self.pair_ready() {
            return Err(GameError::PairNotReady);
        }

        let (first, second) = (self.face_up[0], self.face_up[1]);
        self.face_up.clear();
        let first_index = self.card_index(first)?;
        let second_index = self.card_index(second)?;

        if self.cards[first_index].symbol == self.cards[second_index].symbol {
            self.cards[first_index].face = CardFace::Matched;
            self.cards[second_index].face = CardFace::Matched;
            self.match_count += 1;
            log::debug!(
                "cards {} and {} matched ({}/{})",
                first,
                second,
                self.match_count,
                self.pair_count
            );

            if self.match_count == self.pair_count {
                self.complete = true;
                Ok(Won)
            } else {
                Ok(Matched)
            }
        } else {
            self.cards[first_index].face = CardFace::Down;
            self.cards[second_index].face = CardFace::Down;
            log::debug!("cards {} and {} did not match", first, second);
            Ok(Mismatched)
        }
    }
}
