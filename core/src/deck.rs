use crate::*;

pub trait DeckGenerator {
    fn generate(self, difficulty: Difficulty) -> Vec<Card>;
}

/// Builds a deck by duplicating the first `pair_count` palette symbols and
/// shuffling them with a seeded Fisher-Yates permutation. Ids are assigned by
/// final position, so equal seeds produce equal decks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShuffledDeck {
    seed: u64,
}

impl ShuffledDeck {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for ShuffledDeck {
    fn generate(self, difficulty: Difficulty) -> Vec<Card> {
        use rand::rngs::SmallRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let pairs = difficulty.pair_count() as usize;
        let mut symbols: Vec<Symbol> = SYMBOL_PALETTE[..pairs]
            .iter()
            .flat_map(|&symbol| [symbol, symbol])
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        symbols.shuffle(&mut rng);

        log::debug!(
            "generated {} deck of {} cards from seed {}",
            difficulty.label(),
            symbols.len(),
            self.seed
        );

        symbols
            .into_iter()
            .enumerate()
            .map(|(index, symbol)| Card::new(index as CardId, symbol))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn every_symbol_appears_exactly_twice() {
        for difficulty in [Difficulty::Easy, Difficulty::Hard] {
            let deck = ShuffledDeck::new(7).generate(difficulty);
            assert_eq!(deck.len(), difficulty.card_count() as usize);

            let mut counts: BTreeMap<Symbol, usize> = BTreeMap::new();
            for card in &deck {
                *counts.entry(card.symbol).or_default() += 1;
            }
            assert_eq!(counts.len(), difficulty.pair_count() as usize);
            assert!(counts.values().all(|&count| count == 2));
        }
    }

    #[test]
    fn ids_follow_board_positions_and_cards_start_face_down() {
        let deck = ShuffledDeck::new(3).generate(Difficulty::Easy);
        for (index, card) in deck.iter().enumerate() {
            assert_eq!(card.id as usize, index);
            assert_eq!(card.face, CardFace::Down);
        }
    }

    #[test]
    fn equal_seeds_reproduce_the_same_deck() {
        let a = ShuffledDeck::new(42).generate(Difficulty::Hard);
        let b = ShuffledDeck::new(42).generate(Difficulty::Hard);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_permute_the_deck() {
        let orders: Vec<Vec<Symbol>> = (0..16)
            .map(|seed| {
                ShuffledDeck::new(seed)
                    .generate(Difficulty::Hard)
                    .into_iter()
                    .map(|card| card.symbol)
                    .collect()
            })
            .collect();
        assert!(orders.windows(2).any(|pair| pair[0] != pair[1]));
    }
}
