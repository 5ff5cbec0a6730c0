use super::card::Card;

/// The 52-card deck, ordered by whatever permutation was handed to it
/// (see [`crate::rng::shuffle`]). Cards are dealt from the front.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    next: usize,
}

impl Deck {
    /// Build a deck from an explicit permutation of card indices 0..52,
    /// as produced by the provably-fair shuffle.
    pub fn from_permutation(order: &[u8]) -> Self {
        debug_assert_eq!(order.len(), 52);
        Deck {
            cards: order.iter().copied().map(Card::from).collect(),
            next: 0,
        }
    }

    pub fn draw(&mut self) -> Option<Card> {
        let card = self.cards.get(self.next).copied();
        if card.is_some() {
            self.next += 1;
        }
        card
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deals_in_permutation_order() {
        let order: Vec<u8> = (0..52).collect();
        let mut deck = Deck::from_permutation(&order);
        assert_eq!(deck.draw().unwrap().to_int(), 0);
        assert_eq!(deck.draw().unwrap().to_int(), 1);
        assert_eq!(deck.remaining(), 50);
    }
}
