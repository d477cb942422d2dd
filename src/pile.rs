//! Draw and discard piles. In both, the top card is the last element.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::card::Card;
use crate::error::GameError;

/// Permutation strategy consumed when (re)loading the draw pile.
pub trait Shuffler {
    fn shuffle(&mut self, cards: Vec<Card>) -> Vec<Card>;
}

impl<F> Shuffler for F
where
    F: FnMut(Vec<Card>) -> Vec<Card>,
{
    fn shuffle(&mut self, cards: Vec<Card>) -> Vec<Card> {
        self(cards)
    }
}

/// Fisher-Yates shuffling backed by any `rand` generator.
pub struct RngShuffler<R: Rng> {
    rng: R,
}

impl<R: Rng> RngShuffler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Shuffler for RngShuffler<R> {
    fn shuffle(&mut self, mut cards: Vec<Card>) -> Vec<Card> {
        cards.shuffle(&mut self.rng);
        cards
    }
}

/// Face-down pile players draw from.
#[derive(Clone, Debug, Default)]
pub struct DrawPile {
    cards: Vec<Card>,
}

impl DrawPile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the (empty) pile with `shuffler`'s permutation of `cards`.
    pub fn load(&mut self, cards: Vec<Card>, shuffler: &mut dyn Shuffler) -> Result<(), GameError> {
        if !self.cards.is_empty() {
            return Err(GameError::InvalidState(
                "draw pile must be empty before loading",
            ));
        }
        self.cards = shuffler.shuffle(cards);
        Ok(())
    }

    pub fn draw_one(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::Underflow)
    }

    /// Draws up to `n` cards, top first. Returns fewer when the pile runs out.
    pub fn draw_up_to(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if n == 0 {
            return Err(GameError::InvalidArgument("draw count must be positive"));
        }
        let take = n.min(self.cards.len());
        let split = self.cards.len() - take;
        let mut drawn = self.cards.split_off(split);
        drawn.reverse();
        Ok(drawn)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// Face-up pile; its top card is the reference for legal plays.
#[derive(Clone, Debug, Default)]
pub struct DiscardPile {
    cards: Vec<Card>,
}

impl DiscardPile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn peek_top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    /// Removes every card except the top one, keeping bottom-to-top order.
    /// Leaves the pile untouched when it holds one card or fewer.
    pub fn take_all_but_top(&mut self) -> Vec<Card> {
        if self.cards.len() <= 1 {
            return Vec::new();
        }
        let top = self.cards.split_off(self.cards.len() - 1);
        std::mem::replace(&mut self.cards, top)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
