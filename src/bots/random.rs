use rand::Rng;
use rand::seq::SliceRandom;

use crate::bot::Bot;
use crate::card::{Card, Suit};
use crate::state::GameSnapshot;

/// Baseline bot that samples uniformly from the legal cards and colors.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn name(&self) -> String {
        String::from("Random")
    }

    fn choose_index(&mut self, snapshot: &GameSnapshot, _hand: &[Card]) -> Option<usize> {
        snapshot.legal_indexes.choose(&mut self.rng).copied()
    }

    fn choose_color(&mut self, _snapshot: &GameSnapshot, _hand: &[Card]) -> Option<Suit> {
        Suit::ALL.choose(&mut self.rng).copied()
    }
}
