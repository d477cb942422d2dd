use crate::bot::Bot;
use crate::card::{Card, Suit};
use crate::state::GameSnapshot;

/// Baseline bot: plays the first legal card and has no color preference.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstValidBot;

impl FirstValidBot {
    pub fn new() -> Self {
        Self
    }
}

impl Bot for FirstValidBot {
    fn name(&self) -> String {
        String::from("FirstValid")
    }

    fn choose_index(&mut self, snapshot: &GameSnapshot, _hand: &[Card]) -> Option<usize> {
        snapshot.legal_indexes.first().copied()
    }

    fn choose_color(&mut self, _snapshot: &GameSnapshot, _hand: &[Card]) -> Option<Suit> {
        None
    }
}
