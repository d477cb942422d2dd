use crate::card::{Card, Suit};
use crate::state::GameSnapshot;

/// Interface for defining custom bots.
///
/// Bots only see the snapshot and their own hand. Returning `None` lets the
/// engine fall back to its default choice.
pub trait Bot {
    fn name(&self) -> String;

    fn choose_index(&mut self, snapshot: &GameSnapshot, hand: &[Card]) -> Option<usize>;

    fn choose_color(&mut self, snapshot: &GameSnapshot, hand: &[Card]) -> Option<Suit>;
}

impl<B: Bot + ?Sized> Bot for Box<B> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn choose_index(&mut self, snapshot: &GameSnapshot, hand: &[Card]) -> Option<usize> {
        (**self).choose_index(snapshot, hand)
    }

    fn choose_color(&mut self, snapshot: &GameSnapshot, hand: &[Card]) -> Option<Suit> {
        (**self).choose_color(snapshot, hand)
    }
}
