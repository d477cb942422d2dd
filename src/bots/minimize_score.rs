use crate::bot::Bot;
use crate::card::{Card, Suit, majority_suit};
use crate::score::hand_points;
use crate::state::GameSnapshot;

/// Plays the legal card that leaves the fewest points in hand.
///
/// Ties go to the card worth more (dump the heavy card first), then to the
/// earlier legal index. Wild colors follow the majority suit of the hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimizeScoreBot;

impl MinimizeScoreBot {
    pub fn new() -> Self {
        Self
    }
}

impl Bot for MinimizeScoreBot {
    fn name(&self) -> String {
        String::from("MinimizeScore")
    }

    fn choose_index(&mut self, snapshot: &GameSnapshot, hand: &[Card]) -> Option<usize> {
        let total = hand_points(hand);
        let mut best: Option<(usize, u32, u32)> = None;
        for &index in &snapshot.legal_indexes {
            let Some(card) = hand.get(index) else {
                continue;
            };
            let removed = card.points();
            let remaining = total - removed;
            let better = match best {
                None => true,
                Some((_, best_remaining, best_removed)) => {
                    remaining < best_remaining
                        || (remaining == best_remaining && removed > best_removed)
                }
            };
            if better {
                best = Some((index, remaining, removed));
            }
        }
        best.map(|(index, _, _)| index)
    }

    fn choose_color(&mut self, _snapshot: &GameSnapshot, hand: &[Card]) -> Option<Suit> {
        majority_suit(hand)
    }
}
