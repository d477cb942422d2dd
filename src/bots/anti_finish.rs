use crate::bot::Bot;
use crate::card::{Card, PENALTY_RANK, REVERSE_RANK, Rank, SKIP_RANK, Suit, WILD_RANK};
use crate::state::GameSnapshot;

/// Order in which disruptive ranks are tried when the next player is one
/// card away from winning.
const DISRUPTION_ORDER: [Rank; 4] = [PENALTY_RANK, SKIP_RANK, WILD_RANK, REVERSE_RANK];

/// Wraps another bot and, while the next player holds a single card, plays
/// the most disruptive legal card instead. Otherwise defers to `inner`.
pub struct AntiFinishBot<B> {
    inner: B,
}

impl<B: Bot> AntiFinishBot<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: Bot> Bot for AntiFinishBot<B> {
    fn name(&self) -> String {
        format!("{}+AntiFinish", self.inner.name())
    }

    fn choose_index(&mut self, snapshot: &GameSnapshot, hand: &[Card]) -> Option<usize> {
        if snapshot.legal_indexes.is_empty() {
            return None;
        }
        if snapshot.threat_next {
            for rank in DISRUPTION_ORDER {
                let found = snapshot
                    .legal_indexes
                    .iter()
                    .copied()
                    .find(|&index| hand.get(index).is_some_and(|card| card.rank == rank));
                if found.is_some() {
                    return found;
                }
            }
        }
        self.inner.choose_index(snapshot, hand)
    }

    fn choose_color(&mut self, snapshot: &GameSnapshot, hand: &[Card]) -> Option<Suit> {
        self.inner.choose_color(snapshot, hand)
    }
}
