use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::Card;
use crate::error::GameError;
use crate::pile::DrawPile;

/// Result of a hand mutation with respect to the "down to one card" alert.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum HandSignal {
    Quiet,
    DownToOne,
}

impl HandSignal {
    fn after_change(len_before: usize, len_after: usize) -> Self {
        if len_before != 1 && len_after == 1 {
            HandSignal::DownToOne
        } else {
            HandSignal::Quiet
        }
    }

    pub fn is_down_to_one(self) -> bool {
        matches!(self, HandSignal::DownToOne)
    }
}

/// A seated player and their hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    hand: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Vec::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn len(&self) -> usize {
        self.hand.len()
    }

    /// An empty hand wins the game.
    pub fn is_empty(&self) -> bool {
        self.hand.is_empty()
    }

    pub fn draw_from(&mut self, pile: &mut DrawPile) -> Result<HandSignal, GameError> {
        let card = pile.draw_one()?;
        Ok(self.receive(card))
    }

    pub fn receive(&mut self, card: Card) -> HandSignal {
        let before = self.hand.len();
        self.hand.push(card);
        HandSignal::after_change(before, self.hand.len())
    }

    pub fn remove_at(
        &mut self,
        index: usize,
        suppress_signal: bool,
    ) -> Result<(Card, HandSignal), GameError> {
        let before = self.hand.len();
        if index >= before {
            return Err(GameError::OutOfRange { index, len: before });
        }
        let card = self.hand.remove(index);
        let signal = if suppress_signal {
            HandSignal::Quiet
        } else {
            HandSignal::after_change(before, self.hand.len())
        };
        Ok((card, signal))
    }

    /// Explicit re-check used after a suppressed removal.
    pub fn one_card_signal(&self) -> HandSignal {
        if self.hand.len() == 1 {
            HandSignal::DownToOne
        } else {
            HandSignal::Quiet
        }
    }
}
