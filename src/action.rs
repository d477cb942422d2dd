use serde::{Deserialize, Serialize};

use crate::card::{Card, Suit};
use crate::state::Direction;

/// Zero-based seat of a player at the board.
pub type PlayerId = usize;

/// Special effect applied right after a card lands on the discard pile.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// The following player's turn is skipped.
    SkipNext,
    /// Play direction flipped; holds the new direction.
    Reversed(Direction),
    /// Draw penalty increased; holds the accumulated total.
    Penalty { pending: u32 },
    /// Forced color set by a wild card.
    ForcedColor(Suit),
    /// No special effect; any forced color is cleared.
    Plain,
}

/// A successful play reported by the board.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub card: Card,
    pub effect: Effect,
}

/// Everything observable that happened during a game, in order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Dealt { hand_size: usize },
    FirstPlayer { player: PlayerId },
    Played { player: PlayerId, play: Play },
    Drew { player: PlayerId },
    PenaltyDrawn { player: PlayerId, count: u32 },
    Skipped { player: PlayerId },
    Recycled { count: usize },
    DownToOneCard { player: PlayerId },
    Won { player: PlayerId, turns: usize },
    Aborted { turns: usize },
}
