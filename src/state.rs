use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{Card, Rank, Suit};

/// Direction in which turns move around the table.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Signed seat offset of one step.
    pub fn step(self) -> isize {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Clockwise => f.write_str("clockwise"),
            Direction::CounterClockwise => f.write_str("counter-clockwise"),
        }
    }
}

/// Public portion of a player's state that all opponents may observe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPublicState {
    pub id: PlayerId,
    pub name: String,
    pub hand_size: usize,
}

/// Read-only projection of the board handed to bots at a decision point.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub current_player: PlayerId,
    pub next_player: PlayerId,
    pub players: Vec<PlayerPublicState>,
    pub top: Option<Card>,
    /// Forced color if active, else the top card's suit.
    pub current_suit: Suit,
    pub current_rank: Rank,
    /// Indexes into the current hand that may legally be played.
    pub legal_indexes: Vec<usize>,
    /// The next player holds exactly one card.
    pub threat_next: bool,
}

impl GameSnapshot {
    pub fn is_legal(&self, index: usize) -> bool {
        self.legal_indexes.contains(&index)
    }
}

/// Final hand of a player once the game is over.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
}

/// Result of a completed game.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameResult {
    pub winner: PlayerId,
    pub turns: usize,
    pub players: Vec<PlayerSummary>,
}

impl GameResult {
    pub fn winner_name(&self) -> &str {
        self.players
            .iter()
            .find(|p| p.id == self.winner)
            .map(|p| p.name.as_str())
            .unwrap_or("?")
    }
}

/// How a call to `Game::run` ended.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunOutcome {
    Finished(GameResult),
    /// Stopped by the cancel token before the next turn started.
    Cancelled,
    /// A draw was required but nothing could be recycled.
    Aborted { turns: usize },
    /// The configured turn cap was reached.
    TurnLimit { turns: usize },
}

impl RunOutcome {
    pub fn result(&self) -> Option<&GameResult> {
        match self {
            RunOutcome::Finished(result) => Some(result),
            _ => None,
        }
    }
}
