//! Scoring utilities for finished games.
//!
//! Each card left in hand counts its rank's points (Ace 11, Two and face
//! cards 2, numbered cards their face value). Lower is better; the winner
//! always has 0.

use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::Card;
use crate::state::GameResult;

pub fn hand_points(hand: &[Card]) -> u32 {
    hand.iter().map(Card::points).sum()
}

/// One row of the final table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub id: PlayerId,
    pub name: String,
    pub cards: Vec<Card>,
    pub points: u32,
}

/// Players ordered by remaining points, lowest first (stable for ties).
pub fn standings(result: &GameResult) -> Vec<Standing> {
    let mut rows: Vec<Standing> = result
        .players
        .iter()
        .map(|p| Standing {
            id: p.id,
            name: p.name.clone(),
            cards: p.hand.clone(),
            points: hand_points(&p.hand),
        })
        .collect();
    rows.sort_by_key(|row| row.points);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};
    use crate::state::PlayerSummary;

    fn summary(id: PlayerId, hand: Vec<Card>) -> PlayerSummary {
        PlayerSummary {
            id,
            name: format!("Player {id}"),
            hand,
        }
    }

    #[test]
    fn test_hand_points() {
        let hand = [
            Card::new(Rank::Ace, Suit::Clubs),
            Card::new(Rank::King, Suit::Hearts),
            Card::new(Rank::Seven, Suit::Spades),
        ];
        assert_eq!(hand_points(&hand), 20);
        assert_eq!(hand_points(&[]), 0);
    }

    #[test]
    fn test_standings_sorted_by_points() {
        let result = GameResult {
            winner: 1,
            turns: 12,
            players: vec![
                summary(0, vec![Card::new(Rank::Ace, Suit::Clubs)]),
                summary(1, vec![]),
                summary(2, vec![Card::new(Rank::Three, Suit::Hearts)]),
            ],
        };
        let rows = standings(&result);
        let order: Vec<PlayerId> = rows.iter().map(|row| row.id).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(rows[2].points, 11);
    }
}
