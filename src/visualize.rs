use std::fmt::Write;

use crate::action::{Effect, GameEvent, PlayerId};
use crate::card::Card;
use crate::score::standings;
use crate::state::{GameResult, GameSnapshot};

/// Table summary from the acting player's point of view, with their hand and
/// the indexes they may play.
pub fn render_snapshot(snapshot: &GameSnapshot, hand: &[Card]) -> String {
    let mut out = String::new();
    let top = snapshot
        .top
        .map(|card| card.to_string())
        .unwrap_or_else(|| String::from("--"));
    let _ = writeln!(
        out,
        "Top: {top}  |  Color: {}  |  Rank: {}",
        snapshot.current_suit, snapshot.current_rank
    );
    let _ = writeln!(out, "Players:");
    for player in &snapshot.players {
        let mut tags = String::new();
        if player.id == snapshot.current_player {
            tags.push_str(" <- current");
        }
        if player.id == snapshot.next_player && snapshot.threat_next {
            tags.push_str(" (one card!)");
        }
        let _ = writeln!(
            out,
            "  {} - {} card(s){tags}",
            player.name, player.hand_size
        );
    }
    let _ = writeln!(out, "Hand: {}", format_hand(hand));
    let legal = snapshot
        .legal_indexes
        .iter()
        .filter_map(|&index| hand.get(index).map(|card| format!("{index}:{card}")))
        .collect::<Vec<_>>();
    if legal.is_empty() {
        let _ = writeln!(out, "Legal: (none, must draw)");
    } else {
        let _ = writeln!(out, "Legal: {}", legal.join("  "));
    }
    out
}

/// One-line description of an event; `names` is indexed by seat.
pub fn describe_event(event: &GameEvent, names: &[String]) -> String {
    let name = |player: PlayerId| {
        names
            .get(player)
            .cloned()
            .unwrap_or_else(|| format!("Player {player}"))
    };
    match event {
        GameEvent::Dealt { hand_size } => format!("Dealt {hand_size} card(s) to each player"),
        GameEvent::FirstPlayer { player } => format!("{} starts", name(*player)),
        GameEvent::Played { player, play } => {
            let effect = match play.effect {
                Effect::SkipNext => String::from(" - next player is skipped"),
                Effect::Reversed(direction) => format!(" - direction is now {direction}"),
                Effect::Penalty { pending } => {
                    format!(" - next player draws {pending} and loses the turn")
                }
                Effect::ForcedColor(suit) => format!(" - color forced to {suit}"),
                Effect::Plain => String::new(),
            };
            format!("{} plays {}{effect}", name(*player), play.card)
        }
        GameEvent::Drew { player } => format!("{} cannot play and draws 1", name(*player)),
        GameEvent::PenaltyDrawn { player, count } => {
            format!("{} draws {count} (penalty)", name(*player))
        }
        GameEvent::Skipped { player } => format!("{} is skipped", name(*player)),
        GameEvent::Recycled { count } => {
            format!("Draw pile rebuilt with {count} card(s) from the discard pile")
        }
        GameEvent::DownToOneCard { player } => format!("{} has one card left!", name(*player)),
        GameEvent::Won { player, turns } => {
            format!("{} wins after {turns} turn(s)", name(*player))
        }
        GameEvent::Aborted { turns } => {
            format!("Game aborted after {turns} turn(s): nothing left to draw")
        }
    }
}

/// Final table of remaining cards, lowest score first.
pub fn render_standings(result: &GameResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "===== Final standings (cards left) =====");
    for row in standings(result) {
        let cards = if row.cards.is_empty() {
            String::from("(no cards)")
        } else {
            format_hand(&row.cards)
        };
        let _ = writeln!(
            out,
            "- {:<20} Score: {:>2}  |  Left: {}  |  {cards}",
            row.name,
            row.points,
            row.cards.len()
        );
    }
    let _ = writeln!(out, "========================================");
    out
}

fn format_hand(hand: &[Card]) -> String {
    if hand.is_empty() {
        return String::from("(empty)");
    }
    hand.iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Play;
    use crate::card::{Rank, Suit};
    use crate::state::{Direction, PlayerPublicState, PlayerSummary};

    fn names() -> Vec<String> {
        vec![String::from("Ada"), String::from("Bo")]
    }

    #[test]
    fn render_snapshot_lists_legal_cards_and_threat() {
        let hand = vec![
            Card::new(Rank::Five, Suit::Hearts),
            Card::new(Rank::King, Suit::Clubs),
        ];
        let snapshot = GameSnapshot {
            current_player: 0,
            next_player: 1,
            players: vec![
                PlayerPublicState {
                    id: 0,
                    name: String::from("Ada"),
                    hand_size: 2,
                },
                PlayerPublicState {
                    id: 1,
                    name: String::from("Bo"),
                    hand_size: 1,
                },
            ],
            top: Some(Card::new(Rank::Nine, Suit::Hearts)),
            current_suit: Suit::Hearts,
            current_rank: Rank::Nine,
            legal_indexes: vec![0],
            threat_next: true,
        };
        let text = render_snapshot(&snapshot, &hand);
        assert!(text.contains("Top: 9♥"));
        assert!(text.contains("Ada - 2 card(s) <- current"));
        assert!(text.contains("(one card!)"));
        assert!(text.contains("Legal: 0:5♥"));
    }

    #[test]
    fn describe_event_mentions_effects() {
        let event = GameEvent::Played {
            player: 1,
            play: Play {
                card: Card::new(Rank::Ten, Suit::Spades),
                effect: Effect::Reversed(Direction::CounterClockwise),
            },
        };
        assert_eq!(
            describe_event(&event, &names()),
            "Bo plays 10♠ - direction is now counter-clockwise"
        );
        let event = GameEvent::PenaltyDrawn {
            player: 3,
            count: 4,
        };
        assert_eq!(describe_event(&event, &names()), "Player 3 draws 4 (penalty)");
    }

    #[test]
    fn standings_put_the_winner_first() {
        let result = GameResult {
            winner: 1,
            turns: 9,
            players: vec![
                PlayerSummary {
                    id: 0,
                    name: String::from("Ada"),
                    hand: vec![Card::new(Rank::Ace, Suit::Clubs)],
                },
                PlayerSummary {
                    id: 1,
                    name: String::from("Bo"),
                    hand: vec![],
                },
            ],
        };
        let text = render_standings(&result);
        let bo = text.find("Bo").expect("winner listed");
        let ada = text.find("Ada").expect("loser listed");
        assert!(bo < ada);
        assert!(text.contains("(no cards)"));
        assert!(text.contains("Score: 11"));
    }
}
