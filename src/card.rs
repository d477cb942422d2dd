use std::fmt;

use serde::{Deserialize, Serialize};

/// Card suit. Declaration order doubles as the "lowest suit" default.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Card rank, Ace through King.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

/// Skips the following player's turn.
pub const SKIP_RANK: Rank = Rank::Ace;
/// Adds to the pending draw penalty and skips the following player.
pub const PENALTY_RANK: Rank = Rank::Two;
/// Flips the play direction.
pub const REVERSE_RANK: Rank = Rank::Ten;
/// Always playable (except on a penalty card) and imposes a color.
pub const WILD_RANK: Rank = Rank::Jack;

/// Cards added to the pending penalty by each penalty-rank play.
pub const PENALTY_PER_CARD: u32 = 2;
pub const DECK_SIZE: usize = 52;

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Points a card of this rank is worth when left in hand.
    pub fn points(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Two | Rank::Jack | Rank::Queen | Rank::King => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single playing card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.rank.points()
    }

    #[inline]
    pub fn is_wild(&self) -> bool {
        self.rank == WILD_RANK
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Builds the 52-card deck in deterministic order (unshuffled).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades] {
        for rank in Rank::ALL {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

/// Most frequent suit in `hand`; ties go to the suit seen first.
pub fn majority_suit(hand: &[Card]) -> Option<Suit> {
    let mut counts: Vec<(Suit, usize)> = Vec::with_capacity(Suit::ALL.len());
    for card in hand {
        match counts.iter_mut().find(|(suit, _)| *suit == card.suit) {
            Some((_, count)) => *count += 1,
            None => counts.push((card.suit, 1)),
        }
    }
    let mut best: Option<(Suit, usize)> = None;
    for (suit, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((suit, count));
        }
    }
    best.map(|(suit, _)| suit)
}
