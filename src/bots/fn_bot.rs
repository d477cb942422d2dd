use crate::bot::Bot;
use crate::card::{Card, Suit};
use crate::state::GameSnapshot;

/// Color policy of a bot built without one.
pub type NoColor = fn(&GameSnapshot, &[Card]) -> Option<Suit>;

fn no_color(_snapshot: &GameSnapshot, _hand: &[Card]) -> Option<Suit> {
    None
}

/// Adapter turning plain closures into a bot.
///
/// ```
/// use fishbot::{Bot, FnBot};
///
/// let bot = FnBot::new("Last", |snapshot, _hand| snapshot.legal_indexes.last().copied());
/// assert_eq!(bot.name(), "Last");
/// ```
pub struct FnBot<I, C = NoColor> {
    name: String,
    index: I,
    color: C,
}

impl<I> FnBot<I, NoColor> {
    /// Bot with the given index policy and no color preference.
    pub fn new(name: impl Into<String>, index: I) -> Self
    where
        I: FnMut(&GameSnapshot, &[Card]) -> Option<usize>,
    {
        Self {
            name: name.into(),
            index,
            color: no_color,
        }
    }
}

impl<I, C> FnBot<I, C> {
    pub fn with_color<C2>(self, color: C2) -> FnBot<I, C2>
    where
        C2: FnMut(&GameSnapshot, &[Card]) -> Option<Suit>,
    {
        FnBot {
            name: self.name,
            index: self.index,
            color,
        }
    }
}

impl<I, C> Bot for FnBot<I, C>
where
    I: FnMut(&GameSnapshot, &[Card]) -> Option<usize>,
    C: FnMut(&GameSnapshot, &[Card]) -> Option<Suit>,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn choose_index(&mut self, snapshot: &GameSnapshot, hand: &[Card]) -> Option<usize> {
        (self.index)(snapshot, hand)
    }

    fn choose_color(&mut self, snapshot: &GameSnapshot, hand: &[Card]) -> Option<Suit> {
        (self.color)(snapshot, hand)
    }
}
