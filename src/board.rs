//! Table state: piles, seating, direction and the transient effects left by
//! special cards. The board enforces legality and applies effects; deciding
//! what to play and sequencing turns is the engine's job.

use tracing::{debug, info};

use crate::action::{Effect, Play, PlayerId};
use crate::card::{
    Card, PENALTY_PER_CARD, PENALTY_RANK, REVERSE_RANK, Rank, SKIP_RANK, Suit, WILD_RANK,
};
use crate::error::GameError;
use crate::pile::{DiscardPile, DrawPile, Shuffler};
use crate::player::{HandSignal, Player};
use crate::state::{Direction, GameSnapshot, PlayerPublicState};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const MIN_HAND_SIZE: usize = 1;
pub const MAX_HAND_SIZE: usize = 8;

/// Callback choosing the forced color of a wild play. Receives the hand that
/// remains after the wild card left it.
pub type ColorChooser<'a> = &'a mut dyn FnMut(&[Card]) -> Suit;

/// Whether `candidate` may be placed given the current top card and forced color.
pub fn can_play(candidate: Card, top: Option<Card>, forced_color: Option<Suit>) -> bool {
    let Some(top) = top else {
        return true;
    };
    if candidate.is_wild() {
        return top.rank != PENALTY_RANK;
    }
    if let Some(forced) = forced_color {
        return candidate.suit == forced;
    }
    candidate.suit == top.suit || candidate.rank == top.rank
}

pub struct Board {
    players: Vec<Player>,
    draw: DrawPile,
    discard: DiscardPile,
    shuffler: Box<dyn Shuffler>,
    current: usize,
    direction: Direction,
    pending_penalty: u32,
    skip_next: bool,
    forced_color: Option<Suit>,
    last_deposited: Option<Card>,
}

impl Board {
    /// Seats `players` (ids must equal their seat index) and loads `deck`
    /// into the draw pile through `shuffler`, which is kept for recycling.
    pub fn new(
        players: Vec<Player>,
        deck: Vec<Card>,
        mut shuffler: Box<dyn Shuffler>,
    ) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
            return Err(GameError::InvalidArgument("players must be between 2 and 4"));
        }
        if players.iter().enumerate().any(|(seat, p)| p.id() != seat) {
            return Err(GameError::InvalidArgument(
                "player ids must match their seat order",
            ));
        }
        let mut draw = DrawPile::new();
        draw.load(deck, shuffler.as_mut())?;
        Ok(Self {
            players,
            draw,
            discard: DiscardPile::new(),
            shuffler,
            current: 0,
            direction: Direction::Clockwise,
            pending_penalty: 0,
            skip_next: false,
            forced_color: None,
            last_deposited: None,
        })
    }

    /// Deals `per_player` cards to every player, one at a time in seat order.
    /// One-card signals raised while dealing are not reported.
    pub fn deal_to_all(&mut self, per_player: usize) -> Result<(), GameError> {
        if !(MIN_HAND_SIZE..=MAX_HAND_SIZE).contains(&per_player) {
            return Err(GameError::InvalidArgument("hand size must be between 1 and 8"));
        }
        if per_player * self.players.len() > self.draw.len() {
            return Err(GameError::InvalidState(
                "draw pile does not hold enough cards to deal",
            ));
        }
        for _ in 0..per_player {
            for player in &mut self.players {
                let _ = player.draw_from(&mut self.draw)?;
            }
        }
        Ok(())
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    pub fn current_index(&self) -> PlayerId {
        self.current
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn next_index(&self) -> PlayerId {
        self.index_after(self.current, 1)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_penalty(&self) -> u32 {
        self.pending_penalty
    }

    pub fn skip_next(&self) -> bool {
        self.skip_next
    }

    pub fn forced_color(&self) -> Option<Suit> {
        self.forced_color
    }

    pub fn last_deposited(&self) -> Option<Card> {
        self.last_deposited
    }

    pub fn draw_pile(&self) -> &DrawPile {
        &self.draw
    }

    pub fn discard_pile(&self) -> &DiscardPile {
        &self.discard
    }

    /// Number of cards across both piles and every hand.
    pub fn card_count(&self) -> usize {
        self.draw.len() + self.discard.len() + self.players.iter().map(Player::len).sum::<usize>()
    }

    /// Current player's hand indexes that are legal right now, in hand order.
    pub fn legal_indexes(&self) -> Vec<usize> {
        self.current_player()
            .hand()
            .iter()
            .enumerate()
            .filter(|(_, card)| can_play(**card, self.last_deposited, self.forced_color))
            .map(|(index, _)| index)
            .collect()
    }

    /// Plays the current player's card at `index`.
    ///
    /// Returns `Ok(None)` without touching anything when the index is out of
    /// range or the card is not legal. Playing a wild card without a chooser is
    /// an `InvalidArgument`, also raised before any mutation. The player's own
    /// one-card signal is suppressed; callers re-check it after the play.
    pub fn try_play_from_hand(
        &mut self,
        index: usize,
        choose_color: Option<ColorChooser<'_>>,
    ) -> Result<Option<Play>, GameError> {
        let Some(&candidate) = self.players[self.current].hand().get(index) else {
            return Ok(None);
        };
        if !can_play(candidate, self.last_deposited, self.forced_color) {
            return Ok(None);
        }
        if candidate.is_wild() && choose_color.is_none() {
            return Err(GameError::InvalidArgument(
                "a color chooser is required to play a wild card",
            ));
        }
        let (card, _) = self.players[self.current].remove_at(index, true)?;
        self.discard.deposit(card);
        self.last_deposited = Some(card);
        let effect = self.apply_effects(card, choose_color)?;
        debug!(target: "fishbot.board", player = self.current, %card, ?effect, "card played");
        Ok(Some(Play { card, effect }))
    }

    /// Applies the special effect of `card`, which was just deposited.
    pub fn apply_effects(
        &mut self,
        card: Card,
        choose_color: Option<ColorChooser<'_>>,
    ) -> Result<Effect, GameError> {
        let effect = match card.rank {
            SKIP_RANK => {
                self.skip_next = true;
                Effect::SkipNext
            }
            REVERSE_RANK => {
                self.direction = self.direction.reversed();
                Effect::Reversed(self.direction)
            }
            PENALTY_RANK => {
                self.pending_penalty += PENALTY_PER_CARD;
                self.skip_next = true;
                Effect::Penalty {
                    pending: self.pending_penalty,
                }
            }
            WILD_RANK => {
                let chooser = choose_color.ok_or(GameError::InvalidArgument(
                    "a color chooser is required to play a wild card",
                ))?;
                let suit = chooser(self.players[self.current].hand());
                self.forced_color = Some(suit);
                Effect::ForcedColor(suit)
            }
            _ => {
                self.forced_color = None;
                Effect::Plain
            }
        };
        Ok(effect)
    }

    /// Refills the empty draw pile from the discard pile minus its top card.
    /// Returns `false`, changing nothing, when there is nothing to recycle.
    pub fn try_recycle_from_discard(&mut self) -> Result<bool, GameError> {
        if !self.draw.is_empty() {
            return Err(GameError::InvalidState(
                "draw pile must be empty before recycling",
            ));
        }
        let payload = self.discard.take_all_but_top();
        if payload.is_empty() {
            return Ok(false);
        }
        let count = payload.len();
        self.draw.load(payload, self.shuffler.as_mut())?;
        info!(target: "fishbot.board", count, "recycled discard pile into draw pile");
        Ok(true)
    }

    /// Moves one card from the draw pile into `player`'s hand.
    pub fn draw_for(&mut self, player: PlayerId) -> Result<HandSignal, GameError> {
        let len = self.players.len();
        let player = self
            .players
            .get_mut(player)
            .ok_or(GameError::OutOfRange { index: player, len })?;
        player.draw_from(&mut self.draw)
    }

    pub fn advance_turn(&mut self) {
        self.current = self.index_after(self.current, 1);
    }

    /// Penalty served: clears both the pending draw count and the skip flag.
    pub fn clear_pending_penalty(&mut self) {
        self.pending_penalty = 0;
        self.skip_next = false;
    }

    pub fn clear_skip(&mut self) {
        self.skip_next = false;
    }

    /// Forced color if present, else the top card's suit (Clubs before any play).
    pub fn effective_suit(&self) -> Suit {
        self.forced_color
            .or(self.last_deposited.map(|card| card.suit))
            .unwrap_or(Suit::Clubs)
    }

    /// Top card's rank (the skip rank before any play).
    pub fn effective_rank(&self) -> Rank {
        self.last_deposited.map(|card| card.rank).unwrap_or(SKIP_RANK)
    }

    pub fn build_snapshot(&self) -> GameSnapshot {
        let next = self.next_index();
        GameSnapshot {
            current_player: self.current,
            next_player: next,
            players: self
                .players
                .iter()
                .map(|p| PlayerPublicState {
                    id: p.id(),
                    name: p.name().to_string(),
                    hand_size: p.len(),
                })
                .collect(),
            top: self.last_deposited,
            current_suit: self.effective_suit(),
            current_rank: self.effective_rank(),
            legal_indexes: self.legal_indexes(),
            threat_next: self.players[next].len() == 1,
        }
    }

    /// Seats in play order starting from the current player.
    pub fn seating_order(&self) -> Vec<PlayerId> {
        (0..self.players.len())
            .map(|steps| self.index_after(self.current, steps))
            .collect()
    }

    fn index_after(&self, from: usize, steps: usize) -> usize {
        let n = self.players.len() as isize;
        let raw = from as isize + self.direction.step() * steps as isize;
        raw.rem_euclid(n) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Rank::*;
    use crate::card::Suit::*;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn board_with(hands: Vec<Vec<Card>>, top: Option<Card>) -> Board {
        let players = hands
            .into_iter()
            .enumerate()
            .map(|(seat, hand)| {
                let mut player = Player::new(seat, format!("P{seat}"));
                for card in hand {
                    let _ = player.receive(card);
                }
                player
            })
            .collect();
        let mut board = Board::new(players, Vec::new(), Box::new(|cards: Vec<Card>| cards))
            .expect("valid board");
        if let Some(top) = top {
            board.discard.deposit(top);
            board.last_deposited = Some(top);
        }
        board
    }

    #[test]
    fn anything_is_legal_before_the_first_deposit() {
        assert!(can_play(c(Five, Hearts), None, None));
        assert!(can_play(c(Jack, Clubs), None, None));
    }

    #[test]
    fn wild_is_illegal_only_on_a_penalty_card() {
        assert!(!can_play(c(Jack, Hearts), Some(c(Two, Hearts)), None));
        assert!(!can_play(c(Jack, Hearts), Some(c(Two, Spades)), Some(Hearts)));
        assert!(can_play(c(Jack, Hearts), Some(c(Nine, Spades)), None));
        assert!(can_play(c(Jack, Hearts), Some(c(Jack, Spades)), Some(Clubs)));
    }

    #[test]
    fn forced_color_admits_matching_suit_or_wild() {
        let top = Some(c(Jack, Spades));
        assert!(can_play(c(Four, Diamonds), top, Some(Diamonds)));
        assert!(!can_play(c(Four, Spades), top, Some(Diamonds)));
        assert!(!can_play(c(Queen, Spades), top, Some(Diamonds)));
        assert!(can_play(c(Jack, Clubs), top, Some(Diamonds)));
    }

    #[test]
    fn plain_matching_by_suit_or_rank() {
        let top = Some(c(Seven, Clubs));
        assert!(can_play(c(Two, Clubs), top, None));
        assert!(can_play(c(Seven, Hearts), top, None));
        assert!(!can_play(c(Eight, Hearts), top, None));
    }

    #[test]
    fn consecutive_penalties_accumulate() {
        let mut board = board_with(vec![vec![], vec![]], None);
        board.apply_effects(c(Two, Clubs), None).unwrap();
        let effect = board.apply_effects(c(Two, Hearts), None).unwrap();
        assert_eq!(effect, Effect::Penalty { pending: 4 });
        assert_eq!(board.pending_penalty(), 4);
        assert!(board.skip_next());
    }

    #[test]
    fn reverse_is_self_inverse() {
        let mut board = board_with(vec![vec![], vec![], vec![]], None);
        let original = board.direction();
        board.apply_effects(c(Ten, Clubs), None).unwrap();
        assert_eq!(board.direction(), original.reversed());
        board.apply_effects(c(Ten, Hearts), None).unwrap();
        assert_eq!(board.direction(), original);
    }

    #[test]
    fn advance_turn_wraps_in_both_directions() {
        let mut board = board_with(vec![vec![], vec![], vec![]], None);
        board.advance_turn();
        board.advance_turn();
        board.advance_turn();
        assert_eq!(board.current_index(), 0);
        board.apply_effects(c(Ten, Clubs), None).unwrap();
        board.advance_turn();
        assert_eq!(board.current_index(), 2);
        assert_eq!(board.next_index(), 1);
        assert_eq!(board.seating_order(), vec![2, 1, 0]);
    }

    #[test]
    fn penalty_card_on_matching_rank() {
        let mut board = board_with(vec![vec![c(Two, Clubs)], vec![c(Three, Diamonds)]], Some(c(Two, Hearts)));
        let play = board.try_play_from_hand(0, None).unwrap().expect("legal play");
        assert_eq!(play.card, c(Two, Clubs));
        assert_eq!(board.pending_penalty(), 2);
        assert!(board.skip_next());
        assert_eq!(board.discard_pile().peek_top(), Some(c(Two, Clubs)));
        assert_eq!(board.last_deposited(), Some(c(Two, Clubs)));
        assert!(board.current_player().is_empty());
    }

    #[test]
    fn rejected_plays_do_not_mutate() {
        let mut board = board_with(vec![vec![c(Eight, Hearts)], vec![]], Some(c(Five, Clubs)));
        assert_eq!(board.try_play_from_hand(0, None), Ok(None));
        assert_eq!(board.try_play_from_hand(3, None), Ok(None));
        assert_eq!(board.current_player().hand(), &[c(Eight, Hearts)]);
        assert_eq!(board.discard_pile().len(), 1);
    }

    #[test]
    fn wild_without_chooser_is_invalid_and_leaves_hand_alone() {
        let mut board = board_with(vec![vec![c(Jack, Hearts)], vec![]], Some(c(Five, Clubs)));
        assert!(matches!(
            board.try_play_from_hand(0, None),
            Err(GameError::InvalidArgument(_))
        ));
        assert_eq!(board.current_player().len(), 1);
        assert_eq!(board.discard_pile().len(), 1);
    }

    #[test]
    fn wild_sets_forced_color_and_plain_card_clears_it() {
        let mut board = board_with(
            vec![vec![c(Jack, Hearts), c(Four, Spades), c(Nine, Spades)], vec![]],
            Some(c(Five, Clubs)),
        );
        let mut seen = Vec::new();
        let mut chooser = |hand: &[Card]| {
            seen = hand.to_vec();
            Spades
        };
        let play = board
            .try_play_from_hand(0, Some(&mut chooser))
            .unwrap()
            .expect("wild is legal");
        assert_eq!(play.effect, Effect::ForcedColor(Spades));
        assert_eq!(seen, vec![c(Four, Spades), c(Nine, Spades)]);
        assert_eq!(board.forced_color(), Some(Spades));
        assert_eq!(board.effective_suit(), Spades);
        assert_eq!(board.legal_indexes(), vec![0, 1]);

        let play = board.try_play_from_hand(0, None).unwrap().expect("spade is legal");
        assert_eq!(play.effect, Effect::Plain);
        assert_eq!(board.forced_color(), None);
        assert_eq!(board.effective_suit(), Spades);
        assert_eq!(board.effective_rank(), Four);
    }

    #[test]
    fn legal_indexes_follow_hand_order() {
        let board = board_with(
            vec![
                vec![c(King, Hearts), c(Three, Clubs), c(Jack, Diamonds), c(Three, Hearts)],
                vec![],
            ],
            Some(c(Three, Spades)),
        );
        assert_eq!(board.legal_indexes(), vec![1, 2, 3]);
    }

    #[test]
    fn recycle_keeps_top_and_reloads_the_rest() {
        let (a, b, top) = (c(Four, Clubs), c(Six, Hearts), c(Nine, Diamonds));
        let mut board = board_with(vec![vec![], vec![]], None);
        for card in [a, b, top] {
            board.discard.deposit(card);
        }
        assert!(board.try_recycle_from_discard().unwrap());
        let mut reloaded = board.draw_pile().cards().to_vec();
        reloaded.sort_by_key(|card| card.rank as u8);
        assert_eq!(reloaded, vec![a, b]);
        assert_eq!(board.discard_pile().cards(), &[top]);
    }

    #[test]
    fn recycle_fails_without_material() {
        let mut board = board_with(vec![vec![], vec![]], Some(c(Nine, Diamonds)));
        assert_eq!(board.try_recycle_from_discard(), Ok(false));
        assert_eq!(board.discard_pile().len(), 1);
        assert!(board.draw_pile().is_empty());
    }

    #[test]
    fn snapshot_defaults_before_first_play_and_flags_threat() {
        let board = board_with(vec![vec![c(Five, Hearts), c(Six, Hearts)], vec![c(Two, Spades)]], None);
        let snapshot = board.build_snapshot();
        assert_eq!(snapshot.current_player, 0);
        assert_eq!(snapshot.next_player, 1);
        assert_eq!(snapshot.top, None);
        assert_eq!(snapshot.current_suit, Clubs);
        assert_eq!(snapshot.current_rank, Ace);
        assert_eq!(snapshot.legal_indexes, vec![0, 1]);
        assert!(snapshot.threat_next);
        assert_eq!(snapshot.players[1].hand_size, 1);
    }

    #[test]
    fn dealing_is_round_robin_and_checks_supply() {
        let deck = vec![c(Three, Clubs), c(Four, Clubs), c(Five, Clubs), c(Six, Clubs), c(Seven, Clubs)];
        let players = vec![Player::new(0, "A"), Player::new(1, "B")];
        let mut board = Board::new(players, deck, Box::new(|cards: Vec<Card>| cards)).unwrap();
        board.deal_to_all(2).unwrap();
        assert_eq!(board.players()[0].hand(), &[c(Seven, Clubs), c(Five, Clubs)]);
        assert_eq!(board.players()[1].hand(), &[c(Six, Clubs), c(Four, Clubs)]);
        assert_eq!(board.draw_pile().len(), 1);
        assert!(matches!(board.deal_to_all(1), Err(GameError::InvalidState(_))));
        assert!(matches!(board.deal_to_all(0), Err(GameError::InvalidArgument(_))));
    }

    #[test]
    fn seat_count_is_validated() {
        let identity = || Box::new(|cards: Vec<Card>| cards) as Box<dyn Shuffler>;
        let one = vec![Player::new(0, "A")];
        assert!(Board::new(one, Vec::new(), identity()).is_err());
        let five = (0..5).map(|i| Player::new(i, "X")).collect();
        assert!(Board::new(five, Vec::new(), identity()).is_err());
        let misnumbered = vec![Player::new(1, "A"), Player::new(0, "B")];
        assert!(Board::new(misnumbered, Vec::new(), identity()).is_err());
    }
}
