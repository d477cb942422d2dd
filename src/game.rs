use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::action::{GameEvent, Play, PlayerId};
use crate::board::Board;
use crate::bot::Bot;
use crate::card::{Card, Suit, full_deck, majority_suit};
use crate::error::GameError;
use crate::pile::{RngShuffler, Shuffler};
use crate::player::{HandSignal, Player};
use crate::state::{GameResult, GameSnapshot, PlayerSummary, RunOutcome};

const DEFAULT_SEED: u64 = 0xF15E_5EED_F15E_5EED;
/// Mixed into the seed so deck shuffling and engine choices use separate streams.
const SHUFFLE_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;
const DEFAULT_HAND_SIZES: RangeInclusive<usize> = 5..=8;

/// Cooperative stop signal, checked by `Game::run` before each turn.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub seed: u64,
    /// Cards dealt to each player; drawn from 5..=8 when unset.
    pub hand_size: Option<usize>,
    /// Seat that opens the game; a random seat when unset.
    pub first_player: Option<PlayerId>,
    /// Stop after this many played or drawn turns.
    pub max_turns: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            hand_size: None,
            first_player: None,
            max_turns: None,
        }
    }
}

/// Builder for seating bots and injecting decks, shufflers and hooks.
pub struct GameBuilder {
    config: GameConfig,
    players: Vec<(String, Box<dyn Bot>)>,
    deck: Option<Vec<Card>>,
    shuffler: Option<Box<dyn Shuffler>>,
    pacer: Option<Box<dyn FnMut()>>,
    cancel: CancelToken,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            players: Vec::new(),
            deck: None,
            shuffler: None,
            pacer: None,
            cancel: CancelToken::new(),
        }
    }

    /// Seats a player at the next free seat.
    pub fn player(mut self, name: impl Into<String>, bot: impl Bot + 'static) -> Self {
        self.players.push((name.into(), Box::new(bot)));
        self
    }

    pub fn boxed_player(mut self, name: impl Into<String>, bot: Box<dyn Bot>) -> Self {
        self.players.push((name.into(), bot));
        self
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Replaces the standard 52-card deck. The deck is still passed through
    /// the shuffler before dealing.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Overrides the seeded shuffler used for the initial load and every recycle.
    pub fn with_shuffler(mut self, shuffler: impl Shuffler + 'static) -> Self {
        self.shuffler = Some(Box::new(shuffler));
        self
    }

    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.config.hand_size = Some(hand_size);
        self
    }

    pub fn with_first_player(mut self, seat: PlayerId) -> Self {
        self.config.first_player = Some(seat);
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.config.max_turns = Some(max_turns);
        self
    }

    /// Hook invoked between turns, e.g. to slow a game down for watching.
    pub fn with_pacer(mut self, pacer: impl FnMut() + 'static) -> Self {
        self.pacer = Some(Box::new(pacer));
        self
    }

    pub fn with_turn_delay(self, delay: Duration) -> Self {
        if delay.is_zero() {
            return self;
        }
        self.with_pacer(move || std::thread::sleep(delay))
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        let GameBuilder {
            config,
            players,
            deck,
            shuffler,
            pacer,
            cancel,
        } = self;
        let shuffler = shuffler.unwrap_or_else(|| {
            Box::new(RngShuffler::new(StdRng::seed_from_u64(
                config.seed ^ SHUFFLE_STREAM,
            )))
        });
        let deck = deck.unwrap_or_else(full_deck);
        let (seats, bots): (Vec<Player>, Vec<Box<dyn Bot>>) = players
            .into_iter()
            .enumerate()
            .map(|(seat, (name, bot))| (Player::new(seat, name), bot))
            .unzip();
        let board = Board::new(seats, deck, shuffler)?;
        if config
            .first_player
            .is_some_and(|seat| seat >= board.players().len())
        {
            return Err(GameError::InvalidArgument("first player seat is out of range"));
        }
        Ok(Game {
            board,
            bots,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            turns: 0,
            events: Vec::new(),
            pacer,
            cancel,
            started: false,
            finished: false,
        })
    }
}

/// Result of a single loop iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finished(GameResult),
    /// A draw was required but nothing could be recycled; the game is over.
    Aborted { turns: usize },
}

/// Turn engine: resolves penalties and skips, consults bots, applies their
/// choices to the board and detects the winner.
pub struct Game {
    board: Board,
    bots: Vec<Box<dyn Bot>>,
    rng: StdRng,
    config: GameConfig,
    turns: usize,
    events: Vec<GameEvent>,
    pacer: Option<Box<dyn FnMut()>>,
    cancel: CancelToken,
    started: bool,
    finished: bool,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn bot_names(&self) -> Vec<String> {
        self.bots.iter().map(|bot| bot.name()).collect()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Deals the hands and picks the opening seat.
    pub fn setup(&mut self) -> Result<(), GameError> {
        if self.started {
            return Err(GameError::InvalidState("game is already set up"));
        }
        let hand_size = match self.config.hand_size {
            Some(size) => size,
            None => self.rng.gen_range(DEFAULT_HAND_SIZES),
        };
        self.board.deal_to_all(hand_size)?;
        self.record(GameEvent::Dealt { hand_size });

        let shift = match self.config.first_player {
            Some(seat) => seat,
            None => self.rng.gen_range(0..self.board.players().len()),
        };
        for _ in 0..shift {
            self.board.advance_turn();
        }
        self.record(GameEvent::FirstPlayer {
            player: self.board.current_index(),
        });
        self.started = true;
        Ok(())
    }

    /// Runs one iteration of the turn loop.
    ///
    /// Running out of cards to draw ends the game with `Step::Aborted`.
    pub fn step(&mut self) -> Result<Step, GameError> {
        if !self.started {
            return Err(GameError::InvalidState("setup must run before the first turn"));
        }
        if self.finished {
            return Err(GameError::InvalidState("game is already over"));
        }
        match self.resolve_turn() {
            Err(GameError::Unrecoverable) => {
                self.finished = true;
                self.record(GameEvent::Aborted { turns: self.turns });
                Ok(Step::Aborted { turns: self.turns })
            }
            other => other,
        }
    }

    fn resolve_turn(&mut self) -> Result<Step, GameError> {
        let current = self.board.current_index();
        if self.board.current_player().is_empty() {
            return Ok(Step::Finished(self.finish(current, self.turns)));
        }

        if self.board.pending_penalty() > 0 {
            self.serve_penalty(current)?;
            return Ok(Step::Continue);
        }

        if self.board.skip_next() {
            self.board.clear_skip();
            self.record(GameEvent::Skipped { player: current });
            self.board.advance_turn();
            return Ok(Step::Continue);
        }

        self.play_turn(current)?;
        if self.board.current_player().is_empty() {
            return Ok(Step::Finished(self.finish(current, self.turns + 1)));
        }
        self.turns += 1;
        self.board.advance_turn();
        Ok(Step::Continue)
    }

    /// Sets the game up if needed and loops until it ends.
    ///
    /// Running out of cards to draw is reported as `RunOutcome::Aborted`;
    /// errors are defects and are returned as is.
    pub fn run(&mut self) -> Result<RunOutcome, GameError> {
        if !self.started {
            self.setup()?;
        }
        loop {
            if self.cancel.is_cancelled() {
                info!(target: "fishbot.game", turns = self.turns, "run cancelled");
                return Ok(RunOutcome::Cancelled);
            }
            if let Some(limit) = self.config.max_turns {
                if self.turns >= limit {
                    warn!(target: "fishbot.game", limit, "turn limit reached");
                    return Ok(RunOutcome::TurnLimit { turns: self.turns });
                }
            }
            match self.step() {
                Ok(Step::Finished(result)) => return Ok(RunOutcome::Finished(result)),
                Ok(Step::Continue) => {
                    if let Some(pacer) = self.pacer.as_mut() {
                        pacer();
                    }
                }
                Ok(Step::Aborted { turns }) => return Ok(RunOutcome::Aborted { turns }),
                Err(err) => return Err(err),
            }
        }
    }

    fn serve_penalty(&mut self, current: PlayerId) -> Result<(), GameError> {
        let count = self.board.pending_penalty();
        for _ in 0..count {
            self.draw_card(current)?;
        }
        self.board.clear_pending_penalty();
        self.record(GameEvent::PenaltyDrawn {
            player: current,
            count,
        });
        self.board.advance_turn();
        Ok(())
    }

    fn play_turn(&mut self, current: PlayerId) -> Result<(), GameError> {
        let snapshot = self.board.build_snapshot();
        let pick = self.bots[current]
            .choose_index(&snapshot, self.board.current_player().hand())
            .or_else(|| snapshot.legal_indexes.first().copied());
        let Some(pick) = pick else {
            return self.draw_instead(current);
        };

        let mut played = self.try_play(current, pick, &snapshot)?;
        if played.is_none() {
            if let Some(&fallback) = snapshot.legal_indexes.first() {
                played = self.try_play(current, fallback, &snapshot)?;
            }
        }
        match played {
            Some(play) => {
                self.record(GameEvent::Played {
                    player: current,
                    play,
                });
                let signal = self.board.current_player().one_card_signal();
                self.note_signal(current, signal);
                Ok(())
            }
            None => self.draw_instead(current),
        }
    }

    fn try_play(
        &mut self,
        current: PlayerId,
        index: usize,
        snapshot: &GameSnapshot,
    ) -> Result<Option<Play>, GameError> {
        let bot = &mut self.bots[current];
        let rng = &mut self.rng;
        let mut choose_color = |hand: &[Card]| -> Suit {
            bot.choose_color(snapshot, hand)
                .or_else(|| majority_suit(hand))
                .unwrap_or_else(|| Suit::ALL[rng.gen_range(0..Suit::ALL.len())])
        };
        self.board.try_play_from_hand(index, Some(&mut choose_color))
    }

    fn draw_instead(&mut self, current: PlayerId) -> Result<(), GameError> {
        self.draw_card(current)?;
        self.record(GameEvent::Drew { player: current });
        Ok(())
    }

    /// Draws one card for `player`, recycling the discard pile first if the
    /// draw pile is empty.
    fn draw_card(&mut self, player: PlayerId) -> Result<(), GameError> {
        if self.board.draw_pile().is_empty() {
            if !self.board.try_recycle_from_discard()? {
                return Err(GameError::Unrecoverable);
            }
            self.record(GameEvent::Recycled {
                count: self.board.draw_pile().len(),
            });
        }
        let signal = self.board.draw_for(player)?;
        self.note_signal(player, signal);
        Ok(())
    }

    fn note_signal(&mut self, player: PlayerId, signal: HandSignal) {
        if signal.is_down_to_one() {
            self.record(GameEvent::DownToOneCard { player });
        }
    }

    fn finish(&mut self, winner: PlayerId, turns: usize) -> GameResult {
        self.finished = true;
        self.record(GameEvent::Won {
            player: winner,
            turns,
        });
        GameResult {
            winner,
            turns,
            players: self
                .board
                .players()
                .iter()
                .map(|p| PlayerSummary {
                    id: p.id(),
                    name: p.name().to_string(),
                    hand: p.hand().to_vec(),
                })
                .collect(),
        }
    }

    fn player_name(&self, player: PlayerId) -> &str {
        self.board.player(player).map(Player::name).unwrap_or("?")
    }

    fn record(&mut self, event: GameEvent) {
        match &event {
            GameEvent::Dealt { hand_size } => {
                info!(target: "fishbot.game", players = self.board.players().len(), hand_size, "cards dealt");
            }
            GameEvent::FirstPlayer { player } => {
                info!(
                    target: "fishbot.game",
                    player,
                    name = self.player_name(*player),
                    direction = %self.board.direction(),
                    order = ?self.board.seating_order(),
                    "first player chosen"
                );
            }
            GameEvent::Played { player, play } => {
                debug!(target: "fishbot.turn", player, name = self.player_name(*player), card = %play.card, effect = ?play.effect, "played");
            }
            GameEvent::Drew { player } => {
                debug!(target: "fishbot.turn", player, name = self.player_name(*player), "no playable card, drew one");
            }
            GameEvent::PenaltyDrawn { player, count } => {
                debug!(target: "fishbot.turn", player, name = self.player_name(*player), count, "served draw penalty");
            }
            GameEvent::Skipped { player } => {
                debug!(target: "fishbot.turn", player, name = self.player_name(*player), "turn skipped");
            }
            GameEvent::Recycled { count } => {
                debug!(target: "fishbot.turn", count, "draw pile rebuilt");
            }
            GameEvent::DownToOneCard { player } => {
                info!(target: "fishbot.turn", player, name = self.player_name(*player), "down to one card");
            }
            GameEvent::Won { player, turns } => {
                info!(target: "fishbot.game", player, name = self.player_name(*player), turns, "game won");
            }
            GameEvent::Aborted { turns } => {
                warn!(target: "fishbot.game", turns, "game aborted: no cards left to recycle");
            }
        }
        self.events.push(event);
    }
}
