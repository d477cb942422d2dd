//! Shedding card game engine (Crazy Eights family) for 2-4 bots.
//!
//! Aces skip, Twos add a draw penalty, Tens reverse and Jacks force a color.
//! The first player to empty their hand wins.

pub mod action;
pub mod board;
pub mod bot;
pub mod bots;
pub mod card;
pub mod error;
pub mod game;
pub mod pile;
pub mod player;
pub mod score;
pub mod state;
pub mod visualize;

pub use crate::action::{Effect, GameEvent, Play, PlayerId};
pub use crate::board::{Board, can_play};
pub use crate::bot::Bot;
pub use crate::bots::registry::{create_bot_from_spec, default_lineup, label_for_spec};
pub use crate::bots::{AntiFinishBot, FirstValidBot, FnBot, MinimizeScoreBot, RandomBot};
pub use crate::card::{Card, Rank, Suit, full_deck};
pub use crate::error::GameError;
pub use crate::game::{CancelToken, Game, GameBuilder, GameConfig, Step};
pub use crate::pile::{DiscardPile, DrawPile, RngShuffler, Shuffler};
pub use crate::player::{HandSignal, Player};
pub use crate::score::{Standing, hand_points, standings};
pub use crate::state::{
    Direction, GameResult, GameSnapshot, PlayerPublicState, PlayerSummary, RunOutcome,
};
pub use crate::visualize::{describe_event, render_snapshot, render_standings};
