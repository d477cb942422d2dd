pub mod anti_finish;
pub mod first_valid;
pub mod fn_bot;
pub mod minimize_score;
pub mod random;
pub mod registry;

pub use anti_finish::AntiFinishBot;
pub use first_valid::FirstValidBot;
pub use fn_bot::FnBot;
pub use minimize_score::MinimizeScoreBot;
pub use random::RandomBot;
