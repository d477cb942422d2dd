use std::error::Error;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bot::Bot;
use crate::bots::{AntiFinishBot, FirstValidBot, MinimizeScoreBot, RandomBot};

const ANTI_FINISH_SUFFIX: &str = "+anti";

/// Returns a normalized label for a bot spec: the head token before any ':'
/// plus the `+anti` suffix when present.
pub fn label_for_spec(spec: &str) -> String {
    let spec_lower = spec.trim().to_ascii_lowercase();
    let (base, suffix) = match spec_lower.strip_suffix(ANTI_FINISH_SUFFIX) {
        Some(base) => (base, ANTI_FINISH_SUFFIX),
        None => (spec_lower.as_str(), ""),
    };
    let head = base.split(':').next().unwrap_or(base).trim();
    format!("{head}{suffix}")
}

/// Create a bot instance from a CLI-style spec.
/// Supported specs, each optionally suffixed with `+anti` to wrap the bot in
/// [`AntiFinishBot`]:
/// - first
/// - minscore
/// - random[:seed]
pub fn create_bot_from_spec(
    spec: &str,
    index: usize,
    seed: u64,
) -> Result<Box<dyn Bot>, Box<dyn Error>> {
    let spec_lower = spec.trim().to_ascii_lowercase();
    let (base, anti) = match spec_lower.strip_suffix(ANTI_FINISH_SUFFIX) {
        Some(base) => (base, true),
        None => (spec_lower.as_str(), false),
    };
    let bot: Box<dyn Bot> = if base == "first" {
        Box::new(FirstValidBot::new())
    } else if base == "minscore" {
        Box::new(MinimizeScoreBot::new())
    } else if base.starts_with("random") {
        let custom_seed = base
            .split_once(':')
            .and_then(|(_, value)| value.parse::<u64>().ok())
            .unwrap_or(seed ^ ((index as u64 + 1) * 0x9E37_79B9));
        Box::new(RandomBot::new(StdRng::seed_from_u64(custom_seed)))
    } else {
        return Err(format!("unrecognized bot spec: {spec}").into());
    };
    if anti {
        Ok(Box::new(AntiFinishBot::new(bot)))
    } else {
        Ok(bot)
    }
}

/// The classic table: one random seat plays MinimizeScore, every other seat
/// FirstValid, and everyone watches for a finishing opponent.
pub fn default_lineup<R: Rng>(num_players: usize, rng: &mut R) -> Vec<Box<dyn Bot>> {
    let minimizer = rng.gen_range(0..num_players.max(1));
    (0..num_players)
        .map(|seat| -> Box<dyn Bot> {
            if seat == minimizer {
                Box::new(AntiFinishBot::new(MinimizeScoreBot::new()))
            } else {
                Box::new(AntiFinishBot::new(FirstValidBot::new()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specs_map_to_named_bots() {
        let bot = create_bot_from_spec("minscore+anti", 0, 1).unwrap();
        assert_eq!(bot.name(), "MinimizeScore+AntiFinish");
        let bot = create_bot_from_spec("First", 1, 1).unwrap();
        assert_eq!(bot.name(), "FirstValid");
        let bot = create_bot_from_spec("random:42", 2, 1).unwrap();
        assert_eq!(bot.name(), "Random");
        assert!(create_bot_from_spec("human", 0, 1).is_err());
    }

    #[test]
    fn labels_drop_arguments() {
        assert_eq!(label_for_spec("Random:7"), "random");
        assert_eq!(label_for_spec("first+anti"), "first+anti");
        assert_eq!(label_for_spec("Random:7+anti"), "random+anti");
        assert_ne!(label_for_spec("random:7+anti"), label_for_spec("random:7"));
    }

    #[test]
    fn default_lineup_has_exactly_one_minimizer() {
        let mut rng = StdRng::seed_from_u64(3);
        let lineup = default_lineup(4, &mut rng);
        assert_eq!(lineup.len(), 4);
        let minimizers = lineup
            .iter()
            .filter(|bot| bot.name() == "MinimizeScore+AntiFinish")
            .count();
        assert_eq!(minimizers, 1);
        assert!(lineup.iter().all(|bot| bot.name().ends_with("+AntiFinish")));
    }
}
