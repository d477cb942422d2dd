use std::collections::HashMap;
use std::error::Error;
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fishbot::{Bot, Game, RunOutcome, create_bot_from_spec, label_for_spec, standings};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x5EED_u64;

#[derive(Parser, Debug)]
#[command(name = "winrate", about = "Run multiple games and report per-bot win rates.")]
struct Args {
    /// Number of games to simulate
    #[arg(short = 'g', long = "games", default_value_t = 200)]
    games: usize,

    /// Base RNG seed (deck + bot RNGs will be derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Safety cap on turns per game; capped games count as no-result
    #[arg(long = "max-turns", default_value_t = 2000)]
    max_turns: usize,

    /// Fixed hand size (5-8 at random when omitted)
    #[arg(long = "hand-size")]
    hand_size: Option<usize>,

    /// Print the summary as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Player bot specs: e.g., minscore+anti first random (2-4 total)
    bots: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
struct LabelStats {
    label: String,
    wins: usize,
    seats: usize,
    /// Sum of points left in hand over every seat the label played.
    points: u64,
}

impl LabelStats {
    fn rate(&self) -> f64 {
        if self.seats == 0 {
            0.0
        } else {
            self.wins as f64 / self.seats as f64
        }
    }

    fn avg_points(&self) -> f64 {
        if self.seats == 0 {
            0.0
        } else {
            self.points as f64 / self.seats as f64
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    games: usize,
    seed: u64,
    finished: usize,
    aborted: usize,
    turn_limited: usize,
    /// Turns summed over finished games only.
    finished_turns: usize,
    labels: Vec<LabelStats>,
}

impl Summary {
    fn average_length(&self) -> Option<f64> {
        if self.finished == 0 {
            return None;
        }
        Some(self.finished_turns as f64 / self.finished as f64)
    }
}

fn main() {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.bots.len() < 2 || args.bots.len() > 4 {
        return Err(format!(
            "expected between 2 and 4 bot specs (e.g., minscore first), received {}",
            args.bots.len()
        )
        .into());
    }

    let players_per_game = args.bots.len();
    let labels_for_spec: Vec<String> = args.bots.iter().map(|s| label_for_spec(s)).collect();
    let mut stats: HashMap<String, LabelStats> = HashMap::new();
    let mut summary = Summary {
        games: args.games,
        seed: args.seed,
        finished: 0,
        aborted: 0,
        turn_limited: 0,
        finished_turns: 0,
        labels: Vec::new(),
    };

    let started = Instant::now();
    for game_idx in 0..args.games {
        // Permute seating each game for fairness.
        let mut indices: Vec<usize> = (0..players_per_game).collect();
        let mut seat_rng = StdRng::seed_from_u64(args.seed ^ 0x9E37_79B9 ^ (game_idx as u64));
        indices.shuffle(&mut seat_rng);

        let game_seed = mix_seed(args.seed, game_idx as u64, 0x5EED_15);
        let mut builder = Game::builder()
            .with_seed(game_seed)
            .with_max_turns(args.max_turns);
        if let Some(hand_size) = args.hand_size {
            builder = builder.with_hand_size(hand_size);
        }
        let mut labels: Vec<String> = Vec::with_capacity(players_per_game);
        for (seat, src_idx) in indices.iter().enumerate() {
            let bot_seed = mix_seed(args.seed, game_idx as u64, seat as u64);
            let bot: Box<dyn Bot> = create_bot_from_spec(&args.bots[*src_idx], seat, bot_seed)?;
            let label = labels_for_spec[*src_idx].clone();
            builder = builder.boxed_player(format!("{label} #{seat}"), bot);
            labels.push(label);
        }
        for label in &labels {
            let entry = stats.entry(label.clone()).or_insert_with(|| LabelStats {
                label: label.clone(),
                ..LabelStats::default()
            });
            entry.seats += 1;
        }

        let mut game = builder.build()?;
        match game.run()? {
            RunOutcome::Finished(result) => {
                summary.finished += 1;
                summary.finished_turns += result.turns;
                if let Some(entry) = stats.get_mut(&labels[result.winner]) {
                    entry.wins += 1;
                }
                for row in standings(&result) {
                    if let Some(entry) = stats.get_mut(&labels[row.id]) {
                        entry.points += u64::from(row.points);
                    }
                }
            }
            RunOutcome::Aborted { .. } => summary.aborted += 1,
            RunOutcome::TurnLimit { .. } => summary.turn_limited += 1,
            RunOutcome::Cancelled => {}
        }
    }
    info!(
        target: "fishbot.winrate",
        games = args.games,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch complete"
    );

    let mut labels: Vec<LabelStats> = stats.into_values().collect();
    // Sort by rate desc, then by label.
    labels.sort_by(|a, b| {
        b.rate()
            .partial_cmp(&a.rate())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
    summary.labels = labels;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Win rates (per-seat) over {} game(s):", summary.games);
    for entry in &summary.labels {
        println!(
            "  {:<16}  {}/{}  ({:.2}%)   avg pts left: {:>6.2}",
            entry.label,
            entry.wins,
            entry.seats,
            entry.rate() * 100.0,
            entry.avg_points()
        );
    }
    if let Some(avg) = summary.average_length() {
        println!("\nAverage length of finished games: {avg:.1} turn(s)");
    }
    if summary.aborted > 0 {
        println!("Note: {} game(s) aborted with nothing left to draw.", summary.aborted);
    }
    if summary.turn_limited > 0 {
        println!(
            "Note: {} game(s) hit the {}-turn cap.",
            summary.turn_limited, args.max_turns
        );
    }
    Ok(())
}

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    let mut z =
        base ^ (a.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (b.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}
