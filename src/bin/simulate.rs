use std::error::Error;
use std::process;
use std::thread;
use std::time::Duration;

use clap::{ArgAction, Parser};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use fishbot::{
    Bot, Game, GameConfig, RunOutcome, Standing, Step, create_bot_from_spec, default_lineup,
    describe_event, render_snapshot, render_standings, standings,
};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;
const DEFAULT_PLAYERS: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Play one game between bots and print the standings.")]
struct Args {
    /// Seed for shuffling, hand size and first player
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Cards dealt to each player (5-8 at random when omitted)
    #[arg(long = "hand-size")]
    hand_size: Option<usize>,

    /// Opening seat (random when omitted)
    #[arg(long = "first-player")]
    first_player: Option<usize>,

    /// Pause between turns, in milliseconds
    #[arg(long = "delay-ms", default_value_t = 0)]
    delay_ms: u64,

    /// Stop after the specified number of turns
    #[arg(long = "max-turns")]
    max_turns: Option<usize>,

    /// Show the board and the acting hand before every turn
    #[arg(long = "visualize", action = ArgAction::SetTrue)]
    visualize: bool,

    /// Print the outcome as JSON instead of a table
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Log every play, draw and effect (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    /// Player bot specs: first, minscore, random[:seed], each optionally
    /// suffixed with +anti (2-4 total; a default table of 3 when omitted)
    bots: Vec<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    outcome: &'a RunOutcome,
    standings: Vec<Standing>,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let bots: Vec<Box<dyn Bot>> = if args.bots.is_empty() {
        let mut rng = StdRng::seed_from_u64(args.seed);
        default_lineup(DEFAULT_PLAYERS, &mut rng)
    } else {
        args.bots
            .iter()
            .enumerate()
            .map(|(seat, spec)| create_bot_from_spec(spec, seat, args.seed))
            .collect::<Result<_, _>>()?
    };

    let config = GameConfig {
        seed: args.seed,
        hand_size: args.hand_size,
        first_player: args.first_player,
        max_turns: args.max_turns,
    };
    let mut builder = Game::builder()
        .with_config(config)
        .with_turn_delay(Duration::from_millis(args.delay_ms));
    for (seat, bot) in bots.into_iter().enumerate() {
        let name = format!("Player {seat} [{}]", bot.name());
        builder = builder.boxed_player(name, bot);
    }
    let mut game = builder.build()?;

    let outcome = if args.visualize {
        watch(&mut game, args.max_turns, Duration::from_millis(args.delay_ms))?
    } else {
        game.run()?
    };

    if args.json {
        let report = Report {
            seed: args.seed,
            outcome: &outcome,
            standings: outcome.result().map(standings).unwrap_or_default(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &outcome {
        RunOutcome::Finished(result) => {
            println!(
                "Game finished after {} turn(s). Winner: {}.\n",
                result.turns,
                result.winner_name()
            );
            print!("{}", render_standings(result));
        }
        RunOutcome::Cancelled => println!("Simulation cancelled."),
        RunOutcome::Aborted { turns } => {
            println!("Game aborted after {turns} turn(s): no cards left to draw.")
        }
        RunOutcome::TurnLimit { turns } => {
            println!("Max turn limit reached after {turns} turn(s). Stopping simulation.")
        }
    }
    Ok(())
}

/// Drives the game one step at a time, printing the table before each turn
/// and the events it produced afterwards.
fn watch(
    game: &mut Game,
    max_turns: Option<usize>,
    delay: Duration,
) -> Result<RunOutcome, Box<dyn Error>> {
    let names: Vec<String> = game
        .board()
        .players()
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    game.setup()?;
    let mut seen = print_events(game, &names, 0);
    loop {
        if max_turns.is_some_and(|limit| game.turns() >= limit) {
            return Ok(RunOutcome::TurnLimit {
                turns: game.turns(),
            });
        }
        let board = game.board();
        println!(
            "\n--- Turn {} | {} to act ---",
            game.turns() + 1,
            names[board.current_index()]
        );
        println!(
            "{}",
            render_snapshot(&board.build_snapshot(), board.current_player().hand())
        );
        let step = game.step()?;
        seen = print_events(game, &names, seen);
        match step {
            Step::Continue => thread::sleep(delay),
            Step::Finished(result) => return Ok(RunOutcome::Finished(result)),
            Step::Aborted { turns } => return Ok(RunOutcome::Aborted { turns }),
        }
    }
}

fn print_events(game: &Game, names: &[String], from: usize) -> usize {
    let events = game.events();
    for event in &events[from..] {
        println!("  {}", describe_event(event, names));
    }
    events.len()
}
