//! Play tic-tac-toe against the MCTS engine in the terminal.
//!
//! The human and the engine take turns; every move, from either side, goes
//! through `Engine::apply`, so the engine searches from a fresh tree each
//! time it is asked for a move.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use mcts_core::Game;
use mcts_engine::{
    games::{Player, TicTacToe, TicTacToeMove},
    Engine, EngineConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Tic-tac-toe against Monte Carlo Tree Search.
#[derive(Parser)]
#[command(name = "mcts-play")]
#[command(about = "Play tic-tac-toe against the MCTS engine")]
struct Cli {
    /// Which mark the human plays. X moves first.
    #[arg(long, value_enum, default_value = "x")]
    human: Side,

    /// Number of search iterations per engine move.
    #[arg(short, long, default_value = "1000")]
    iterations: usize,

    /// Optional time limit per engine move, in milliseconds.
    #[arg(short, long)]
    time_limit_ms: Option<u64>,

    /// Random seed for reproducibility.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Log more (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    X,
    O,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::X => Player::X,
            Side::O => Player::O,
        }
    }
}

/// What the human typed.
enum Input {
    Move(TicTacToeMove),
    Help,
    Quit,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn print_help() {
    println!("Possible moves:");
    println!();
    println!("NW | N | NE");
    println!("-----------");
    println!(" W | C | E ");
    println!("-----------");
    println!("SW | S | SE");
    println!();
    println!("Cells 0-8 work too. Q to quit early.");
}

/// Read one line and interpret it. `None` on end of input.
fn read_input(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<Input>> {
    print!("Move (? for help): ");
    io::stdout().flush().context("Failed to flush stdout")?;

    loop {
        let Some(line) = lines.next() else {
            return Ok(None);
        };
        let line = line.context("Failed to read from stdin")?;
        let line = line.trim();

        match line {
            "" => continue,
            "?" => return Ok(Some(Input::Help)),
            q if q.eq_ignore_ascii_case("q") => return Ok(Some(Input::Quit)),
            _ => match line.parse::<TicTacToeMove>() {
                Ok(mv) => return Ok(Some(Input::Move(mv))),
                Err(e) => {
                    println!("{}, try again", e);
                    print!("Move (? for help): ");
                    io::stdout().flush().context("Failed to flush stdout")?;
                }
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = EngineConfig {
        iterations: cli.iterations,
        time_limit: cli.time_limit_ms.map(Duration::from_millis),
    };
    if config.iterations == 0 {
        bail!("--iterations must be at least 1");
    }

    let game = TicTacToe;
    let human = Player::from(cli.human);
    let mut engine = Engine::new(game, ChaCha8Rng::seed_from_u64(cli.seed));
    info!(
        "human plays {}, engine searches {} iterations per move (seed {})",
        human, config.iterations, cli.seed
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !game.is_over(engine.board()) {
        println!("{}", engine.board());

        let mv = if engine.board().current_player() == human {
            match read_input(&mut lines)? {
                None | Some(Input::Quit) => {
                    println!("Bye");
                    return Ok(());
                }
                Some(Input::Help) => {
                    print_help();
                    continue;
                }
                Some(Input::Move(mv)) => {
                    if !game.possible_moves(engine.board()).contains(&mv) {
                        println!("{} is taken, try again", mv);
                        continue;
                    }
                    mv
                }
            }
        } else {
            let result = engine
                .search(&config)
                .context("Engine search failed")?;
            for estimate in result.iter() {
                debug!(
                    "{}: win rate {:.3} over {} visits",
                    estimate.mv, estimate.win_rate, estimate.visit_count
                );
            }
            let mv = result
                .best()
                .context("Engine found no move on an unfinished board")?;
            println!("Engine plays {}", mv);
            mv
        };

        engine.apply(&mv);
    }

    println!("{}", engine.board());
    match engine.board().winner() {
        Some(winner) => println!("Winner: {}", winner),
        None => println!("Winner: Draw"),
    }

    Ok(())
}
