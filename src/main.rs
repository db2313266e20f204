//! Bitreversi: a bitboard Othello engine.
//!
//! ## Usage
//!
//! - `bitreversi` - Show a demo
//! - `bitreversi eval --strategy mcts <board>` - Score every cell of a position
//! - `bitreversi play --black mcts --white mc` - Play one game between two strategies

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use bitreversi::constants::{DEFAULT_EXPLORATION, DEFAULT_PLAYOUTS, N};
use bitreversi::game::play_game;
use bitreversi::position::{Position, cell_name};
use bitreversi::strategy::{SearchSettings, StrategyKind};

/// Bitreversi: a bitboard Othello engine with Monte Carlo search
#[derive(Parser)]
#[command(name = "bitreversi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every cell of a position and print the chosen move
    Eval {
        /// Strategy used for scoring
        #[arg(short, long, value_enum, default_value = "mcts")]
        strategy: StrategyKind,
        /// 64 cells, row-major: X to move, O opponent, . empty (whitespace ignored).
        /// Defaults to the starting position.
        board: Option<String>,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play one game between two strategies
    Play {
        #[arg(long, value_enum, default_value = "mcts")]
        black: StrategyKind,
        #[arg(long, value_enum, default_value = "mc")]
        white: StrategyKind,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Run a simple demo of the engine
    Demo,
}

#[derive(Args)]
struct SearchArgs {
    /// Playouts (flat Monte Carlo) or iterations (MCTS) per decision
    #[arg(short, long, default_value_t = DEFAULT_PLAYOUTS)]
    playouts: usize,
    /// UCB1 exploration parameter
    #[arg(short, long, default_value_t = DEFAULT_EXPLORATION)]
    exploration: f64,
    /// Random seed for reproducible results
    #[arg(long)]
    seed: Option<u64>,
}

impl From<&SearchArgs> for SearchSettings {
    fn from(args: &SearchArgs) -> Self {
        Self {
            playouts: args.playouts,
            exploration: args.exploration,
            seed: args.seed,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Eval {
            strategy,
            board,
            search,
        }) => {
            let pos = match board {
                Some(text) => text.parse::<Position>().context("invalid board")?,
                None => Position::initial(),
            };
            run_eval(pos, strategy, &SearchSettings::from(&search));
        }
        Some(Commands::Play {
            black,
            white,
            search,
        }) => {
            run_game(black, white, &SearchSettings::from(&search))?;
        }
        Some(Commands::Demo) | None => {
            run_demo()?;
        }
    }
    Ok(())
}

fn run_eval(pos: Position, kind: StrategyKind, settings: &SearchSettings) {
    let mut player = kind.build(settings);
    println!("{pos}");

    let scores = player.score_cells(pos.own, pos.opponent);
    for row in 0..N {
        let line: Vec<String> = (0..N)
            .map(|col| {
                let s = scores[row * N + col];
                if s.is_nan() {
                    "  -  ".to_string()
                } else {
                    format!("{s:5.3}")
                }
            })
            .collect();
        println!("{} {}", row + 1, line.join(" "));
    }

    let mv = player.pick(pos.own, pos.opponent, &scores);
    println!("{}: {}", player.name(), cell_name(mv));
}

fn run_game(black: StrategyKind, white: StrategyKind, settings: &SearchSettings) -> Result<()> {
    let mut black_player = black.build(settings);
    // Offset the seed so identical strategies do not mirror each other
    let white_settings = SearchSettings {
        seed: settings.seed.map(|s| s.wrapping_add(1)),
        ..*settings
    };
    let mut white_player = white.build(&white_settings);

    let record = play_game(black_player.as_mut(), white_player.as_mut())?;
    println!("{}", record.transcript());
    println!("black {} - white {}", record.black, record.white);
    match record.winner() {
        Some(color) => println!("{color} wins"),
        None => println!("draw"),
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Bitreversi: Bitboard Othello Engine\n");

    let pos = Position::initial();
    println!("=== Starting Position ===");
    println!("{pos}");
    println!(
        "{} legal moves, {} empty cells",
        pos.legal_moves().count_ones(),
        pos.empties()
    );

    println!("\n=== Scoring Demo ===");
    let settings = SearchSettings {
        playouts: 256,
        seed: Some(1),
        ..SearchSettings::default()
    };
    for kind in [
        StrategyKind::MaxCount,
        StrategyKind::MinOpen,
        StrategyKind::MonteCarlo,
        StrategyKind::Mcts,
    ] {
        let mut player = kind.build(&settings);
        let mv = player.choose_move(pos.own, pos.opponent);
        println!("{:>12}: {}", player.name(), cell_name(mv));
    }

    println!("\n=== Game Demo: mcts vs mc ===");
    run_game(StrategyKind::Mcts, StrategyKind::MonteCarlo, &settings)
}
