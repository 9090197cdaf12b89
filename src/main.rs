//! Faction-Go: personality-driven Go opponents.
//!
//! ## Usage
//!
//! - `faction-go` - Run the personality demo
//! - `faction-go genmove --opponent tetrads XO... .....` - Ask one faction for a move
//! - `faction-go watch --opponent illuminati --size 7 --fast` - Watch a full game

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use faction_go::analysis::disputed_territory;
use faction_go::board::Color;
use faction_go::config::{PacingConfig, SessionConfig};
use faction_go::game::{BoardState, Opponent, Play};
use faction_go::pacing::Pacer;
use faction_go::personality::get_move;
use faction_go::roll::{FixedRoll, Roll, pick};
use faction_go::session::GoSession;

/// Faction-Go: personality-driven Go opponents
#[derive(Parser)]
#[command(name = "faction-go")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the move a faction would play on a board
    Genmove {
        #[arg(long, default_value = "illuminati")]
        opponent: Opponent,
        /// Side to move (black or white)
        #[arg(long, default_value = "white", value_parser = parse_color)]
        color: Color,
        /// Seed for move selection (None = random)
        #[arg(long)]
        seed: Option<u64>,
        /// Board columns, one string per x: X black, O white, . empty, # offline
        #[arg(required = true)]
        rows: Vec<String>,
    },
    /// Watch a faction play white against a random black player
    Watch {
        #[arg(long, default_value = "illuminati")]
        opponent: Opponent,
        #[arg(long, default_value = "7")]
        size: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Skip pacing delays
        #[arg(long)]
        fast: bool,
        /// End the game after this many moves
        #[arg(long, default_value = "200")]
        max_moves: usize,
    },
    /// Run the faction scenarios
    Demo,
}

fn parse_color(s: &str) -> Result<Color, String> {
    match s.to_ascii_lowercase().as_str() {
        "black" | "b" | "x" => Ok(Color::Black),
        "white" | "w" | "o" => Ok(Color::White),
        _ => Err(format!("unknown color: {s}")),
    }
}

fn show(play: Play) -> String {
    match play {
        Play::Move((x, y)) => format!("{x},{y}"),
        Play::Pass => "pass".to_string(),
        Play::GameOver => "game over".to_string(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Genmove {
            opponent,
            color,
            seed,
            rows,
        }) => genmove(opponent, color, seed, &rows).await,
        Some(Commands::Watch {
            opponent,
            size,
            seed,
            fast,
            max_moves,
        }) => {
            let mut config = SessionConfig::default()
                .with_board_size(size)
                .with_opponent(Some(opponent));
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if fast {
                config = config.with_pacing(PacingConfig::instant());
            }
            let local = tokio::task::LocalSet::new();
            local.run_until(watch(config, max_moves)).await
        }
        Some(Commands::Demo) | None => run_demo().await,
    }
}

async fn genmove(opponent: Opponent, color: Color, seed: Option<u64>, rows: &[String]) -> anyhow::Result<()> {
    let mut state = BoardState::from_rows(rows, Some(opponent)).context("invalid board")?;
    state.previous_player = Some(color.opponent());
    let pacer = Pacer::new(PacingConfig::instant());
    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let play = get_move(&state, color, opponent, &pacer, false, &mut rng).await?;
    println!("{}", show(play));
    Ok(())
}

/// Random black player against the configured faction.
async fn watch(config: SessionConfig, max_moves: usize) -> anyhow::Result<()> {
    let mut rng = match config.seed {
        Some(seed) => fastrand::Rng::with_seed(seed.wrapping_add(1)),
        None => fastrand::Rng::new(),
    };
    let session = GoSession::new(config)?;
    session.reset_promises();

    loop {
        let play = session.next_turn(Color::Black).wait().await;
        if play == Play::GameOver {
            break;
        }
        let state = session.snapshot();
        if state.move_count() > 0 {
            println!("white: {}\n{}", show(play), state.board);
        }

        if state.move_count() >= max_moves {
            session.end_game();
            break;
        }
        let available = disputed_territory(&state, Color::Black, true);
        match pick(&available, rng.roll()) {
            Some(pt) => session.play(pt, Color::Black)?,
            None => session.pass(Color::Black)?,
        };
    }

    let state = session.snapshot();
    println!("final position after {} moves\n{}", state.move_count(), state.board);
    Ok(())
}

async fn run_demo() -> anyhow::Result<()> {
    println!("Faction-Go: personality-driven Go opponents\n");

    let scenarios: [(&str, Opponent, &[&str]); 3] = [
        (
            "capture",
            Opponent::TheBlackHand,
            &["XO...", ".....", ".....", ".....", "....."],
        ),
        (
            "defend",
            Opponent::SlumSnakes,
            &["OX...", ".....", ".....", ".....", "....."],
        ),
        (
            "eye",
            Opponent::Daedalus,
            &["...O...", "OOOO...", ".......", ".......", ".......", ".......", "......."],
        ),
    ];

    let pacer = Pacer::new(PacingConfig::instant());
    for (name, opponent, rows) in scenarios {
        let state = BoardState::from_rows(rows, Some(opponent))?;
        let play = get_move(&state, Color::White, opponent, &pacer, false, &mut FixedRoll(0.0)).await?;
        println!("=== {name}: {opponent} ===");
        println!("{}", state.board);
        println!("white plays {}\n", show(play));
    }
    Ok(())
}
