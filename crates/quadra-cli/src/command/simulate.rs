use chrono::{DateTime, Utc};
use quadra_engine::{BoardSnapshot, BoardState, GameDriver, ShapeSeed};
use rand::Rng as _;
use serde::Serialize;

use crate::oracle::RandomOracle;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of sessions to run
    #[clap(long, default_value_t = 10)]
    games: usize,
    /// Hex shape seed (32 characters) for the first session; the rest draw
    /// fresh seeds
    #[clap(long)]
    seed: Option<ShapeSeed>,
    /// Stop a session after this many ticks even if the board never fills
    #[clap(long, default_value_t = 200_000)]
    max_ticks: u64,
    /// Emit the report as JSON
    #[clap(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SessionReport {
    session: usize,
    seed: ShapeSeed,
    ticks: u64,
    lines_cleared: usize,
    pieces_locked: usize,
    line_clear_histogram: [usize; 5],
    final_board: BoardSnapshot,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    generated_at: DateTime<Utc>,
    games: usize,
    max_ticks: u64,
    total_lines: usize,
    total_pieces: usize,
    sessions: Vec<SessionReport>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let mut sessions = Vec::with_capacity(arg.games);
    for session in 0..arg.games {
        let seed = match (arg.seed, session) {
            (Some(seed), 0) => seed,
            _ => rand::rng().random(),
        };
        let report = run_session(session, seed, arg.max_ticks);
        if !arg.json {
            println!(
                "session {:>3}: {:>4} lines, {:>5} pieces, {:>7} ticks (seed {})",
                report.session, report.lines_cleared, report.pieces_locked, report.ticks, report.seed,
            );
        }
        sessions.push(report);
    }

    let total_lines = sessions.iter().map(|s| s.lines_cleared).sum::<usize>();
    let total_pieces = sessions.iter().map(|s| s.pieces_locked).sum::<usize>();

    if arg.json {
        let report = SimulationReport {
            generated_at: Utc::now(),
            games: arg.games,
            max_ticks: arg.max_ticks,
            total_lines,
            total_pieces,
            sessions,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        // Line-to-point conversion matches the classic 100-points-per-line
        // status bar display.
        println!(
            "total: {} lines ({} points), {} pieces across {} sessions",
            total_lines,
            total_lines * 100,
            total_pieces,
            arg.games,
        );
    }

    Ok(())
}

fn run_session(session: usize, seed: ShapeSeed, max_ticks: u64) -> SessionReport {
    let board = BoardState::with_seed(seed);
    let mut driver = GameDriver::with_board(board, Some(Box::new(RandomOracle::new())));
    driver.start();

    let mut ticks = 0;
    while driver.state().is_running() && ticks < max_ticks {
        driver.tick();
        ticks += 1;
    }

    let board = driver.board();
    SessionReport {
        session,
        seed,
        ticks,
        lines_cleared: board.score(),
        pieces_locked: board.stats().completed_pieces(),
        line_clear_histogram: *board.stats().line_cleared_counter(),
        final_board: board.snapshot(),
    }
}
