use anyhow::Result;
use clap::Parser;
use log::info;

use std::cmp::Ordering;
use std::io::{stdin, stdout};

use connect4_negamax::{
    driver::{self, Algorithm, Query},
    Solver,
};

mod display;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Scores Connect 4 positions read from stdin, one move string per line"
)]
struct Cli {
    /// Search the whole game tree instead of pruning with alpha-beta
    #[arg(long)]
    exhaustive: bool,

    /// Draw each position on stderr before solving it
    #[arg(long)]
    show_board: bool,

    /// Score every column of each position on stderr before solving it
    #[arg(long)]
    analyze: bool,
}

// explain the outcome of each column from the point of view of the player to move
fn describe(query: &Query) {
    let mut solver = Solver::new(*query.position());
    let scores = solver.analyze();

    for (column, score) in scores.iter().enumerate() {
        if let Some(score) = *score {
            let distance = solver.score_to_win_distance(score);
            let move_string = if distance == 1 { "move" } else { "moves" };
            let verdict = match score.cmp(&0) {
                Ordering::Greater => format!("wins in at most {} {}", distance, move_string),
                Ordering::Less => format!("loses after at most {} {}", distance, move_string),
                Ordering::Equal => format!("draws, {} {} remaining", distance, move_string),
            };
            eprintln!("column {}: score {:>3}, {}", column + 1, score, verdict);
        }
    }

    let best = scores
        .iter()
        .enumerate()
        .filter_map(|(column, score)| score.map(|score| (score, column)))
        // prefer the leftmost column among equal scores
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    match best {
        Some((score, column)) => eprintln!("Best move: {} (score {})", column + 1, score),
        None => eprintln!("The board is full"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let algorithm = if cli.exhaustive {
        Algorithm::Exhaustive
    } else {
        Algorithm::AlphaBeta
    };

    let stdin = stdin();
    let stdout = stdout();
    let summary = driver::run(stdin.lock(), stdout.lock(), algorithm, |query| {
        if cli.show_board {
            display::display(query.position())?;
        }
        if cli.analyze {
            describe(query);
        }
        Ok(())
    })?;

    info!(
        "solved {} positions, rejected {} lines, skipped {} blank lines",
        summary.solved, summary.rejected, summary.skipped
    );
    Ok(())
}
