//! Validates and benchmarks Connect 4 solvers that speak the line protocol
//!
//! - `compare` checks an existing output file against a reference dataset
//! - `run` solves the dataset with this crate's solver first, then checks the result

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use connect4_negamax::{
    benchmark::{self, Comparison},
    driver::Algorithm,
};

#[derive(Parser, Debug)]
#[command(name = "benchmarker")]
#[command(about = "Validates and benchmarks Connect 4 solver output against a reference dataset")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare a solver output file with a dataset
    Compare {
        /// Reference dataset, `<position> <score>` per line
        dataset: PathBuf,

        /// Solver output, `<position> <score> <nodes> <microseconds>` per line
        output: PathBuf,
    },

    /// Solve every position of a dataset, then compare the results with it
    Run {
        /// Reference dataset, `<position> <score>` per line
        dataset: PathBuf,

        /// Also write the solver output to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Search the whole game tree instead of pruning with alpha-beta
        #[arg(long)]
        exhaustive: bool,

        /// Number of positions solved at the same time (defaults to one per CPU)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("bad path supplied: {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn print_comparison(comparison: &Comparison) -> Result<()> {
    for discrepancy in comparison.discrepancies.iter() {
        println!("Error: {}", discrepancy);
    }
    if !comparison.is_valid() {
        bail!(
            "found {} mismatches over {} lines",
            comparison.discrepancies.len(),
            comparison.lines
        );
    }

    println!("Solver output validated: no mismatches found.");
    println!("Benchmarking metrics:");
    match (comparison.mean_node_count(), comparison.mean_elapsed_micros()) {
        (Some(nodes), Some(micros)) => {
            println!("Mean # of nodes explored per position: {:.1}", nodes);
            println!("Mean time for computation per position (us): {:.1}", micros);
        }
        _ => println!("No positions to measure"),
    }
    Ok(())
}

fn run(dataset: &Path, output: Option<&Path>, algorithm: Algorithm, jobs: Option<usize>) -> Result<()> {
    if let Some(jobs) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to set up the thread pool")?;
    }

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Solving positions: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let reports = benchmark::solve_dataset(open(dataset)?, algorithm, &progress)?;
    let lines: String = reports.iter().map(|report| format!("{}\n", report)).collect();

    if let Some(path) = output {
        let mut file = BufWriter::new(
            File::create(path).with_context(|| format!("could not create {}", path.display()))?,
        );
        file.write_all(lines.as_bytes())?;
        file.flush()?;
        info!("wrote {} reports to {}", reports.len(), path.display());
    }

    let comparison = benchmark::compare(open(dataset)?, Cursor::new(lines))?;
    print_comparison(&comparison)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    match Cli::parse().command {
        Command::Compare { dataset, output } => {
            let comparison = benchmark::compare(open(&dataset)?, open(&output)?)?;
            print_comparison(&comparison)
        }
        Command::Run {
            dataset,
            output,
            exhaustive,
            jobs,
        } => {
            let algorithm = if exhaustive {
                Algorithm::Exhaustive
            } else {
                Algorithm::AlphaBeta
            };
            run(&dataset, output.as_deref(), algorithm, jobs)
        }
    }
}
