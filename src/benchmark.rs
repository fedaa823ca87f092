//! Validation and benchmarking of solver output against a reference dataset
//!
//! A dataset line starts with `<position> <reference score>`, anything after that is
//! ignored. An output line is a solver report, `<position> <score> <nodes> <microseconds>`.
//! Lines are matched by line number.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{debug, info};
use rayon::prelude::*;

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::driver::{Algorithm, Query, Report};

/// A problem found on one line of the output (line numbers start at 1)
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Discrepancy {
    /// The output ended before the dataset, later lines are not checked
    MissingLine { line: usize },
    PositionMismatch {
        line: usize,
        expected: String,
        actual: String,
    },
    ScoreMismatch {
        line: usize,
        expected: i32,
        actual: i32,
    },
    Malformed { line: usize, reason: String },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::MissingLine { line } => {
                write!(f, "missing lines in output file from line {}", line)
            }
            Discrepancy::PositionMismatch {
                line,
                expected,
                actual,
            } => write!(
                f,
                "mismatched position on line {}: expected {:?}, got {:?}",
                line, expected, actual
            ),
            Discrepancy::ScoreMismatch {
                line,
                expected,
                actual,
            } => write!(
                f,
                "mismatched score on line {}: expected {}, got {}",
                line, expected, actual
            ),
            Discrepancy::Malformed { line, reason } => {
                write!(f, "malformed line {}: {}", line, reason)
            }
        }
    }
}

/// Whether a candidate score is acceptable for a reference score
///
/// Besides an exact match, a weak solver that only reports who wins is accepted:
/// it answers `1` or `-1` with the sign of the reference score.
pub fn scores_agree(reference: i32, candidate: i32) -> bool {
    reference == candidate || (reference.signum() == candidate.signum() && candidate.abs() == 1)
}

/// The outcome of checking an output file against a dataset
#[derive(Clone, Debug, Default)]
pub struct Comparison {
    /// Number of dataset lines that had a matching output line
    pub lines: usize,
    pub discrepancies: Vec<Discrepancy>,
    total_nodes: u64,
    total_micros: u64,
    measured: usize,
}

impl Comparison {
    pub fn is_valid(&self) -> bool {
        self.discrepancies.is_empty()
    }

    /// Mean node count over every output line whose statistics could be read
    pub fn mean_node_count(&self) -> Option<f64> {
        self.mean(self.total_nodes)
    }

    /// Mean computation time in microseconds, over the same lines as `mean_node_count`
    pub fn mean_elapsed_micros(&self) -> Option<f64> {
        self.mean(self.total_micros)
    }

    fn mean(&self, total: u64) -> Option<f64> {
        match self.measured {
            0 => None,
            measured => Some(total as f64 / measured as f64),
        }
    }

    fn check_line(&mut self, line: usize, reference: &str, candidate: &str) -> Option<Discrepancy> {
        let mut expected = reference.split_whitespace();
        let mut actual = candidate.split_whitespace();

        let expected_position = expected.next().unwrap_or_default();
        let actual_position = actual.next().unwrap_or_default();
        if expected_position != actual_position {
            return Some(Discrepancy::PositionMismatch {
                line,
                expected: expected_position.to_string(),
                actual: actual_position.to_string(),
            });
        }

        let parsed = parse_token::<i32>(expected.next(), "reference score").and_then(|expected| {
            Ok((
                expected,
                parse_token::<i32>(actual.next(), "score")?,
                parse_token::<u64>(actual.next(), "node count")?,
                parse_token::<u64>(actual.next(), "elapsed time")?,
            ))
        });
        let (expected_score, actual_score, nodes, micros) = match parsed {
            Ok(tokens) => tokens,
            Err(reason) => return Some(Discrepancy::Malformed { line, reason }),
        };

        self.total_nodes += nodes;
        self.total_micros += micros;
        self.measured += 1;

        if !scores_agree(expected_score, actual_score) {
            return Some(Discrepancy::ScoreMismatch {
                line,
                expected: expected_score,
                actual: actual_score,
            });
        }
        None
    }
}

fn parse_token<T: FromStr>(token: Option<&str>, name: &str) -> Result<T, String> {
    let token = token.ok_or_else(|| format!("no {} given", name))?;
    token
        .parse()
        .map_err(|_| format!("could not parse {:?} as a {}", token, name))
}

/// Checks every line of `output` against the same line of `dataset`
///
/// Every mismatching line is recorded, the comparison only stops early when the output
/// runs out of lines.
pub fn compare<D: BufRead, O: BufRead>(dataset: D, output: O) -> Result<Comparison> {
    let mut comparison = Comparison::default();
    let mut output_lines = output.lines();

    for (index, reference) in dataset.lines().enumerate() {
        let line = index + 1;
        let reference = reference.with_context(|| format!("failed to read dataset line {}", line))?;
        // the solvers skip blank lines without answering them
        if reference.trim().is_empty() {
            continue;
        }

        let candidate = match output_lines.next() {
            Some(candidate) => {
                candidate.with_context(|| format!("failed to read output line {}", line))?
            }
            None => {
                comparison.discrepancies.push(Discrepancy::MissingLine { line });
                break;
            }
        };
        comparison.lines += 1;

        if let Some(discrepancy) = comparison.check_line(line, &reference, &candidate) {
            comparison.discrepancies.push(discrepancy);
        }
    }

    info!(
        "compared {} lines, {} discrepancies",
        comparison.lines,
        comparison.discrepancies.len()
    );
    Ok(comparison)
}

/// Solves every position of a dataset, returning the reports in dataset order
///
/// Positions are spread over the rayon thread pool, each search runs on a single thread.
/// Concurrent searches compete for the CPU, so elapsed times are only comparable
/// between runs made with the same number of threads.
pub fn solve_dataset<D: BufRead>(
    dataset: D,
    algorithm: Algorithm,
    progress: &ProgressBar,
) -> Result<Vec<Report>> {
    let mut queries = Vec::new();
    for (index, line) in dataset.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read dataset line {}", index + 1))?;
        // a blank line would otherwise be read as the empty board
        let moves = match line.split_whitespace().next() {
            Some(moves) => moves,
            None => {
                debug!("skipping blank dataset line {}", index + 1);
                continue;
            }
        };
        queries.push(
            Query::parse(moves)
                .with_context(|| format!("dataset line {} is not a legal position", index + 1))?,
        );
    }

    info!("solving {} positions with {:?}", queries.len(), algorithm);
    progress.set_length(queries.len() as u64);

    let reports = queries
        .par_iter()
        .map_with(progress.clone(), |progress, query| {
            let report = query.solve(algorithm);
            progress.inc(1);
            report
        })
        .collect();

    progress.finish();
    Ok(reports)
}
