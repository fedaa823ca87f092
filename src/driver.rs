//! The line protocol spoken by the solver binary
//!
//! Every input line is a move string replayed from an empty board. For each accepted
//! line one output line is written:
//!
//! ```text
//! <position> <score> <node count> <elapsed microseconds>
//! ```
//!
//! Lines that do not describe a legal position are rejected with a logged diagnostic
//! and produce no output, the lines after them are still processed.

use anyhow::{Context, Result};
use log::{debug, info, warn};

use std::fmt;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use crate::{error::PositionError, position::Position, solver::Solver};

/// The search used to score queries
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Algorithm {
    /// Negamax with alpha-beta pruning and center-out move ordering
    AlphaBeta,
    /// Negamax over the whole game tree
    Exhaustive,
}

/// A validated input line, ready to be solved
#[derive(Clone, Debug)]
pub struct Query {
    moves: String,
    position: Position,
}

impl Query {
    pub fn parse(line: &str) -> Result<Self, PositionError> {
        let moves = line.trim();
        Ok(Self {
            moves: moves.to_string(),
            position: Position::from_moves(moves)?,
        })
    }

    pub fn moves(&self) -> &str {
        &self.moves
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Scores the position and times the search
    pub fn solve(&self, algorithm: Algorithm) -> Report {
        let mut solver = Solver::new(self.position);

        let start_time = Instant::now();
        let score = match algorithm {
            Algorithm::AlphaBeta => solver.solve(),
            Algorithm::Exhaustive => solver.solve_exhaustive(),
        };
        let elapsed = start_time.elapsed();

        Report {
            position: self.moves.clone(),
            score,
            node_count: solver.node_count,
            elapsed,
        }
    }
}

/// The result of one query, formatted as an output line by `Display`
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub position: String,
    pub score: i32,
    pub node_count: u64,
    pub elapsed: Duration,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.position,
            self.score,
            self.node_count,
            self.elapsed.as_micros()
        )
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub solved: usize,
    pub rejected: usize,
    /// Blank lines, which are neither solved nor rejected
    pub skipped: usize,
}

/// Answers every line of `input` on `output`, in input order
///
/// `inspect` sees each accepted query before it is solved. Blank lines are skipped and
/// lines that are not valid UTF-8 are rejected like any other illegal position. Only I/O
/// failures (and errors returned by `inspect`) abort the run.
pub fn run<R, W, F>(input: R, mut output: W, algorithm: Algorithm, mut inspect: F) -> Result<RunSummary>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Query) -> Result<()>,
{
    let mut summary = RunSummary::default();

    for (index, bytes) in input.split(b'\n').enumerate() {
        let line_num = index + 1;
        let bytes = bytes.with_context(|| format!("failed to read input line {}", line_num))?;
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(err) => {
                warn!("rejected line {}: {}", line_num, err);
                summary.rejected += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            info!("skipping blank line {}", line_num);
            summary.skipped += 1;
            continue;
        }

        let query = match Query::parse(&line) {
            Ok(query) => query,
            Err(err) => {
                warn!("rejected line {} ({:?}): {}", line_num, line.trim(), err);
                summary.rejected += 1;
                continue;
            }
        };
        inspect(&query)?;

        let report = query.solve(algorithm);
        debug!(
            "line {}: score {}, {} nodes in {:?}",
            line_num, report.score, report.node_count, report.elapsed
        );

        writeln!(output, "{}", report)?;
        output.flush()?;
        summary.solved += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Cursor;

    use crate::error::IllegalInputKind;

    #[test]
    fn report_line_format() {
        let report = Report {
            position: "4453".to_string(),
            score: -2,
            node_count: 1234,
            elapsed: Duration::from_micros(5678),
        };
        assert_eq!(report.to_string(), "4453 -2 1234 5678");
    }

    #[test]
    fn query_trims_line_endings() -> Result<()> {
        let query = Query::parse("4453\r\n")?;
        assert_eq!(query.moves(), "4453");
        assert_eq!(query.position().num_moves(), 4);

        assert!(matches!(
            Query::parse("44 53"),
            Err(PositionError::IllegalInput {
                offset: 2,
                kind: IllegalInputKind::NotAColumn(' '),
            })
        ));
        Ok(())
    }

    #[test]
    fn rejects_bad_lines_and_keeps_going() -> Result<()> {
        let input = "7422341735647741166133573473242566\n\
                     44a\n\
                     \n\
                     1111111\n\
                     2252576253462244111563365343671351441\n";
        let mut output = Vec::new();
        let mut inspected = Vec::new();

        let summary = run(Cursor::new(input), &mut output, Algorithm::AlphaBeta, |query| {
            inspected.push(query.moves().to_string());
            Ok(())
        })?;

        assert_eq!(
            summary,
            RunSummary {
                solved: 2,
                rejected: 2,
                skipped: 1,
            }
        );
        assert_eq!(
            inspected,
            vec![
                "7422341735647741166133573473242566",
                "2252576253462244111563365343671351441"
            ]
        );

        let output = String::from_utf8(output)?;
        let lines: Vec<Vec<&str>> = output
            .lines()
            .map(|line| line.split_whitespace().collect())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][..3], ["7422341735647741166133573473242566", "1", "39"]);
        assert_eq!(lines[1][..3], ["2252576253462244111563365343671351441", "-1", "5"]);
        assert!(lines.iter().all(|tokens| tokens.len() == 4 && tokens[3].parse::<u64>().is_ok()));
        Ok(())
    }

    #[test]
    fn invalid_utf8_line_is_rejected() -> Result<()> {
        let input: &[u8] = b"7422341735647741166133573473242566\n\
                             \xff\xfe\n\
                             2252576253462244111563365343671351441\n";
        let mut output = Vec::new();

        let summary = run(Cursor::new(input), &mut output, Algorithm::AlphaBeta, |_| Ok(()))?;
        assert_eq!(
            summary,
            RunSummary {
                solved: 2,
                rejected: 1,
                skipped: 0,
            }
        );

        let output = String::from_utf8(output)?;
        let positions: Vec<&str> = output
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(
            positions,
            vec![
                "7422341735647741166133573473242566",
                "2252576253462244111563365343671351441"
            ]
        );
        Ok(())
    }

    #[test]
    fn exhaustive_agrees_with_alpha_beta() -> Result<()> {
        let query = Query::parse("7422341735647741166133573473242566")?;
        let pruned = query.solve(Algorithm::AlphaBeta);
        let exhaustive = query.solve(Algorithm::Exhaustive);

        assert_eq!(pruned.score, exhaustive.score);
        assert_eq!(pruned.position, exhaustive.position);
        assert!(pruned.node_count <= exhaustive.node_count);
        Ok(())
    }
}
