#[cfg(test)]
pub mod test {
    use anyhow::{anyhow, Result};
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use std::time::Duration;

    use crate::driver::{Algorithm, Query};
    use crate::{Position, Solver};

    // solves every line of a reference dataset and checks the score
    fn run_dataset(path: &str, algorithm: Algorithm) -> Result<(Duration, f64)> {
        let file = BufReader::new(File::open(path)?);

        let mut times = vec![];
        let mut posis = vec![];

        for line in file.lines() {
            let buf = line?;
            let mut test_data = buf.split_whitespace();
            let moves = test_data
                .next()
                .ok_or_else(|| anyhow!("invalid test data: {:?}", buf))?;
            let score = test_data
                .next()
                .ok_or_else(|| anyhow!("invalid test data: {:?}", buf))?
                .parse::<i32>()?;

            let report = Query::parse(moves)?.solve(algorithm);
            assert_eq!(report.score, score, "wrong score for {}", moves);
            times.push(report.elapsed);
            posis.push(report.node_count);
        }

        Ok((
            times.iter().sum::<Duration>() / times.len() as u32,
            posis.iter().sum::<u64>() as f64 / posis.len() as f64,
        ))
    }

    #[test]
    pub fn end_easy() -> Result<()> {
        let (time, posis) = run_dataset("test_data/end_easy", Algorithm::AlphaBeta)?;
        println!(
            "End-easy:\nMean time: {:.6}ms, Mean no. of positions: {}",
            time.as_secs_f64() * 1000.0,
            posis
        );
        Ok(())
    }

    #[test]
    pub fn end_easy_exhaustive() -> Result<()> {
        let (time, posis) = run_dataset("test_data/end_easy", Algorithm::Exhaustive)?;
        println!(
            "End-easy (exhaustive):\nMean time: {:.6}ms, Mean no. of positions: {}",
            time.as_secs_f64() * 1000.0,
            posis
        );
        Ok(())
    }

    #[test]
    pub fn middle_easy() -> Result<()> {
        let (time, posis) = run_dataset("test_data/middle_easy", Algorithm::AlphaBeta)?;
        println!(
            "Middle-easy:\nMean time: {:.6}ms, Mean no. of positions: {}",
            time.as_secs_f64() * 1000.0,
            posis
        );
        Ok(())
    }

    #[test]
    pub fn pruning_saves_nodes() -> Result<()> {
        let file = BufReader::new(File::open("test_data/end_easy")?);
        for line in file.lines() {
            let line = line?;
            let moves = line.split_whitespace().next().unwrap_or_default();

            let mut pruned = Solver::new(Position::from_moves(moves)?);
            let mut exhaustive = pruned.clone();
            assert_eq!(pruned.solve(), exhaustive.solve_exhaustive());
            assert!(pruned.node_count <= exhaustive.node_count);
        }
        Ok(())
    }
}
