//! An agent to solve the game of Connect 4

use log::debug;

use crate::{position::Position, HEIGHT, WIDTH};

use std::cmp::Ordering;

/// The number of cells on the board
pub const NUM_CELLS: usize = WIDTH * HEIGHT;
/// The lower end of the maximal search window
pub const MIN_SCORE: i32 = -(NUM_CELLS as i32) / 2;
/// The upper end of the maximal search window
pub const MAX_SCORE: i32 = NUM_CELLS as i32 / 2;

/// Returns the columns ordered from the middle outwards, as
/// the middle columns are often better moves
pub const fn move_order() -> [usize; WIDTH] {
    let mut move_order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        move_order[i] = (WIDTH / 2) + (i % 2) * (i / 2 + 1) - (1 - i % 2) * (i / 2);
        i += 1;
    }
    move_order
}

/// The order children are searched in
pub const MOVE_ORDER: [usize; WIDTH] = move_order();

// score of a position where the player to move wins with their next tile
fn immediate_win_score(position: &Position) -> i32 {
    ((NUM_CELLS + 1 - position.num_moves()) / 2) as i32
}

fn has_immediate_win(position: &Position) -> bool {
    (0..WIDTH).any(|column| position.playable(column) && position.is_winning_move(column))
}

/// Scores `position` for the player to move with a fail-soft alpha-beta search
///
/// The result is exact when the true score lies inside `[alpha, beta]`. A result at or
/// below `alpha` is only an upper bound and a result at or above `beta` only a lower
/// bound. Use `[MIN_SCORE, MAX_SCORE]` for an exact score.
///
/// `node_count` is incremented once per visited position and never read.
pub fn negamax(position: &Position, mut alpha: i32, mut beta: i32, node_count: &mut u64) -> i32 {
    *node_count += 1;

    // check for draw
    if position.is_full() {
        return 0;
    }

    // check for next-move win for current player
    if has_immediate_win(position) {
        return immediate_win_score(position);
    }

    // upper bound of score, an immediate win has been ruled out
    let max = ((NUM_CELLS - 1 - position.num_moves()) / 2) as i32;
    if beta > max {
        // clamp beta to calculated upper bound
        beta = max;
    }
    // an empty window leaves nothing to explore
    if alpha >= beta {
        return beta;
    }

    // search the next level of the tree
    for &column in MOVE_ORDER.iter() {
        if !position.playable(column) {
            continue;
        }
        let mut next = *position;
        next.play_unchecked(column);

        // the search window is flipped for the other player
        let score = -negamax(&next, -beta, -alpha, node_count);
        // if a child node's score is better than beta, we can prune the tree
        // here because a perfect opponent will not pick this branch
        if score >= beta {
            return score;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

/// Scores `position` by visiting the whole game tree, without any pruning
///
/// Always returns the exact score, at the price of a much larger `node_count`.
pub fn negamax_exhaustive(position: &Position, node_count: &mut u64) -> i32 {
    *node_count += 1;

    if position.is_full() {
        return 0;
    }

    if has_immediate_win(position) {
        return immediate_win_score(position);
    }

    let mut best_score = MIN_SCORE;
    for column in 0..WIDTH {
        if position.playable(column) {
            let mut next = *position;
            next.play_unchecked(column);

            let score = -negamax_exhaustive(&next, node_count);
            if score > best_score {
                best_score = score;
            }
        }
    }
    best_score
}

/// An agent to solve Connect 4 positions
///
/// # Position Scoring
/// Scores are relative to the player to move. A position where that player wins with
/// their final tile (their 21st on a 7x6 board) scores 1, and earlier wins score higher,
/// up to 18 for a win with their 4th tile. Losses are scored the same way from the
/// opponent's side and negated. A drawn position scores 0.
#[derive(Clone, Debug)]
pub struct Solver {
    position: Position,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: u64,
}

impl Solver {
    /// Creates a new `Solver` for a position
    pub fn new(position: Position) -> Self {
        Self {
            position,
            node_count: 0,
        }
    }

    /// Calculates the exact score of the position (see [Position Scoring])
    ///
    /// [Position Scoring]: #position-scoring
    pub fn solve(&mut self) -> i32 {
        let score = self.solve_window(MIN_SCORE, MAX_SCORE);
        debug!(
            "solved position after {} moves: score {}, {} nodes",
            self.position.num_moves(),
            score,
            self.node_count
        );
        score
    }

    /// Searches within `[alpha, beta]`, see [`negamax`] for the meaning of the result
    pub fn solve_window(&mut self, alpha: i32, beta: i32) -> i32 {
        negamax(&self.position, alpha, beta, &mut self.node_count)
    }

    /// Calculates the exact score of the position without alpha-beta pruning
    pub fn solve_exhaustive(&mut self) -> i32 {
        negamax_exhaustive(&self.position, &mut self.node_count)
    }

    /// Scores every column for the player to move, `None` for full columns
    pub fn analyze(&mut self) -> [Option<i32>; WIDTH] {
        let mut scores = [None; WIDTH];
        for (column, score) in scores.iter_mut().enumerate() {
            if !self.position.playable(column) {
                continue;
            }
            *score = Some(if self.position.is_winning_move(column) {
                immediate_win_score(&self.position)
            } else {
                let mut next = self.position;
                next.play_unchecked(column);
                -negamax(&next, MIN_SCORE, MAX_SCORE, &mut self.node_count)
            });
        }
        scores
    }

    /// Converts a position score to a distance in the player to move's own tiles
    ///
    /// For a win this is the number of tiles the player still has to drop, including the
    /// winning one. For a loss it is the number of tiles they drop before the opponent
    /// wins, and for a draw the number of tiles they drop before the board is full.
    pub fn score_to_win_distance(&self, score: i32) -> usize {
        let num_moves = self.position.num_moves() as i32;
        let half_board = MAX_SCORE + 1;
        let distance = match score.cmp(&0) {
            Ordering::Equal => (NUM_CELLS as i32 - num_moves + 1) / 2,
            // the mover has dropped num_moves / 2 tiles so far
            Ordering::Greater => half_board - score - num_moves / 2,
            // the opponent has dropped (num_moves + 1) / 2 tiles so far
            Ordering::Less => half_board + score - (num_moves + 1) / 2,
        };
        distance.max(0) as usize
    }
}

impl std::ops::Deref for Solver {
    type Target = Position;

    fn deref(&self) -> &Self::Target {
        &self.position
    }
}
