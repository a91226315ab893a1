//! Heuristic evaluation function for Gomoku board positions
//!
//! This is not an exact game value. It biases rollout move choice and scores
//! rollouts that hit the ply cap before the game is decided.

use crate::board::{Board, Stone};
use crate::rules::{line_length, DIRECTIONS};

use super::patterns::{run_score, LineScore};

/// Evaluate the board from the perspective of the given color.
///
/// Returns a score where:
/// - Positive values indicate advantage for `color`
/// - Negative values indicate disadvantage for `color`
///
/// Antisymmetric: `evaluate_position(b, Black) == -evaluate_position(b, White)`.
#[must_use]
pub fn evaluate_position(board: &Board, color: Stone) -> i32 {
    if color == Stone::Empty {
        return 0;
    }
    side_score(board, color) - side_score(board, color.opponent())
}

/// Sum of run scores over every stone of `color` in all four directions.
///
/// A run of length n is seen from each of its n stones, so longer runs
/// count proportionally more often.
fn side_score(board: &Board, color: Stone) -> i32 {
    let Some(stones) = board.stones(color) else {
        return 0;
    };

    stones
        .iter_ones()
        .map(|pos| {
            DIRECTIONS
                .iter()
                .map(|&(dr, dc)| run_score(line_length(board, pos, dr, dc)))
                .sum::<i32>()
        })
        .sum()
}

/// Map an evaluator score into (0, 1) for rollout results.
///
/// Logistic curve; a score of `LineScore::FOUR` maps to about 0.73.
#[inline]
pub fn normalize_score(score: i32) -> f64 {
    let x = score as f64 / LineScore::FOUR as f64;
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    #[test]
    fn test_empty_board_is_zero() {
        let board = Board::new();
        assert_eq!(evaluate_position(&board, Stone::Black), 0);
        assert_eq!(evaluate_position(&board, Stone::White), 0);
    }

    #[test]
    fn test_single_stone() {
        let board = Board::new().apply_move(Pos::CENTER, Stone::Black);
        // One stone, four directions, run length 1 each
        assert_eq!(evaluate_position(&board, Stone::Black), 4 * LineScore::ONE);
        assert_eq!(evaluate_position(&board, Stone::White), -4 * LineScore::ONE);
    }

    #[test]
    fn test_two_in_a_row() {
        let board = Board::new()
            .apply_move(Pos::new(7, 7), Stone::Black)
            .apply_move(Pos::new(7, 8), Stone::Black);
        // Each stone: horizontal run of 2, three singles
        let expected = 2 * (LineScore::TWO + 3 * LineScore::ONE);
        assert_eq!(evaluate_position(&board, Stone::Black), expected);
    }

    #[test]
    fn test_antisymmetric() {
        let board = Board::new()
            .apply_move(Pos::new(7, 7), Stone::Black)
            .apply_move(Pos::new(8, 8), Stone::Black)
            .apply_move(Pos::new(7, 8), Stone::White)
            .apply_move(Pos::new(6, 8), Stone::White)
            .apply_move(Pos::new(5, 8), Stone::White);
        assert_eq!(
            evaluate_position(&board, Stone::Black),
            -evaluate_position(&board, Stone::White)
        );
        assert!(evaluate_position(&board, Stone::White) > 0);
    }

    #[test]
    fn test_longer_run_dominates() {
        let mut four = Board::new();
        for c in 3..7 {
            four.place_stone(Pos::new(7, c), Stone::Black);
        }
        let mut scattered = Board::new();
        for (r, c) in [(0, 0), (0, 5), (5, 0), (10, 10), (14, 3), (3, 14)] {
            scattered.place_stone(Pos::new(r, c), Stone::Black);
        }
        assert!(evaluate_position(&four, Stone::Black) > evaluate_position(&scattered, Stone::Black));
    }

    #[test]
    fn test_empty_color_scores_zero() {
        let board = Board::new().apply_move(Pos::CENTER, Stone::Black);
        assert_eq!(evaluate_position(&board, Stone::Empty), 0);
    }

    #[test]
    fn test_normalize_score_range() {
        assert!((normalize_score(0) - 0.5).abs() < 1e-12);
        assert!(normalize_score(LineScore::FIVE) > 0.99);
        assert!(normalize_score(-LineScore::FIVE) < 0.01);
        let s = normalize_score(i32::MAX);
        assert!((0.0..=1.0).contains(&s));
    }
}
