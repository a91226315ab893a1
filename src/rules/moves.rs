//! Candidate move generation
//!
//! Only empty cells near existing stones are considered. This keeps the
//! branching factor of the search tree in the tens instead of the hundreds.

use crate::board::{Board, Pos, TOTAL_CELLS};

/// Chebyshev distance from an occupied cell within which empty cells are candidates
pub const CANDIDATE_RADIUS: i32 = 2;

/// Candidate moves for the side to move.
///
/// An empty board yields only the center. Otherwise every empty cell within
/// [`CANDIDATE_RADIUS`] of any stone, once each, in ascending index order.
/// Empty only when the board is full.
pub fn available_moves(board: &Board) -> Vec<Pos> {
    if board.is_board_empty() {
        return vec![Pos::CENTER];
    }

    let mut near = [false; TOTAL_CELLS];
    for stone in board.occupied().iter_ones() {
        for dr in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
            for dc in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
                if let Some(p) = stone.offset(dr, dc, 1) {
                    near[p.to_index()] = true;
                }
            }
        }
    }

    near.iter()
        .enumerate()
        .filter(|&(_, &flag)| flag)
        .map(|(idx, _)| Pos::from_index(idx))
        .filter(|&p| board.is_empty(p))
        .collect()
}

/// Whether `pos` is a legal placement on `board`
#[inline]
pub fn is_valid_move(board: &Board, pos: Pos) -> bool {
    board.is_empty(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Stone;

    #[test]
    fn test_empty_board_yields_center() {
        let moves = available_moves(&Board::new());
        assert_eq!(moves, vec![Pos::new(7, 7)]);
    }

    #[test]
    fn test_single_stone_neighbourhood() {
        let board = Board::new().apply_move(Pos::CENTER, Stone::Black);
        let moves = available_moves(&board);
        // 5x5 square minus the stone itself
        assert_eq!(moves.len(), 24);
        assert!(!moves.contains(&Pos::CENTER));
        assert!(moves.contains(&Pos::new(5, 5)));
        assert!(moves.contains(&Pos::new(9, 9)));
        assert!(!moves.contains(&Pos::new(4, 7)));
    }

    #[test]
    fn test_corner_stone_clipped() {
        let board = Board::new().apply_move(Pos::new(0, 0), Stone::White);
        let moves = available_moves(&board);
        // 3x3 square minus the stone
        assert_eq!(moves.len(), 8);
    }

    #[test]
    fn test_overlapping_neighbourhoods_deduplicated() {
        let board = Board::new()
            .apply_move(Pos::new(7, 7), Stone::Black)
            .apply_move(Pos::new(7, 8), Stone::White);
        let moves = available_moves(&board);
        let mut sorted = moves.clone();
        sorted.dedup();
        assert_eq!(moves, sorted);
        // 5x6 rectangle minus two stones
        assert_eq!(moves.len(), 28);
    }

    #[test]
    fn test_moves_in_index_order() {
        let board = Board::new()
            .apply_move(Pos::new(12, 2), Stone::Black)
            .apply_move(Pos::new(1, 13), Stone::White);
        let moves = available_moves(&board);
        assert!(moves.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_is_valid_move() {
        let board = Board::new().apply_move(Pos::CENTER, Stone::Black);
        assert!(!is_valid_move(&board, Pos::CENTER));
        assert!(is_valid_move(&board, Pos::new(0, 0)));
    }
}
