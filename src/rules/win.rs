//! Win condition checking
//!
//! Five or more stones in a row wins (overlines count). Only the four lines
//! through the last move are examined; the rest of the board is never
//! rescanned.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone};

/// Direction vectors for line checking (4 directions)
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal SW
];

/// Stones in a row needed to win
pub const WIN_LENGTH: usize = 5;

/// A decided game: the winner and the contiguous run that decided it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    pub winner: Stone,
    /// Ordered cells of the run through the last move, at least five long
    pub line: Vec<Pos>,
}

/// Contiguous run of `pos`'s colour through `pos` along one direction.
///
/// Returns the cells in order from the negative end to the positive end.
/// Empty when `pos` itself is empty.
pub fn run_through(board: &Board, pos: Pos, dr: i32, dc: i32) -> Vec<Pos> {
    let color = board.get(pos);
    if color == Stone::Empty {
        return Vec::new();
    }

    let mut line = vec![pos];

    // Extend in negative direction first
    let mut step = 1;
    while let Some(prev) = pos.offset(-dr, -dc, step) {
        if board.get(prev) != color {
            break;
        }
        line.insert(0, prev);
        step += 1;
    }

    // Extend in positive direction
    step = 1;
    while let Some(next) = pos.offset(dr, dc, step) {
        if board.get(next) != color {
            break;
        }
        line.push(next);
        step += 1;
    }

    line
}

/// Length of the run through `pos` along one direction. No allocation.
#[inline]
pub fn line_length(board: &Board, pos: Pos, dr: i32, dc: i32) -> usize {
    let color = board.get(pos);
    if color == Stone::Empty {
        return 0;
    }

    let mut count = 1;
    for sign in [1, -1] {
        let mut step = 1;
        while let Some(p) = pos.offset(dr * sign, dc * sign, step) {
            if board.get(p) != color {
                break;
            }
            count += 1;
            step += 1;
        }
    }
    count
}

/// Check whether the stone at `last_move` completed five in a row.
///
/// Returns `None` when there is no last move, the cell is empty, or no
/// direction reaches five.
pub fn check_win(board: &Board, last_move: Option<Pos>) -> Option<WinLine> {
    let pos = last_move?;
    let winner = board.get(pos);
    if winner == Stone::Empty {
        return None;
    }

    DIRECTIONS.iter().find_map(|&(dr, dc)| {
        if line_length(board, pos, dr, dc) < WIN_LENGTH {
            return None;
        }
        Some(WinLine {
            winner,
            line: run_through(board, pos, dr, dc),
        })
    })
}

/// Fast five-in-a-row check at a specific position
#[inline]
pub fn has_five_at_pos(board: &Board, pos: Pos) -> bool {
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| line_length(board, pos, dr, dc) >= WIN_LENGTH)
}

/// Scan every stone for five in a row.
///
/// Slower than [`check_win`]; used when no last move is known, e.g. to
/// refuse searching a position that is already decided.
pub fn find_winner(board: &Board) -> Option<Stone> {
    [Stone::Black, Stone::White].into_iter().find(|&stone| {
        board
            .stones(stone)
            .is_some_and(|stones| stones.iter_ones().any(|pos| has_five_at_pos(board, pos)))
    })
}

/// True on a win through `last_move` or when the board is full (draw)
pub fn is_game_over(board: &Board, last_move: Option<Pos>) -> bool {
    check_win(board, last_move).is_some() || board.is_full()
}
