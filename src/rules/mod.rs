//! Game rules for standard Gomoku
//!
//! This module implements the rule set:
//! - Candidate move generation near existing stones
//! - Win conditions (five or more in a row) and draws (full board)

pub mod moves;
pub mod win;

// Re-exports for convenient access
pub use moves::{available_moves, is_valid_move, CANDIDATE_RADIUS};
pub use win::{
    check_win, find_winner, has_five_at_pos, is_game_over, line_length, run_through, WinLine, DIRECTIONS,
    WIN_LENGTH,
};
