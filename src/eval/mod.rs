//! Evaluation module for Gomoku positions
//!
//! Scores contiguous runs of one to five stones for each side and reports
//! the difference. Used to steer rollouts and to score truncated ones.

pub mod heuristic;
pub mod patterns;

pub use heuristic::{evaluate_position, normalize_score};
pub use patterns::{run_score, LineScore};
