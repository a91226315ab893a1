//! Gomoku AI Engine with Monte Carlo Tree Search
//!
//! A Gomoku engine for the free-style rule set:
//! - Standard 15x15 board
//! - 5-in-a-row to win (overlines allowed)
//! - Full board with no winner is a draw
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Win detection and candidate move generation
//! - [`eval`]: Line-based position evaluation
//! - [`search`]: MCTS with UCB1 selection and Q-value learning
//! - [`engine`]: Main AI engine integrating all components
//! - [`game`]: Turn-taking controller with undo
//! - [`config`]: `gomoku.toml` loading
//!
//! # Quick Start
//!
//! ```
//! use gomoku::{AIEngine, Board, MctsConfig, Pos, Stone};
//!
//! // Small budget for a fast doc test
//! let mut board = Board::new();
//! let mut engine = AIEngine::with_config(MctsConfig::default().with_iterations(100));
//!
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! // AI responds as White
//! if let Some(pos) = engine.get_move(&board, Stone::White) {
//!     board.place_stone(pos, Stone::White);
//!     println!("AI plays at ({}, {})", pos.row, pos.col);
//! }
//! ```
//!
//! # Search
//!
//! Each AI turn builds a fresh tree rooted at the current position:
//! 1. A move that completes five is taken at once
//! 2. Otherwise the budget is spent on select/expand/simulate/backpropagate
//! 3. The root child with the best win rate is played
//!
//! The search runs in slices ([`MctsSearch::run_slice`]) so a GUI can keep
//! drawing frames while the engine thinks.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod game;
pub mod rules;
pub mod search;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone, BOARD_SIZE};
pub use config::{load_config, ConfigError, GameConfig};
pub use engine::{AIEngine, MoveResult, SearchType};
pub use game::{GameController, GameMode, GameState, GameStatus, MoveError, Phase};
pub use search::{get_best_move, CancelToken, Difficulty, MctsConfig, MctsSearch, SearchStatus};
