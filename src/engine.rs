//! Main AI Engine wrapping the Monte Carlo Tree Search
//!
//! The engine owns the search configuration and a seeded RNG stream. Each
//! call builds a fresh tree rooted at the given position, spends the
//! iteration budget, and drops the tree before returning.
//!
//! # Example
//!
//! ```
//! use gomoku::{AIEngine, Board, MctsConfig, Pos, Stone};
//!
//! // Small budget for a fast example
//! let mut engine = AIEngine::with_config(MctsConfig::default().with_iterations(50).with_seed(1));
//! let mut board = Board::new();
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! let result = engine.get_move_with_stats(&board, Stone::White);
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::board::{Board, Pos, Stone};
use crate::search::mcts::drive;
use crate::search::{CancelToken, Difficulty, MctsConfig, MctsSearch, SearchReport};

/// Which path produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// A root move completes five in a row
    ImmediateWin,
    /// Best empirical win rate after the search
    Mcts,
    /// The search was aborted or visited nothing; best-known or random move
    Fallback,
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    /// Best move found, if any
    pub best_move: Option<Pos>,
    /// Win rate of the chosen move from the mover's point of view
    pub win_rate: f64,
    /// Type of search that found this move
    pub search_type: SearchType,
    /// Iterations completed
    pub iterations: u32,
    /// Number of tree nodes allocated
    pub nodes: usize,
    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl MoveResult {
    /// Build from a finished search report
    fn from_report(report: SearchReport, time_ms: u64) -> Self {
        let search_type = if report.immediate_win {
            SearchType::ImmediateWin
        } else if report.fallback {
            SearchType::Fallback
        } else {
            SearchType::Mcts
        };
        Self {
            best_move: report.best_move,
            win_rate: report.win_rate,
            search_type,
            iterations: report.iterations,
            nodes: report.nodes,
            time_ms,
        }
    }

    /// Result for a position with nothing to search
    fn no_move(time_ms: u64) -> Self {
        Self {
            best_move: None,
            win_rate: 0.0,
            search_type: SearchType::Mcts,
            iterations: 0,
            nodes: 0,
            time_ms,
        }
    }
}

/// Main AI Engine for Gomoku.
pub struct AIEngine {
    config: MctsConfig,
    rng: ChaCha20Rng,
}

impl AIEngine {
    /// Create a new AI engine at medium difficulty.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MctsConfig::default())
    }

    /// Create an AI engine with custom configuration.
    ///
    /// A configured seed makes every search of this engine reproducible.
    #[must_use]
    pub fn with_config(config: MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Engine whose budget matches a difficulty tier.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::with_config(MctsConfig::for_difficulty(difficulty))
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Set the iteration budget of later searches.
    pub fn set_iterations(&mut self, iterations: u32) {
        self.config.iterations = iterations;
    }

    /// Set the budget from a difficulty tier.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.set_iterations(difficulty.iterations());
    }

    /// Start an incremental search for `color` on `board`.
    ///
    /// Each search gets its own RNG stream split off the engine's, so a seeded
    /// engine replays the same sequence of searches.
    pub fn start_search(&mut self, board: &Board, color: Stone) -> Option<MctsSearch> {
        let rng = ChaCha20Rng::seed_from_u64(self.rng.gen());
        MctsSearch::with_rng(board, color, self.config.clone(), rng)
    }

    /// Get the best move for the given position.
    ///
    /// Returns `None` if no legal moves exist or the game is already decided.
    #[must_use]
    pub fn get_move(&mut self, board: &Board, color: Stone) -> Option<Pos> {
        self.get_move_with_stats(board, color).best_move
    }

    /// Get the best move with detailed search statistics.
    #[must_use]
    pub fn get_move_with_stats(&mut self, board: &Board, color: Stone) -> MoveResult {
        self.get_move_with_progress(board, color, |_| {}, &CancelToken::new())
    }

    /// Full search that reports progress and honours a cancel token.
    ///
    /// `on_progress` gets a percentage every `progress_interval` iterations
    /// and a single final `100`.
    pub fn get_move_with_progress<F>(
        &mut self,
        board: &Board,
        color: Stone,
        mut on_progress: F,
        cancel: &CancelToken,
    ) -> MoveResult
    where
        F: FnMut(u8),
    {
        let start = Instant::now();
        let Some(search) = self.start_search(board, color) else {
            on_progress(100);
            return MoveResult::no_move(start.elapsed().as_millis() as u64);
        };
        let mut search = search.with_cancel_token(cancel.clone());
        drive(&mut search, self.config.progress_interval, &mut on_progress);
        let report = search.report();
        MoveResult::from_report(report, start.elapsed().as_millis() as u64)
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a finished incremental search into a [`MoveResult`].
pub fn finish_search(search: &mut MctsSearch, started: Instant) -> MoveResult {
    MoveResult::from_report(search.report(), started.elapsed().as_millis() as u64)
}
