//! Search module for Gomoku AI
//!
//! Contains:
//! - Search configuration and difficulty tiers
//! - Arena-allocated search tree with UCB1 + Q-value selection
//! - Incremental Monte Carlo Tree Search with heuristic rollouts

pub mod config;
pub mod mcts;
pub mod node;
pub mod tree;

pub use config::{Difficulty, MctsConfig};
pub use mcts::{
    get_best_move, rollout, CancelToken, MctsSearch, SearchError, SearchReport, SearchStatus,
};
pub use node::{NodeId, Outcome, SearchNode};
pub use tree::SearchTree;
