//! MCTS search implementation.
//!
//! Implements the core loop:
//! 1. Selection: descend through fully expanded nodes by UCB score
//! 2. Expansion: add one untried move as a new child
//! 3. Simulation: heuristic-biased rollout from the new child
//! 4. Backpropagation: update statistics along the path to the root
//!
//! The search is incremental. [`MctsSearch::run_slice`] runs a bounded number
//! of iterations and returns, so a host can interleave the search with its
//! own event loop. [`get_best_move`] drives a search to completion and
//! reports progress between slices.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::board::{Board, Pos, Stone};
use crate::eval::{evaluate_position, normalize_score};
use crate::rules::{available_moves, find_winner, has_five_at_pos};

use super::config::MctsConfig;
use super::node::NodeId;
use super::tree::SearchTree;

/// Errors that can occur inside a search iteration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("node {} is marked fully expanded but has no children", .node.0)]
    DeadEnd { node: NodeId },

    #[error("node {} tried to expand onto occupied cell ({}, {})", .node.0, .pos.row, .pos.col)]
    OccupiedCell { node: NodeId, pos: Pos },
}

/// Shared flag used to stop a running search between iterations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// State of an incremental search after a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// More iterations remain; `percent` is always below 100.
    Running { percent: u8 },
    /// Budget spent, cancelled, or aborted on an error.
    Finished,
}

/// Summary of a finished (or abandoned) search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    /// Chosen move, `None` only when the root had no legal moves
    pub best_move: Option<Pos>,
    /// Win rate of the chosen root child
    pub win_rate: f64,
    /// Visits of the chosen root child
    pub visits: u32,
    /// Iterations completed
    pub iterations: u32,
    /// Nodes allocated in the tree
    pub nodes: usize,
    /// The chosen move wins on the spot
    pub immediate_win: bool,
    /// The move came from the fallback path (error or nothing visited)
    pub fallback: bool,
    /// The search was stopped through its cancel token
    pub cancelled: bool,
}

/// Incremental MCTS search rooted at one position.
///
/// The search owns its tree; dropping it frees every node.
pub struct MctsSearch {
    tree: SearchTree,
    searcher: Stone,
    config: MctsConfig,
    rng: ChaCha20Rng,
    budget: u32,
    iterations: u32,
    cancel: CancelToken,
    cancelled: bool,
    failure: Option<SearchError>,
}

impl MctsSearch {
    /// Start a search for `player` on `board`.
    ///
    /// Returns `None` when there is nothing to search: the board is full or
    /// already holds five in a row.
    pub fn new(board: &Board, player: Stone, config: MctsConfig) -> Option<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self::with_rng(board, player, config, rng)
    }

    /// Start a search with an explicit RNG stream.
    pub fn with_rng(
        board: &Board,
        player: Stone,
        config: MctsConfig,
        rng: ChaCha20Rng,
    ) -> Option<Self> {
        if player == Stone::Empty || board.is_full() || find_winner(board).is_some() {
            return None;
        }

        let mut tree = SearchTree::new(*board, player);
        let root = tree.root();
        if let Err(err) = tree.expand_all(root) {
            warn!(error = %err, "failed to expand search root");
            return None;
        }
        if tree.get(root).children.is_empty() {
            return None;
        }

        let budget = config.iterations;
        Some(Self {
            tree,
            searcher: player,
            config,
            rng,
            budget,
            iterations: 0,
            cancel: CancelToken::new(),
            cancelled: false,
            failure: None,
        })
    }

    /// Attach a cancel token shared with the host.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops this search.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Iterations completed so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Completed share of the budget, 0..=100.
    pub fn percent_complete(&self) -> u8 {
        if self.budget == 0 || self.is_finished() {
            return 100;
        }
        ((self.iterations as u64 * 100) / self.budget as u64).min(100) as u8
    }

    pub fn is_finished(&self) -> bool {
        self.iterations >= self.budget || self.cancelled || self.failure.is_some()
    }

    /// Error that aborted the search, if any.
    pub fn failure(&self) -> Option<&SearchError> {
        self.failure.as_ref()
    }

    /// Read access to the tree (for inspection/debugging).
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Run up to `max_iterations` iterations, then yield back to the caller.
    pub fn run_slice(&mut self, max_iterations: u32) -> SearchStatus {
        let mut ran = 0;
        while ran < max_iterations && !self.is_finished() {
            if self.cancel.is_cancelled() {
                debug!(iterations = self.iterations, "search cancelled");
                self.cancelled = true;
                break;
            }
            if let Err(err) = self.iterate() {
                warn!(
                    error = %err,
                    iterations = self.iterations,
                    "search iteration failed, falling back to best known move"
                );
                self.failure = Some(err);
                break;
            }
            self.iterations += 1;
            ran += 1;
        }

        trace!(
            ran,
            iterations = self.iterations,
            nodes = self.tree.len(),
            "search slice complete"
        );

        if self.is_finished() {
            SearchStatus::Finished
        } else {
            SearchStatus::Running {
                percent: self.percent_complete(),
            }
        }
    }

    /// One select -> expand -> simulate -> backpropagate pass.
    fn iterate(&mut self) -> Result<(), SearchError> {
        let selected = self.select()?;
        let leaf = match self.tree.expand_one(selected)? {
            Some(child) => child,
            None => selected,
        };
        let result = self.simulate(leaf);
        self.tree.backpropagate(
            leaf,
            result,
            self.searcher,
            self.config.learning_rate,
            self.config.discount,
        );
        Ok(())
    }

    /// Descend while nodes are fully expanded and undecided.
    fn select(&self) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();
        loop {
            let node = self.tree.get(current);
            if node.is_terminal() || !node.fully_expanded {
                return Ok(current);
            }
            current = self
                .tree
                .select_best_child(current, self.config.exploration, self.config.q_weight)
                .ok_or(SearchError::DeadEnd { node: current })?;
        }
    }

    /// Score `leaf` for the searcher: terminal outcome or a biased rollout.
    fn simulate(&mut self, leaf: NodeId) -> f64 {
        let node = self.tree.get(leaf);
        if let Some(outcome) = node.outcome {
            return outcome.value_for(self.searcher);
        }
        let (board, to_move) = (node.board, node.to_move);
        rollout(
            board,
            to_move,
            self.searcher,
            &self.config,
            &mut self.rng,
        )
    }

    /// Summarise the search. Safe to call at any point.
    ///
    /// Prefers a root move that wins on the spot, then the visited root child
    /// with the best win rate. When nothing usable exists (aborted before any
    /// visit) a random root move is returned.
    pub fn report(&mut self) -> SearchReport {
        let mut report = SearchReport {
            best_move: None,
            win_rate: 0.0,
            visits: 0,
            iterations: self.iterations,
            nodes: self.tree.len(),
            immediate_win: false,
            fallback: self.failure.is_some(),
            cancelled: self.cancelled,
        };

        let chosen = match self.tree.winning_root_child() {
            Some(id) => {
                report.immediate_win = true;
                Some(id)
            }
            None => self.tree.best_root_child(),
        };

        match chosen {
            Some(id) => {
                let child = self.tree.get(id);
                report.best_move = child.mv;
                report.win_rate = child.win_rate();
                report.visits = child.visits;
            }
            None => {
                report.fallback = true;
                report.best_move = self.tree.root_moves().choose(&mut self.rng).copied();
            }
        }

        debug!(
            best_move = ?report.best_move,
            win_rate = report.win_rate,
            iterations = report.iterations,
            nodes = report.nodes,
            fallback = report.fallback,
            "search finished"
        );
        report
    }

    /// Chosen move; see [`report`](Self::report).
    pub fn best_move(&mut self) -> Option<Pos> {
        self.report().best_move
    }
}

/// Play a heuristic-biased game out from `board` with `to_move` to play.
///
/// Each ply shuffles the candidate moves, keeps the first
/// `rollout_candidates`, and plays the one that maximises the evaluator for
/// the side moving. Returns the result in [0, 1] for `searcher`.
pub fn rollout<R: rand::Rng + ?Sized>(
    mut board: Board,
    mut to_move: Stone,
    searcher: Stone,
    config: &MctsConfig,
    rng: &mut R,
) -> f64 {
    for _ in 0..config.rollout_depth {
        let mut moves = available_moves(&board);
        if moves.is_empty() || board.is_full() {
            return 0.5;
        }
        moves.shuffle(rng);
        moves.truncate(config.rollout_candidates.max(1));

        let mut best: Option<(Pos, Board, i32)> = None;
        for mv in moves {
            let next = board.apply_move(mv, to_move);
            let score = evaluate_position(&next, to_move);
            match best {
                Some((_, _, best_score)) if score <= best_score => {}
                _ => best = Some((mv, next, score)),
            }
        }
        let Some((mv, next, _)) = best else {
            return 0.5;
        };

        board = next;
        if has_five_at_pos(&board, mv) {
            return if to_move == searcher { 1.0 } else { 0.0 };
        }
        to_move = to_move.opponent();
    }

    normalize_score(evaluate_position(&board, searcher))
}

/// Run a full search and return the chosen move.
///
/// `on_progress` receives the completed percentage every
/// `progress_interval` iterations and exactly one final `100`. Returns
/// `None` when the position has no legal moves or is already decided.
pub fn get_best_move<F>(
    board: &Board,
    player: Stone,
    config: &MctsConfig,
    mut on_progress: F,
    cancel: &CancelToken,
) -> Option<Pos>
where
    F: FnMut(u8),
{
    let Some(search) = MctsSearch::new(board, player, config.clone()) else {
        on_progress(100);
        return None;
    };
    let mut search = search.with_cancel_token(cancel.clone());
    drive(&mut search, config.progress_interval, &mut on_progress);
    search.best_move()
}

/// Run `search` to completion in slices of `interval` iterations.
pub(crate) fn drive<F>(search: &mut MctsSearch, interval: u32, on_progress: &mut F)
where
    F: FnMut(u8),
{
    let interval = interval.max(1);
    while let SearchStatus::Running { percent } = search.run_slice(interval) {
        on_progress(percent);
    }
    on_progress(100);
}
