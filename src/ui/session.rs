//! GUI-side game session
//!
//! Wraps the [`GameController`] and runs the engine one slice per frame, so
//! the window keeps painting while the AI thinks.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::engine::finish_search;
use crate::game::{GameController, GameMode, GameState, MoveError, Phase};
use crate::search::{Difficulty, MctsSearch, SearchStatus};
use crate::{GameConfig, MoveResult, Pos};

/// Engine search in flight
struct PendingSearch {
    search: MctsSearch,
    started: Instant,
    percent: u8,
}

/// Main GUI session state
pub struct Session {
    controller: GameController,
    pub difficulty: Difficulty,
    slice: u32,
    pending: Option<PendingSearch>,
    pub last_ai_result: Option<MoveResult>,
    pub suggested_move: Option<Pos>,
    pub message: Option<String>,
}

impl Session {
    pub fn new(config: &GameConfig) -> Self {
        let mode = GameMode::PvE {
            human: config.human_color,
        };
        Self {
            controller: GameController::with_config(mode, config.search.clone()),
            difficulty: config.difficulty,
            slice: config.search.progress_interval.max(1),
            pending: None,
            last_ai_result: None,
            suggested_move: None,
            message: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.controller.state()
    }

    pub fn mode(&self) -> GameMode {
        self.controller.mode()
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.pending.is_some()
    }

    /// Percent of the current search budget spent
    pub fn progress(&self) -> Option<u8> {
        self.pending.as_ref().map(|p| p.percent)
    }

    /// Seconds since the current search started
    pub fn thinking_secs(&self) -> Option<f32> {
        self.pending.as_ref().map(|p| p.started.elapsed().as_secs_f32())
    }

    /// Root candidates of the running search with their share of visits
    pub fn search_heat(&self) -> Vec<(Pos, f32)> {
        let Some(pending) = &self.pending else {
            return Vec::new();
        };
        let tree = pending.search.tree();
        let root = tree.get(tree.root());
        if root.visits == 0 {
            return Vec::new();
        }
        root.children
            .iter()
            .filter_map(|&id| {
                let child = tree.get(id);
                child.mv.map(|mv| (mv, child.visits as f32 / root.visits as f32))
            })
            .collect()
    }

    /// Place a human stone
    pub fn try_place_stone(&mut self, pos: Pos) -> Result<(), MoveError> {
        if self.is_ai_thinking() {
            return Err(MoveError::NotYourTurn);
        }
        self.controller
            .apply_human_move(pos.row as usize, pos.col as usize)?;
        self.suggested_move = None;
        self.message = None;
        Ok(())
    }

    /// Advance the engine by one slice. Call once per frame.
    pub fn tick(&mut self) {
        if self.pending.is_none() {
            if self.controller.phase() != Phase::AiThinking {
                return;
            }
            match self.controller.begin_ai_search(self.difficulty) {
                Ok(search) => {
                    self.pending = Some(PendingSearch {
                        search,
                        started: Instant::now(),
                        percent: 0,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "engine could not start");
                    self.message = Some(e.to_string());
                    return;
                }
            }
        }

        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        match pending.search.run_slice(self.slice) {
            SearchStatus::Running { percent } => pending.percent = percent,
            SearchStatus::Finished => {
                if let Some(mut done) = self.pending.take() {
                    let result = finish_search(&mut done.search, done.started);
                    self.finish_ai_turn(result);
                }
            }
        }
    }

    fn finish_ai_turn(&mut self, result: MoveResult) {
        info!(
            best_move = ?result.best_move,
            search_type = ?result.search_type,
            time_ms = result.time_ms,
            "engine move"
        );
        let best_move = result.best_move;
        self.last_ai_result = Some(result);
        match best_move {
            Some(pos) => {
                if let Err(e) = self.controller.apply_ai_move(pos) {
                    self.message = Some(e.to_string());
                }
            }
            None => self.message = Some(MoveError::NoMoveAvailable.to_string()),
        }
    }

    /// Drop the running search without playing a move
    fn abandon_search(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(iterations = pending.search.iterations(), "search abandoned");
        }
    }

    /// Engine hint for the side to move
    pub fn request_suggestion(&mut self) {
        if self.is_ai_thinking() {
            return;
        }
        self.suggested_move = self.controller.suggest_move(Difficulty::Easy);
        if self.suggested_move.is_none() {
            self.message = Some("No move to suggest".to_string());
        }
    }

    pub fn undo(&mut self) {
        self.abandon_search();
        self.controller.undo();
        self.suggested_move = None;
        self.message = None;
    }

    pub fn reset(&mut self) {
        self.abandon_search();
        self.controller.reset();
        self.last_ai_result = None;
        self.suggested_move = None;
        self.message = None;
    }

    pub fn new_game(&mut self, mode: GameMode) {
        self.abandon_search();
        self.controller.set_mode(mode);
        self.last_ai_result = None;
        self.suggested_move = None;
        self.message = None;
    }
}
