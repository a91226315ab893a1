//! Game controller: validation, turn order, undo

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::{Board, Pos, Stone};
use crate::engine::AIEngine;
use crate::rules::check_win;
use crate::search::mcts::drive;
use crate::search::{Difficulty, MctsConfig, MctsSearch};

use super::state::{GameMode, GameState, GameStatus, MoveRecord, Phase};

/// Rejected move requests. The game is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("({}, {}) is already occupied", .pos.row, .pos.col)]
    CellOccupied { pos: Pos },

    #[error("the game is already over")]
    GameAlreadyOver,

    #[error("it is the engine's turn")]
    NotYourTurn,

    #[error("it is not the engine's turn")]
    NotAiTurn,

    #[error("the engine found no move")]
    NoMoveAvailable,
}

/// Owns the live game and the engine that plays one side of it.
pub struct GameController {
    board: Board,
    current: Stone,
    history: Vec<MoveRecord>,
    status: GameStatus,
    mode: GameMode,
    engine: AIEngine,
}

impl GameController {
    pub fn new(mode: GameMode) -> Self {
        Self::with_config(mode, MctsConfig::default())
    }

    /// Controller whose engine uses `search` for everything but the budget,
    /// which follows the difficulty of each request.
    pub fn with_config(mode: GameMode, search: MctsConfig) -> Self {
        Self {
            board: Board::new(),
            current: Stone::Black,
            history: Vec::new(),
            status: GameStatus::InProgress,
            mode,
            engine: AIEngine::with_config(search),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Switch mode and start a new game.
    pub fn set_mode(&mut self, mode: GameMode) -> GameState {
        self.mode = mode;
        self.reset()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Stone {
        self.current
    }

    pub fn phase(&self) -> Phase {
        if self.status != GameStatus::InProgress {
            Phase::Finished
        } else if self.mode.is_ai(self.current) {
            Phase::AiThinking
        } else {
            Phase::AwaitingHumanMove
        }
    }

    /// Snapshot of the game
    pub fn state(&self) -> GameState {
        GameState {
            board: self.board,
            current_player: self.current,
            status: self.status.clone(),
            phase: self.phase(),
            history: self.history.clone(),
            last_move: self.history.last().map(|m| m.pos),
            mode: self.mode,
        }
    }

    /// Validate and play a move for the human side.
    pub fn apply_human_move(&mut self, row: usize, col: usize) -> Result<GameState, MoveError> {
        if self.status != GameStatus::InProgress {
            return Err(MoveError::GameAlreadyOver);
        }
        let pos = Pos::try_new(row, col).ok_or(MoveError::OutOfBounds { row, col })?;
        if self.mode.is_ai(self.current) {
            return Err(MoveError::NotYourTurn);
        }
        self.play(pos)?;
        Ok(self.state())
    }

    /// Start an incremental engine search for the side to move.
    ///
    /// The host runs slices and hands the result to
    /// [`apply_ai_move`](Self::apply_ai_move).
    pub fn begin_ai_search(&mut self, difficulty: Difficulty) -> Result<MctsSearch, MoveError> {
        self.ensure_ai_turn()?;
        self.engine.set_difficulty(difficulty);
        debug!(
            player = ?self.current,
            difficulty = difficulty.label(),
            iterations = difficulty.iterations(),
            "starting engine search"
        );
        self.engine
            .start_search(&self.board, self.current)
            .ok_or(MoveError::NoMoveAvailable)
    }

    /// Play the engine's chosen move.
    pub fn apply_ai_move(&mut self, pos: Pos) -> Result<GameState, MoveError> {
        self.ensure_ai_turn()?;
        self.play(pos)?;
        Ok(self.state())
    }

    /// Run the engine to completion for the side to move and play its move.
    ///
    /// `on_progress` receives percentages between slices and a final `100`.
    pub fn request_ai_move<F>(&mut self, difficulty: Difficulty, mut on_progress: F) -> Result<Pos, MoveError>
    where
        F: FnMut(u8),
    {
        let mut search = self.begin_ai_search(difficulty)?;
        let interval = self.engine.config().progress_interval;
        drive(&mut search, interval, &mut on_progress);
        let pos = search.best_move().ok_or(MoveError::NoMoveAvailable)?;
        self.apply_ai_move(pos)?;
        Ok(pos)
    }

    /// Engine hint for the side to move. Nothing is played.
    pub fn suggest_move(&mut self, difficulty: Difficulty) -> Option<Pos> {
        if self.status != GameStatus::InProgress {
            return None;
        }
        self.engine.set_difficulty(difficulty);
        self.engine.get_move(&self.board, self.current)
    }

    /// Take back the last move, or the last human/engine pair in PvE.
    pub fn undo(&mut self) -> GameState {
        let Some(last) = self.history.pop() else {
            return self.state();
        };
        let mut removed = 1;
        if self.mode.is_ai(last.stone) && !self.history.is_empty() {
            self.history.pop();
            removed += 1;
        }

        let moves = std::mem::take(&mut self.history);
        self.start_fresh();
        for record in moves {
            if let Err(e) = self.play(record.pos) {
                warn!(error = %e, ?record, "skipping history entry during undo replay");
            }
        }

        info!(removed, moves = self.history.len(), "undo");
        self.state()
    }

    /// Start a new game in the current mode.
    pub fn reset(&mut self) -> GameState {
        self.start_fresh();
        info!(mode = ?self.mode, "new game");
        self.state()
    }

    fn start_fresh(&mut self) {
        self.board = Board::new();
        self.current = Stone::Black;
        self.history.clear();
        self.status = GameStatus::InProgress;
    }

    fn ensure_ai_turn(&self) -> Result<(), MoveError> {
        if self.status != GameStatus::InProgress {
            return Err(MoveError::GameAlreadyOver);
        }
        if !self.mode.is_ai(self.current) {
            return Err(MoveError::NotAiTurn);
        }
        Ok(())
    }

    /// Place a stone for the side to move and update status and turn.
    fn play(&mut self, pos: Pos) -> Result<(), MoveError> {
        if !self.board.is_empty(pos) {
            return Err(MoveError::CellOccupied { pos });
        }

        let stone = self.current;
        self.board = self.board.apply_move(pos, stone);
        self.history.push(MoveRecord { pos, stone });
        debug!(row = pos.row, col = pos.col, ?stone, "move played");

        if let Some(win) = check_win(&self.board, Some(pos)) {
            info!(winner = ?win.winner, moves = self.history.len(), "game won");
            self.status = GameStatus::Won {
                winner: win.winner,
                line: win.line,
            };
        } else if self.board.is_full() {
            info!(moves = self.history.len(), "game drawn");
            self.status = GameStatus::Draw;
        } else {
            self.current = stone.opponent();
        }
        Ok(())
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}
