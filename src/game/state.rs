//! Read-only game snapshots handed to the host

use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone};

/// Game mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Player vs AI
    PvE { human: Stone },
    /// Player vs Player (hotseat); the engine only gives hints
    PvP,
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::PvE { human: Stone::Black }
    }
}

impl GameMode {
    /// Whether the engine plays `stone` in this mode
    pub fn is_ai(self, stone: Stone) -> bool {
        match self {
            GameMode::PvE { human } => stone != Stone::Empty && stone != human,
            GameMode::PvP => false,
        }
    }
}

/// Terminal status of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won { winner: Stone, line: Vec<Pos> },
    Draw,
}

/// Whose input the controller is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingHumanMove,
    AiThinking,
    Finished,
}

/// One played move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub pos: Pos,
    pub stone: Stone,
}

/// Snapshot of the game. Owned by the caller; later moves never change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current_player: Stone,
    pub status: GameStatus,
    pub phase: Phase,
    pub history: Vec<MoveRecord>,
    pub last_move: Option<Pos>,
    pub mode: GameMode,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    pub fn winner(&self) -> Option<Stone> {
        match self.status {
            GameStatus::Won { winner, .. } => Some(winner),
            _ => None,
        }
    }

    /// Cells of the winning run, empty unless the game was won
    pub fn winning_line(&self) -> &[Pos] {
        match &self.status {
            GameStatus::Won { line, .. } => line,
            _ => &[],
        }
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }
}
