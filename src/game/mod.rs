//! Turn-taking between a human and the engine
//!
//! [`GameController`] owns the board and the move history and hands out
//! [`GameState`] snapshots. Hosts either call
//! [`GameController::request_ai_move`] to run the engine to completion, or
//! drive an [`MctsSearch`](crate::search::MctsSearch) from
//! [`GameController::begin_ai_search`] one slice at a time.

mod controller;
mod state;

pub use controller::{GameController, MoveError};
pub use state::{GameMode, GameState, GameStatus, MoveRecord, Phase};
