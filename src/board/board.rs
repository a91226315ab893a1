//! Board structure

use serde::{Deserialize, Serialize};

use super::bitboard::Bitboard;
use super::{Pos, Stone, BOARD_SIZE, TOTAL_CELLS};

/// Game board
///
/// `Board` is a small `Copy` value. Moves produce a new board instead of
/// mutating one that a search node or rollout may still be looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    /// Black stones bitboard
    pub black: Bitboard,
    /// White stones bitboard
    pub white: Bitboard,
}

impl Board {
    pub fn new() -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
        }
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.black.get(pos) {
            Stone::Black
        } else if self.white.get(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Place a stone in place.
    ///
    /// Occupied cells and `Stone::Empty` are ignored, so a cell never holds
    /// both colours.
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        if !self.is_empty(pos) {
            return;
        }
        match stone {
            Stone::Black => self.black.set(pos),
            Stone::White => self.white.set(pos),
            Stone::Empty => {}
        }
    }

    /// Return the board with `stone` placed at `pos`.
    ///
    /// An occupied target leaves the board unchanged; search code relies on
    /// this being a silent no-op.
    #[inline]
    #[must_use]
    pub fn apply_move(&self, pos: Pos, stone: Stone) -> Board {
        let mut next = *self;
        next.place_stone(pos, stone);
        next
    }

    /// Get bitboard for a color (returns None for Empty)
    #[inline]
    pub fn stones(&self, stone: Stone) -> Option<&Bitboard> {
        match stone {
            Stone::Black => Some(&self.black),
            Stone::White => Some(&self.white),
            Stone::Empty => None,
        }
    }

    /// Bitboard of every occupied cell
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.black.union(&self.white)
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    /// Check if every cell is occupied
    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == TOTAL_CELLS
    }

    /// Rows of cells, top to bottom, for hosts that render or persist the grid
    pub fn to_rows(&self) -> Vec<Vec<Stone>> {
        (0..BOARD_SIZE)
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| self.get(Pos::new(row as u8, col as u8)))
                    .collect()
            })
            .collect()
    }
}
