//! Run-length scores for Gomoku evaluation
//!
//! Each contiguous run of same-colour stones is scored by its length. The
//! table is steep so that one longer run outweighs many shorter ones.

/// Score per run length
pub struct LineScore;

impl LineScore {
    /// Five or more in a row - a won position
    pub const FIVE: i32 = 100_000;
    /// Four in a row
    pub const FOUR: i32 = 10_000;
    /// Three in a row
    pub const THREE: i32 = 1_000;
    /// Two in a row
    pub const TWO: i32 = 100;
    /// Lone stone
    pub const ONE: i32 = 10;
}

/// Score of a contiguous run of `len` stones
#[inline]
pub fn run_score(len: usize) -> i32 {
    match len {
        0 => 0,
        1 => LineScore::ONE,
        2 => LineScore::TWO,
        3 => LineScore::THREE,
        4 => LineScore::FOUR,
        _ => LineScore::FIVE,
    }
}
