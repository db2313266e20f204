//! Constants for board geometry, direction masks, and search defaults.
//!
//! Cells are numbered row-major from the top-left corner (`a1` = 0, `h1` = 7,
//! `a8` = 56, `h8` = 63) and cell `i` is bit `i` of a bitboard.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Bitboards only fit an 8x8 board.
pub const N: usize = 8;

/// Number of cells on the board.
pub const CELLS: usize = N * N;

/// Longest run of opponent discs a single move can capture in one direction.
pub const MAX_RUN: usize = N - 2;

// =============================================================================
// Special Move Values
// =============================================================================

/// "No move" sentinel: returned when there is no legal move, or for a pass.
pub const NO_MOVE: usize = CELLS;

// =============================================================================
// Starting Position
// =============================================================================

/// Black discs at the start of a game (e4, d5). Black moves first.
pub const START_BLACK: u64 = 0x0000_0008_1000_0000;

/// White discs at the start of a game (d4, e5).
pub const START_WHITE: u64 = 0x0000_0010_0800_0000;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default rollout budget for flat Monte Carlo, and iteration budget for MCTS.
pub const DEFAULT_PLAYOUTS: usize = 1024;

/// Default UCB1 exploration parameter.
pub const DEFAULT_EXPLORATION: f64 = 0.3;

// =============================================================================
// Direction Table
// =============================================================================

/// Column masks that drop bits wrapping around the left/right board edges.
const NOT_A_FILE: u64 = 0xfefe_fefe_fefe_fefe;
const NOT_H_FILE: u64 = 0x7f7f_7f7f_7f7f_7f7f;

/// One of the eight board directions, as a bit shift plus a wrap mask.
#[derive(Clone, Copy, Debug)]
pub struct Direction {
    /// Number of bit positions one step moves.
    pub shift: u32,
    /// `true` shifts towards higher cell indices (`<<`), `false` towards lower (`>>`).
    pub forward: bool,
    /// Cells that can be reached without wrapping across an edge.
    pub mask: u64,
}

impl Direction {
    /// Move every set bit of `bits` one cell in this direction.
    #[inline(always)]
    pub const fn step(self, bits: u64) -> u64 {
        if self.forward {
            (bits << self.shift) & self.mask
        } else {
            (bits >> self.shift) & self.mask
        }
    }
}

/// All eight directions.
/// Order: North, NE, East, SE, South, SW, West, NW
pub const DIRECTIONS: [Direction; 8] = [
    Direction { shift: 8, forward: false, mask: u64::MAX },   // North (up one row)
    Direction { shift: 7, forward: false, mask: NOT_A_FILE }, // NE
    Direction { shift: 1, forward: true, mask: NOT_A_FILE },  // East
    Direction { shift: 9, forward: true, mask: NOT_A_FILE },  // SE
    Direction { shift: 8, forward: true, mask: u64::MAX },    // South (down one row)
    Direction { shift: 7, forward: true, mask: NOT_H_FILE },  // SW
    Direction { shift: 1, forward: false, mask: NOT_H_FILE }, // West
    Direction { shift: 9, forward: false, mask: NOT_H_FILE }, // NW
];

// =============================================================================
// Score Arrays
// =============================================================================

/// Per-cell move quality; NaN marks cells that are not legal moves.
pub type Scores = [f64; CELLS];

/// A score array with every cell inapplicable.
pub const NO_SCORES: Scores = [f64::NAN; CELLS];
