//! Bit-parallel move generation and capture resolution.
//!
//! Every function here is pure and works on a pair of masks seen from the side
//! to move: `own` for its discs and `opponent` for the other side's. Callers
//! keep `own & opponent == 0`; nothing here checks it.

use fastrand::Rng;

use crate::constants::{CELLS, DIRECTIONS, MAX_RUN, NO_MOVE};

/// A cell index in `0..64`, or [`NO_MOVE`].
pub type Cell = usize;

/// Single-bit mask for a cell.
#[inline]
pub const fn cell_to_bit(cell: Cell) -> u64 {
    debug_assert!(cell < CELLS);
    1u64 << cell
}

/// Highest cell set in `mask`, or [`NO_MOVE`] for an empty mask.
#[inline]
pub const fn bit_to_cell(mask: u64) -> Cell {
    if mask == 0 {
        NO_MOVE
    } else {
        63 - mask.leading_zeros() as usize
    }
}

/// Number of set bits.
#[inline]
pub const fn popcount(mask: u64) -> u32 {
    mask.count_ones()
}

/// Iterate over the set bits of `mask` as single-bit masks, lowest cell first.
pub fn bits(mut mask: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let bit = mask & mask.wrapping_neg();
        mask ^= bit;
        Some(bit)
    })
}

/// All legal moves for the side owning `own`.
///
/// For each direction, own discs are dilated through contiguous opponent discs
/// (at most [`MAX_RUN`] of them); an empty cell one step past such a run is a
/// legal move.
pub fn legal_moves(own: u64, opponent: u64) -> u64 {
    let empty = !(own | opponent);
    let mut moves = 0;

    for dir in DIRECTIONS {
        let mut run = dir.step(own) & opponent;
        for _ in 1..MAX_RUN {
            run |= dir.step(run) & opponent;
        }
        moves |= dir.step(run) & empty;
    }

    moves
}

/// Opponent discs captured by playing `mv`.
///
/// A direction contributes its run of opponent discs only when the run is
/// closed by an own disc; runs ending at an edge or an empty cell flip nothing.
pub fn flips(own: u64, opponent: u64, mv: u64) -> u64 {
    let mut flipped = 0;

    for dir in DIRECTIONS {
        let mut run = 0;
        let mut cursor = dir.step(mv);
        while cursor & opponent != 0 {
            run |= cursor;
            cursor = dir.step(cursor);
        }
        if cursor & own != 0 {
            flipped |= run;
        }
    }

    flipped
}

/// Play `mv` for the side owning `own` and return the new `(own, opponent)`.
///
/// `mv` must be one of the bits of [`legal_moves`]; an illegal bit yields a
/// meaningless position.
#[inline]
pub fn apply_move(own: u64, opponent: u64, mv: u64) -> (u64, u64) {
    let flipped = flips(own, opponent, mv);
    (own ^ (mv | flipped), opponent ^ flipped)
}

/// A uniformly chosen legal move, or `0` when the side has none.
pub fn random_legal_move(own: u64, opponent: u64, rng: &mut Rng) -> u64 {
    let mut moves = legal_moves(own, opponent);
    let count = popcount(moves) as usize;
    if count == 0 {
        return 0;
    }

    // Drop the k lowest moves, keep the next one
    for _ in 0..rng.usize(..count) {
        moves &= moves - 1;
    }
    moves & moves.wrapping_neg()
}

/// Openness of `flipped`: the number of (disc, direction) pairs where a
/// flipped disc touches a cell of `empty`.
pub fn count_open(flipped: u64, empty: u64) -> u32 {
    DIRECTIONS
        .iter()
        .map(|dir| popcount(dir.step(flipped) & empty))
        .sum()
}
