//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves for both sides until neither
//! can move, then scores the final board by disc difference. It is the leaf
//! evaluator shared by flat Monte Carlo and the tree search.

use fastrand::Rng;

use crate::bitboard::{apply_move, popcount, random_legal_move};

/// Perform a random playout from `(own, opponent)` with `own` to move.
///
/// A side without a legal move passes; two passes in a row end the game.
/// Returns the final disc difference from the perspective of the side that
/// was to move at the start:
/// - Positive score = starting player wins
/// - Negative score = starting player loses
pub fn playout_random(own: u64, opponent: u64, rng: &mut Rng) -> i32 {
    let (mut mover, mut waiter) = (own, opponent);
    let mut starter_to_move = true;
    let mut passes = 0;

    while passes < 2 {
        let mv = random_legal_move(mover, waiter, rng);
        if mv == 0 {
            passes += 1;
        } else {
            (mover, waiter) = apply_move(mover, waiter, mv);
            passes = 0;
        }
        std::mem::swap(&mut mover, &mut waiter);
        starter_to_move = !starter_to_move;
    }

    // Adjust for perspective
    let (own, opponent) = if starter_to_move {
        (mover, waiter)
    } else {
        (waiter, mover)
    };
    popcount(own) as i32 - popcount(opponent) as i32
}
