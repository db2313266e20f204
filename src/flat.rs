//! Flat (single-ply) Monte Carlo evaluation.
//!
//! Every legal move gets the same number of playouts and is scored by the
//! fraction of them the mover went on to win.

use fastrand::Rng;

use crate::bitboard::{apply_move, bit_to_cell, bits, legal_moves, popcount};
use crate::constants::{NO_SCORES, Scores};
use crate::playout::playout_random;

/// Playouts given to each legal move out of `budget`.
///
/// Rounds up by one, so the total run can exceed `budget`. Zero when there
/// are no legal moves.
pub fn playouts_per_move(budget: usize, num_legal: u32) -> usize {
    if num_legal == 0 {
        0
    } else {
        budget / num_legal as usize + 1
    }
}

/// Score each legal move of `(own, opponent)` by its playout win rate.
///
/// Illegal cells stay NaN; with no legal move the whole array is NaN.
pub fn flat_evaluate(own: u64, opponent: u64, budget: usize, rng: &mut Rng) -> Scores {
    let mut scores = NO_SCORES;
    let legal = legal_moves(own, opponent);
    let per_move = playouts_per_move(budget, popcount(legal));

    for mv in bits(legal) {
        let (own_after, opponent_after) = apply_move(own, opponent, mv);

        // The opponent moves next; its losses are our wins
        let wins = (0..per_move)
            .filter(|_| playout_random(opponent_after, own_after, rng) < 0)
            .count();
        scores[bit_to_cell(mv)] = wins as f64 / per_move as f64;
    }

    log::debug!("flat evaluation: {} moves x {} playouts", popcount(legal), per_move);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::cell_to_bit;
    use crate::constants::{CELLS, START_BLACK, START_WHITE};

    #[test]
    fn test_playouts_per_move() {
        assert_eq!(playouts_per_move(1024, 4), 257);
        assert_eq!(playouts_per_move(3, 4), 1);
        assert_eq!(playouts_per_move(0, 7), 1);
        assert_eq!(playouts_per_move(100, 0), 0);
    }

    #[test]
    fn test_no_legal_moves() {
        let mut rng = Rng::with_seed(5);
        let scores = flat_evaluate(u64::MAX, 0, 100, &mut rng);
        assert!(scores.iter().all(|s| s.is_nan()));
    }

    #[test]
    fn test_start_scores() {
        let mut rng = Rng::with_seed(5);
        let scores = flat_evaluate(START_BLACK, START_WHITE, 64, &mut rng);
        let legal = legal_moves(START_BLACK, START_WHITE);
        for cell in 0..CELLS {
            if legal & cell_to_bit(cell) != 0 {
                assert!((0.0..=1.0).contains(&scores[cell]));
            } else {
                assert!(scores[cell].is_nan());
            }
        }
    }

    #[test]
    fn test_single_move_wins() {
        // Only h1 is legal and it wins every playout outright.
        let own = cell_to_bit(0);
        let opponent = (1..7).map(cell_to_bit).fold(0, |acc, b| acc | b);
        let mut rng = Rng::with_seed(5);
        let scores = flat_evaluate(own, opponent, 10, &mut rng);
        assert_eq!(scores[7], 1.0);
        assert_eq!(scores.iter().filter(|s| !s.is_nan()).count(), 1);
    }

    #[test]
    fn test_deterministic() {
        let a = flat_evaluate(START_BLACK, START_WHITE, 40, &mut Rng::with_seed(11));
        let b = flat_evaluate(START_BLACK, START_WHITE, 40, &mut Rng::with_seed(11));
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}
