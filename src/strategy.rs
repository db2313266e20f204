//! Move-choosing strategies behind a common contract.
//!
//! A [`Strategy`] scores the cells of a position and picks a move. Search
//! strategies (flat Monte Carlo, MCTS) and simple heuristics all implement it,
//! so a game loop can drive any of them without knowing which one it holds.

use fastrand::Rng;

use crate::bitboard::{
    Cell, apply_move, bit_to_cell, bits, count_open, legal_moves, popcount, random_legal_move,
};
use crate::constants::{DEFAULT_EXPLORATION, DEFAULT_PLAYOUTS, NO_MOVE, NO_SCORES, Scores};
use crate::flat::flat_evaluate;
use crate::mcts;

/// A player: scores cells and chooses moves for the side owning `own`.
pub trait Strategy {
    /// Display name.
    fn name(&self) -> &str;

    /// Per-cell quality for the side to move; NaN for cells it cannot play.
    fn score_cells(&mut self, own: u64, opponent: u64) -> Scores;

    /// The move this strategy makes given its own `scores` for the position.
    ///
    /// Lets a caller that already scored the position pick the move without
    /// searching again.
    fn pick(&mut self, _own: u64, _opponent: u64, scores: &Scores) -> Cell {
        best_cell(scores)
    }

    /// A legal cell, or [`NO_MOVE`] when there is none.
    fn choose_move(&mut self, own: u64, opponent: u64) -> Cell {
        let scores = self.score_cells(own, opponent);
        self.pick(own, opponent, &scores)
    }
}

/// Cell with the highest score, ignoring NaN; the lowest cell wins ties.
///
/// Returns [`NO_MOVE`] if every score is NaN.
pub fn best_cell(scores: &Scores) -> Cell {
    pick_cell(scores, |candidate, best| candidate > best)
}

/// Cell with the lowest score, ignoring NaN; the lowest cell wins ties.
pub fn worst_cell(scores: &Scores) -> Cell {
    pick_cell(scores, |candidate, best| candidate < best)
}

fn pick_cell(scores: &Scores, better: impl Fn(f64, f64) -> bool) -> Cell {
    let mut best = NO_MOVE;
    for (cell, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if best == NO_MOVE || better(score, scores[best]) {
            best = cell;
        }
    }
    best
}

fn seeded(seed: Option<u64>) -> Rng {
    seed.map_or_else(Rng::new, Rng::with_seed)
}

// =============================================================================
// Heuristic strategies
// =============================================================================

/// Plays a uniformly random legal move. Has no evaluation of its own.
pub struct RandomMover {
    rng: Rng,
}

impl RandomMover {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }
}

impl Strategy for RandomMover {
    fn name(&self) -> &str {
        "random"
    }

    fn score_cells(&mut self, _own: u64, _opponent: u64) -> Scores {
        NO_SCORES
    }

    fn pick(&mut self, own: u64, opponent: u64, _scores: &Scores) -> Cell {
        bit_to_cell(random_legal_move(own, opponent, &mut self.rng))
    }
}

/// Greedy: maximises the number of own discs right after the move.
#[derive(Default)]
pub struct MaxCount;

impl Strategy for MaxCount {
    fn name(&self) -> &str {
        "max-count"
    }

    fn score_cells(&mut self, own: u64, opponent: u64) -> Scores {
        let mut scores = NO_SCORES;
        for mv in bits(legal_moves(own, opponent)) {
            let (own_after, _) = apply_move(own, opponent, mv);
            scores[bit_to_cell(mv)] = popcount(own_after) as f64;
        }
        scores
    }
}

/// Quiet moves: minimises how many empty cells the flipped discs touch.
#[derive(Default)]
pub struct MinOpen;

impl Strategy for MinOpen {
    fn name(&self) -> &str {
        "min-open"
    }

    fn score_cells(&mut self, own: u64, opponent: u64) -> Scores {
        let mut scores = NO_SCORES;
        let empty = !(own | opponent);
        for mv in bits(legal_moves(own, opponent)) {
            let (own_after, _) = apply_move(own, opponent, mv);
            scores[bit_to_cell(mv)] = count_open(own_after & opponent, empty) as f64;
        }
        scores
    }

    fn pick(&mut self, _own: u64, _opponent: u64, scores: &Scores) -> Cell {
        worst_cell(scores)
    }
}

// =============================================================================
// Search strategies
// =============================================================================

/// Flat Monte Carlo: scores each move by its playout win rate.
pub struct FlatMonteCarlo {
    playouts: usize,
    rng: Rng,
}

impl Default for FlatMonteCarlo {
    fn default() -> Self {
        Self::new(Rng::new())
    }
}

impl FlatMonteCarlo {
    pub fn new(rng: Rng) -> Self {
        Self::with_playouts(DEFAULT_PLAYOUTS, rng)
    }

    /// Create a player with a total playout budget per decision.
    pub fn with_playouts(playouts: usize, rng: Rng) -> Self {
        Self { playouts, rng }
    }

    pub fn playouts(&self) -> usize {
        self.playouts
    }
}

impl Strategy for FlatMonteCarlo {
    fn name(&self) -> &str {
        "monte-carlo"
    }

    fn score_cells(&mut self, own: u64, opponent: u64) -> Scores {
        flat_evaluate(own, opponent, self.playouts, &mut self.rng)
    }
}

/// Monte Carlo Tree Search: scores each move by its share of root visits.
pub struct MctsPlayer {
    iterations: usize,
    exploration: f64,
    rng: Rng,
}

impl Default for MctsPlayer {
    fn default() -> Self {
        Self::new(Rng::new())
    }
}

impl MctsPlayer {
    pub fn new(rng: Rng) -> Self {
        Self::with_iterations(DEFAULT_PLAYOUTS, DEFAULT_EXPLORATION, rng)
    }

    /// Create a player with a number of search iterations per decision.
    pub fn with_iterations(iterations: usize, exploration: f64, rng: Rng) -> Self {
        Self {
            iterations,
            exploration,
            rng,
        }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn exploration(&self) -> f64 {
        self.exploration
    }
}

impl Strategy for MctsPlayer {
    fn name(&self) -> &str {
        "mcts"
    }

    fn score_cells(&mut self, own: u64, opponent: u64) -> Scores {
        mcts::evaluate(
            own,
            opponent,
            self.iterations,
            self.exploration,
            &mut self.rng,
        )
    }
}

// =============================================================================
// Construction
// =============================================================================

/// Which strategy to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyKind {
    Random,
    MaxCount,
    MinOpen,
    #[value(name = "mc")]
    MonteCarlo,
    Mcts,
}

/// Budgets and seeding shared by every strategy built from a [`StrategyKind`].
#[derive(Clone, Copy, Debug)]
pub struct SearchSettings {
    /// Playouts (flat Monte Carlo) or iterations (MCTS) per decision
    pub playouts: usize,
    /// UCB1 exploration parameter
    pub exploration: f64,
    /// Fixed seed for reproducible play; `None` seeds from the system
    pub seed: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            playouts: DEFAULT_PLAYOUTS,
            exploration: DEFAULT_EXPLORATION,
            seed: None,
        }
    }
}

impl StrategyKind {
    pub fn build(self, settings: &SearchSettings) -> Box<dyn Strategy> {
        let rng = seeded(settings.seed);
        match self {
            StrategyKind::Random => Box::new(RandomMover::new(rng)),
            StrategyKind::MaxCount => Box::new(MaxCount),
            StrategyKind::MinOpen => Box::new(MinOpen),
            StrategyKind::MonteCarlo => {
                Box::new(FlatMonteCarlo::with_playouts(settings.playouts, rng))
            }
            StrategyKind::Mcts => Box::new(MctsPlayer::with_iterations(
                settings.playouts,
                settings.exploration,
                rng,
            )),
        }
    }
}
