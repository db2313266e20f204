//! Bitreversi: a bitboard Othello engine with Monte Carlo search.
//!
//! This crate provides bit-parallel move generation for 8x8 Othello and two
//! search-based move evaluators built on random playouts: flat Monte Carlo
//! and Monte Carlo Tree Search with UCB1.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, direction masks and search defaults
//! - [`bitboard`] - Legal moves, flips and bit/cell conversions
//! - [`position`] - Position value type, parsing and display
//! - [`playout`] - Random game simulation for position evaluation
//! - [`flat`] - Flat (single-ply) Monte Carlo evaluation
//! - [`mcts`] - Monte Carlo Tree Search with UCB1
//! - [`strategy`] - The player contract and its implementations
//! - [`game`] - Self-play between two strategies
//!
//! ## Example
//!
//! ```
//! use bitreversi::mcts::Tree;
//! use bitreversi::position::{cell_name, Position};
//!
//! let pos = Position::initial();
//! let mut rng = fastrand::Rng::with_seed(1);
//!
//! // Run MCTS to find the best first move
//! let mut tree = Tree::new(pos, 0.3);
//! for _ in 0..100 {
//!     tree.run_iteration(&mut rng);
//! }
//! println!("Best move: {}", cell_name(tree.best_move()));
//! ```

pub mod bitboard;
pub mod constants;
pub mod flat;
pub mod game;
pub mod mcts;
pub mod playout;
pub mod position;
pub mod strategy;
