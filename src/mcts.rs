//! Monte Carlo Tree Search (MCTS) implementation with UCB1.
//!
//! This module implements MCTS with:
//! - UCB1 for node selection, trying every child once before revisiting any
//! - Lazy expansion: a leaf is expanded when selection first ends on it, and
//!   its first new child is simulated
//! - Pass nodes, so a side without moves does not end the tree
//! - Random playouts for value estimation, exact scoring at terminal nodes
//!
//! The tree lives in an arena (`Vec<Node>`) addressed by [`NodeId`], with the
//! root at index 0. It is built fresh for every decision and thrown away
//! afterwards.
//!
//! Every node's value is accumulated from the point of view of the side to
//! move at the root. Selection reads it directly for children the root's side
//! chooses between and takes the complement for the other side's choices.

use fastrand::Rng;

use crate::bitboard::{Cell, bit_to_cell, bits};
use crate::constants::{NO_MOVE, NO_SCORES, Scores};
use crate::playout::playout_random;
use crate::position::{Position, cell_name};

/// Index of a node in the [`Tree`] arena.
pub type NodeId = usize;

/// The root always sits at the start of the arena.
pub const ROOT: NodeId = 0;

/// A node in the MCTS search tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// Cell played to reach this node; `None` for the root and pass nodes
    pub mv: Option<Cell>,
    /// Plies from the root; odd plies have the root's opponent to move
    pub ply: u32,
    /// Position seen from the side to move at this node
    pub pos: Position,
    /// Number of visits
    pub visits: u32,
    /// Sum of playout results (1 win, 0.5 draw, 0 loss for the root's side)
    pub value: f64,
    /// Child nodes, created on expansion and never changed afterwards
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(mv: Option<Cell>, ply: u32, pos: Position) -> Self {
        Self {
            mv,
            ply,
            pos,
            visits: 0,
            value: 0.0,
            children: Vec::new(),
        }
    }

    /// Winrate of the side that chose this node, or -0.1 if unvisited.
    #[inline]
    pub fn winrate(&self) -> f64 {
        if self.visits == 0 {
            return -0.1;
        }
        let value = if self.ply % 2 == 1 {
            self.value
        } else {
            self.visits as f64 - self.value
        };
        value / self.visits as f64
    }

    /// `true` for a node reached by passing.
    #[inline]
    pub fn is_pass(&self) -> bool {
        self.ply > 0 && self.mv.is_none()
    }
}

/// An ephemeral MCTS tree for a single decision.
pub struct Tree {
    nodes: Vec<Node>,
    exploration: f64,
}

impl Tree {
    /// Create a tree whose root is `pos`, with `pos.own` to move.
    pub fn new(pos: Position, exploration: f64) -> Self {
        Self {
            nodes: vec![Node::new(None, 0, pos)],
            exploration,
        }
    }

    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of nodes in the arena. Never zero: the root is always present.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Children of `id`, in creation order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.nodes[id].children.iter().map(|&c| &self.nodes[c])
    }

    /// UCB1 score of `child` under `parent`.
    ///
    /// Unvisited children score infinity so each is tried once first.
    fn ucb1(&self, parent: &Node, child: &Node) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }
        let visits = child.visits as f64;
        let exploitation = if child.ply % 2 == 1 {
            child.value / visits
        } else {
            (visits - child.value) / visits
        };
        exploitation + self.exploration * (2.0 * (parent.visits as f64).ln() / visits).sqrt()
    }

    /// Select the child with the highest UCB1 score; the first one wins ties.
    fn select_child(&self, id: NodeId) -> Option<NodeId> {
        let parent = &self.nodes[id];
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for &child in &parent.children {
            let score = self.ucb1(parent, &self.nodes[child]);
            if best.is_none() || score > best_score {
                best = Some(child);
                best_score = score;
            }
        }
        best
    }

    /// Expand a leaf by generating one child per legal move.
    ///
    /// A side without moves gets a single pass child if its opponent can
    /// still move. A terminal leaf gets no children.
    fn expand(&mut self, id: NodeId) {
        let (pos, ply) = {
            let node = &self.nodes[id];
            if !node.children.is_empty() {
                return;
            }
            (node.pos, node.ply)
        };

        let moves = pos.legal_moves();
        let mut children = Vec::new();
        if moves == 0 {
            if pos.swapped().legal_moves() != 0 {
                children.push(self.push(Node::new(None, ply + 1, pos.swapped())));
            }
        } else {
            for mv in bits(moves) {
                let cell = bit_to_cell(mv);
                children.push(self.push(Node::new(Some(cell), ply + 1, pos.play(cell))));
            }
        }
        self.nodes[id].children = children;
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Result of a simulation from `id`, seen from the root's side to move.
    ///
    /// Terminal nodes are scored from their discs; anything else by a playout.
    fn simulate(&self, id: NodeId, terminal: bool, rng: &mut Rng) -> f64 {
        let node = &self.nodes[id];
        let diff = if terminal {
            node.pos.disc_diff()
        } else {
            playout_random(node.pos.own, node.pos.opponent, rng)
        };

        // Odd plies have the opponent to move
        let diff = if node.ply % 2 == 1 { -diff } else { diff };
        match diff.signum() {
            1 => 1.0,
            0 => 0.5,
            _ => 0.0,
        }
    }

    /// Run one selection, expansion, simulation and backup pass.
    ///
    /// This is the unit of work: stopping between calls always leaves the
    /// tree consistent.
    pub fn run_iteration(&mut self, rng: &mut Rng) {
        // Descend to a leaf
        let mut path = vec![ROOT];
        let mut current = ROOT;
        while let Some(child) = self.select_child(current) {
            path.push(child);
            current = child;
        }

        // Expand it and step into its first untried child
        self.expand(current);
        let (leaf, terminal) = match self.select_child(current) {
            Some(child) => {
                path.push(child);
                (child, false)
            }
            None => (current, true),
        };

        let delta = self.simulate(leaf, terminal, rng);

        for id in path {
            let node = &mut self.nodes[id];
            node.visits += 1;
            node.value += delta;
        }
    }

    /// Visit share of each of the root's move children.
    ///
    /// Pass children are left out; every other cell is NaN.
    pub fn scores(&self) -> Scores {
        let mut scores = NO_SCORES;
        let total = self.root().visits;
        if total == 0 {
            return scores;
        }
        for child in self.children(ROOT) {
            if let Some(cell) = child.mv {
                scores[cell] = child.visits as f64 / total as f64;
            }
        }
        scores
    }

    /// Find the best move (most visited child); the first one wins ties.
    ///
    /// Returns [`NO_MOVE`] when the root has no move children.
    pub fn best_move(&self) -> Cell {
        self.children(ROOT)
            .filter_map(|c| c.mv.map(|cell| (cell, c.visits)))
            .fold(None, |best: Option<(Cell, u32)>, (cell, visits)| match best {
                Some((_, v)) if v >= visits => best,
                _ => Some((cell, visits)),
            })
            .map_or(NO_MOVE, |(cell, _)| cell)
    }

    /// Log statistics about the root's children.
    pub fn dump_children(&self) {
        for child in self.children(ROOT) {
            log::debug!(
                "move {} v={} w={:.1} wr={:.3}",
                child.mv.map_or_else(|| cell_name(NO_MOVE), cell_name),
                child.visits,
                child.value,
                child.winrate()
            );
        }
    }
}

/// Search `(own, opponent)` for `iterations` iterations and return the visit
/// share of each legal move.
pub fn evaluate(
    own: u64,
    opponent: u64,
    iterations: usize,
    exploration: f64,
    rng: &mut Rng,
) -> Scores {
    let mut tree = Tree::new(Position::new(own, opponent), exploration);
    for _ in 0..iterations {
        tree.run_iteration(rng);
    }

    log::debug!(
        "mcts: {} iterations, {} nodes, best {}",
        tree.root().visits,
        tree.node_count(),
        cell_name(tree.best_move())
    );
    tree.dump_children();

    tree.scores()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::{cell_to_bit, legal_moves, popcount};
    use crate::constants::{CELLS, START_BLACK, START_WHITE};

    /// Own to move has no legal move, opponent can play a3 or b3.
    fn pass_position() -> Position {
        Position::new(
            cell_to_bit(0) | cell_to_bit(9),
            (1..8).map(cell_to_bit).fold(0, |acc, b| acc | b),
        )
    }

    #[test]
    fn test_root_visits_match_iterations() {
        let mut rng = Rng::with_seed(1);
        let mut tree = Tree::new(Position::initial(), 0.3);
        for _ in 0..100 {
            tree.run_iteration(&mut rng);
        }
        assert_eq!(tree.root().visits, 100);
        let child_visits: u32 = tree.children(ROOT).map(|c| c.visits).sum();
        assert_eq!(child_visits, 100);
    }

    #[test]
    fn test_first_iterations_try_each_child() {
        let mut rng = Rng::with_seed(1);
        let mut tree = Tree::new(Position::initial(), 0.3);
        for _ in 0..4 {
            tree.run_iteration(&mut rng);
        }
        assert_eq!(tree.root().children.len(), 4);
        assert!(tree.children(ROOT).all(|c| c.visits == 1));

        // The first child is simulated as it is created. The others are
        // leaves when selection reaches them, so they are expanded and their
        // first child simulated instead.
        let children: Vec<&Node> = tree.children(ROOT).collect();
        assert!(children[0].children.is_empty());
        for child in &children[1..] {
            assert_eq!(child.children.len(), 3);
            let grandchildren: Vec<u32> = child
                .children
                .iter()
                .map(|&id| tree.node(id).visits)
                .collect();
            assert_eq!(grandchildren, vec![1, 0, 0]);
        }
        assert_eq!(tree.node_count(), 1 + 4 + 3 * 3);
    }

    #[test]
    fn test_children_created_once() {
        let mut rng = Rng::with_seed(2);
        let mut tree = Tree::new(Position::initial(), 0.3);
        tree.run_iteration(&mut rng);
        let first = tree.root().children.clone();
        for _ in 0..50 {
            tree.run_iteration(&mut rng);
        }
        assert_eq!(tree.root().children, first);
    }

    #[test]
    fn test_child_positions_swap_sides() {
        let mut rng = Rng::with_seed(3);
        let mut tree = Tree::new(Position::initial(), 0.3);
        tree.run_iteration(&mut rng);
        for child in tree.children(ROOT) {
            assert_eq!(child.ply, 1);
            assert_eq!(popcount(child.pos.own), 1);
            assert_eq!(popcount(child.pos.opponent), 4);
        }
    }

    #[test]
    fn test_pass_child() {
        let pos = pass_position();
        assert_eq!(legal_moves(pos.own, pos.opponent), 0);

        let mut rng = Rng::with_seed(4);
        let mut tree = Tree::new(pos, 0.3);
        tree.run_iteration(&mut rng);

        assert_eq!(tree.root().children.len(), 1);
        let pass = tree.node(tree.root().children[0]);
        assert!(pass.is_pass());
        assert_eq!(pass.pos, pos.swapped());
        assert_eq!(pass.ply, 1);
        assert_eq!(pass.visits, 1);
    }

    #[test]
    fn test_pass_scores_are_nan() {
        let pos = pass_position();
        let mut rng = Rng::with_seed(4);
        let scores = evaluate(pos.own, pos.opponent, 20, 0.3, &mut rng);
        assert!(scores.iter().all(|s| s.is_nan()));
    }

    #[test]
    fn test_terminal_root() {
        // Neither side can move; own has more discs.
        let pos = Position::new(0xffff_ffff_0000_0000, 0x0000_0000_00ff_ffff);
        let mut rng = Rng::with_seed(5);
        let mut tree = Tree::new(pos, 0.3);
        for _ in 0..10 {
            tree.run_iteration(&mut rng);
        }
        assert!(tree.root().children.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root().visits, 10);
        assert_eq!(tree.root().value, 10.0);
        assert_eq!(tree.best_move(), NO_MOVE);
    }

    #[test]
    fn test_terminal_child_from_root_view() {
        // h1 ends the game with own holding the whole first row.
        let own = cell_to_bit(0);
        let opponent = (1..7).map(cell_to_bit).fold(0, |acc, b| acc | b);
        let mut rng = Rng::with_seed(6);
        let mut tree = Tree::new(Position::new(own, opponent), 0.3);
        for _ in 0..8 {
            tree.run_iteration(&mut rng);
        }
        // Every iteration is a root win, whether by playout or terminal scoring
        assert_eq!(tree.root().value, 8.0);
        let child = tree.children(ROOT).next().unwrap();
        assert_eq!(child.mv, Some(7));
        assert_eq!(child.winrate(), 1.0);
    }

    #[test]
    fn test_zero_budget() {
        let mut rng = Rng::with_seed(7);
        let scores = evaluate(START_BLACK, START_WHITE, 0, 0.3, &mut rng);
        assert!(scores.iter().all(|s| s.is_nan()));
    }

    #[test]
    fn test_scores_sum_to_one() {
        let mut rng = Rng::with_seed(8);
        let n = 200;
        let scores = evaluate(START_BLACK, START_WHITE, n, 0.3, &mut rng);
        let total: f64 = scores
            .iter()
            .filter(|s| !s.is_nan())
            .map(|s| s * n as f64)
            .sum();
        assert!((total - n as f64).abs() < 1e-9);
        assert_eq!(scores.iter().filter(|s| !s.is_nan()).count(), 4);
        let legal = legal_moves(START_BLACK, START_WHITE);
        for cell in 0..CELLS {
            assert_eq!(scores[cell].is_nan(), legal & cell_to_bit(cell) == 0);
        }
    }

    #[test]
    fn test_finds_only_winning_move() {
        // Five legal moves; h1 wins on every line, the rest lose on every line.
        let pos = Position::new(0x0000_00a8_c0fc_e027, 0xffbf_ff57_3f00_1f50);
        let mut rng = Rng::with_seed(9);
        let mut tree = Tree::new(pos, 0.3);
        for _ in 0..300 {
            tree.run_iteration(&mut rng);
        }
        assert_eq!(tree.root().children.len(), 5);
        assert_eq!(tree.best_move(), 7);
    }

    #[test]
    fn test_deterministic() {
        let a = evaluate(START_BLACK, START_WHITE, 150, 0.3, &mut Rng::with_seed(10));
        let b = evaluate(START_BLACK, START_WHITE, 150, 0.3, &mut Rng::with_seed(10));
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}
