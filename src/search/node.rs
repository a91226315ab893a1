//! Search tree node representation.
//!
//! Each node is the position reached by playing `mv` from its parent. Nodes
//! live in the [`SearchTree`](super::tree::SearchTree) arena and refer to
//! each other by [`NodeId`].

use crate::board::{Board, Pos, Stone};

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a decided position ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Stone),
    Draw,
}

impl Outcome {
    /// Result in [0, 1] from `player`'s point of view
    pub fn value_for(self, player: Stone) -> f64 {
        match self {
            Outcome::Win(winner) if winner == player => 1.0,
            Outcome::Win(_) => 0.0,
            Outcome::Draw => 0.5,
        }
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Move that led here from the parent (None for root)
    pub mv: Option<Pos>,

    /// Player to move in this node's position
    pub to_move: Stone,

    /// Parent node index (None for root)
    pub parent: Option<NodeId>,

    /// Children in creation order
    pub children: Vec<NodeId>,

    /// Number of times this node has been visited
    pub visits: u32,

    /// Sum of results, from the point of view of the player who made `mv`
    pub wins: f64,

    /// Temporal-difference value estimate
    pub q_value: f64,

    /// Position at this node
    pub board: Board,

    /// Legal moves without a child yet, popped from the back
    pub untried: Vec<Pos>,

    /// Set once every legal move has a child, or the node is terminal
    pub fully_expanded: bool,

    /// Set when the position is decided
    pub outcome: Option<Outcome>,
}

impl SearchNode {
    /// Create a root node. Candidate moves are filled in by the tree.
    pub fn new_root(board: Board, to_move: Stone) -> Self {
        Self {
            mv: None,
            to_move,
            parent: None,
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
            q_value: 0.0,
            board,
            untried: Vec::new(),
            fully_expanded: false,
            outcome: None,
        }
    }

    /// Create a child reached by `mv`.
    pub fn new_child(
        parent: NodeId,
        mv: Pos,
        board: Board,
        to_move: Stone,
        untried: Vec<Pos>,
        outcome: Option<Outcome>,
    ) -> Self {
        let fully_expanded = outcome.is_some() || untried.is_empty();
        Self {
            mv: Some(mv),
            to_move,
            parent: Some(parent),
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
            q_value: 0.0,
            board,
            untried,
            fully_expanded,
            outcome,
        }
    }

    /// Player who made this node's move
    #[inline]
    pub fn mover(&self) -> Stone {
        self.to_move.opponent()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Empirical win rate; 0.0 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }

    /// UCB1 score blended with the learned Q-value.
    ///
    /// Unvisited nodes score `+inf` so every sibling is tried once before
    /// scores are compared.
    #[inline]
    pub fn ucb_score(&self, parent_visits: u32, exploration: f64, q_weight: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visits = self.visits as f64;
        let explore = if parent_visits > 1 {
            exploration * ((parent_visits as f64).ln() / visits).sqrt()
        } else {
            0.0
        };
        self.win_rate() + explore + q_weight * self.q_value
    }

    /// Record one visit with `result` in [0, 1].
    ///
    /// `q <- (1 - alpha) * q + alpha * (result + gamma * best_child_q)`
    pub fn update_stats(&mut self, result: f64, best_child_q: f64, alpha: f64, gamma: f64) {
        let result = result.clamp(0.0, 1.0);
        self.visits += 1;
        self.wins += result;
        self.q_value = (1.0 - alpha) * self.q_value + alpha * (result + gamma * best_child_q);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf() -> SearchNode {
        SearchNode::new_child(
            NodeId(0),
            Pos::CENTER,
            Board::new().apply_move(Pos::CENTER, Stone::Black),
            Stone::White,
            vec![Pos::new(6, 6)],
            None,
        )
    }

    #[test]
    fn test_new_root() {
        let node = SearchNode::new_root(Board::new(), Stone::Black);
        assert!(node.parent.is_none());
        assert!(node.mv.is_none());
        assert_eq!(node.visits, 0);
        assert_eq!(node.to_move, Stone::Black);
        assert_eq!(node.mover(), Stone::White);
        assert!(!node.fully_expanded);
    }

    #[test]
    fn test_terminal_child_is_fully_expanded() {
        let node = SearchNode::new_child(
            NodeId(0),
            Pos::CENTER,
            Board::new(),
            Stone::White,
            vec![Pos::new(1, 1)],
            Some(Outcome::Win(Stone::Black)),
        );
        assert!(node.is_terminal());
        assert!(node.fully_expanded);
    }

    #[test]
    fn test_unvisited_scores_infinity() {
        let node = leaf();
        assert!(node.ucb_score(10, 1.4, 0.1).is_infinite());
    }

    #[test]
    fn test_unvisited_beats_any_visited_sibling() {
        let mut visited = leaf();
        visited.visits = 1;
        visited.wins = 1.0;
        visited.q_value = 10.0;
        let fresh = leaf();
        assert!(fresh.ucb_score(2, 100.0, 1.0) > visited.ucb_score(2, 100.0, 1.0));
    }

    #[test]
    fn test_ucb_formula() {
        let mut node = leaf();
        node.visits = 4;
        node.wins = 3.0;
        node.q_value = 0.5;
        let parent_visits = 20u32;
        let expected = 0.75 + 1.5 * ((20f64).ln() / 4.0).sqrt() + 0.1 * 0.5;
        assert!((node.ucb_score(parent_visits, 1.5, 0.1) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_update_stats_td_rule() {
        let mut node = leaf();
        node.update_stats(1.0, 0.5, 0.1, 0.9);
        assert_eq!(node.visits, 1);
        assert!((node.wins - 1.0).abs() < 1e-12);
        // 0.9 * 0 + 0.1 * (1.0 + 0.9 * 0.5)
        assert!((node.q_value - 0.145).abs() < 1e-12);

        node.update_stats(0.0, 0.0, 0.1, 0.9);
        assert_eq!(node.visits, 2);
        assert!((node.q_value - 0.1305).abs() < 1e-12);
        assert!((node.win_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_update_stats_clamps_result() {
        let mut node = leaf();
        node.update_stats(3.0, 0.0, 0.1, 0.9);
        node.update_stats(-2.0, 0.0, 0.1, 0.9);
        assert!(node.wins <= node.visits as f64);
        assert!((node.win_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_outcome_values() {
        assert_eq!(Outcome::Win(Stone::Black).value_for(Stone::Black), 1.0);
        assert_eq!(Outcome::Win(Stone::Black).value_for(Stone::White), 0.0);
        assert_eq!(Outcome::Draw.value_for(Stone::White), 0.5);
    }
}
