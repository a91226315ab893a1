//! Search tree with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by [`NodeId`]. Each
//! node keeps its parent index and child indices, so there are no reference
//! cycles and dropping the tree frees everything at once.

use crate::board::{Board, Pos, Stone};
use crate::rules::{available_moves, check_win};

use super::node::{NodeId, Outcome, SearchNode};
use super::SearchError;

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Create a tree whose root is `board` with `to_move` to play.
    ///
    /// The root's candidate moves are queued but no children exist yet;
    /// call [`expand_all`](Self::expand_all) to materialise them.
    pub fn new(board: Board, to_move: Stone) -> Self {
        let mut root = SearchNode::new_root(board, to_move);
        root.untried = untried_stack(&board);
        root.fully_expanded = root.untried.is_empty();
        Self { nodes: vec![root] }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.index()]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    fn allocate(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Materialise one untried move of `id` as a child.
    ///
    /// Returns `Ok(None)` when nothing is left to expand.
    pub fn expand_one(&mut self, id: NodeId) -> Result<Option<NodeId>, SearchError> {
        let node = self.get_mut(id);
        if node.is_terminal() {
            node.fully_expanded = true;
            return Ok(None);
        }
        let Some(mv) = node.untried.pop() else {
            node.fully_expanded = true;
            return Ok(None);
        };
        if node.untried.is_empty() {
            node.fully_expanded = true;
        }

        let parent_board = node.board;
        let mover = node.to_move;
        if !parent_board.is_empty(mv) {
            return Err(SearchError::OccupiedCell { node: id, pos: mv });
        }

        let board = parent_board.apply_move(mv, mover);
        let outcome = if check_win(&board, Some(mv)).is_some() {
            Some(Outcome::Win(mover))
        } else if board.is_full() {
            Some(Outcome::Draw)
        } else {
            None
        };
        let untried = if outcome.is_some() {
            Vec::new()
        } else {
            untried_stack(&board)
        };

        let child = SearchNode::new_child(id, mv, board, mover.opponent(), untried, outcome);
        let child_id = self.allocate(child);
        self.get_mut(id).children.push(child_id);
        Ok(Some(child_id))
    }

    /// Materialise every untried move of `id`.
    pub fn expand_all(&mut self, id: NodeId) -> Result<(), SearchError> {
        while self.expand_one(id)?.is_some() {}
        Ok(())
    }

    /// Child of `id` with the highest UCB score; ties go to the first one.
    pub fn select_best_child(
        &self,
        id: NodeId,
        exploration: f64,
        q_weight: f64,
    ) -> Option<NodeId> {
        let node = self.get(id);
        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let score = self
                .get(child_id)
                .ucb_score(node.visits, exploration, q_weight);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.map(|(child_id, _)| child_id)
    }

    /// Update one node's statistics using its children's current Q-values.
    pub fn update_stats(&mut self, id: NodeId, result: f64, alpha: f64, gamma: f64) {
        let best_child_q = self
            .get(id)
            .children
            .iter()
            .map(|&c| self.get(c).q_value)
            .fold(None, |acc: Option<f64>, q| Some(acc.map_or(q, |a| a.max(q))))
            .unwrap_or(0.0);
        self.get_mut(id)
            .update_stats(result, best_child_q, alpha, gamma);
    }

    /// Backpropagate a rollout result from `leaf` to the root.
    ///
    /// `result` is from `searcher`'s point of view. Every node stores its
    /// statistics from the point of view of the player who made its move,
    /// so the value is flipped exactly once per level on the way up.
    pub fn backpropagate(
        &mut self,
        leaf: NodeId,
        result: f64,
        searcher: Stone,
        alpha: f64,
        gamma: f64,
    ) {
        let mut value = if self.get(leaf).mover() == searcher {
            result
        } else {
            1.0 - result
        };
        let mut current = Some(leaf);

        while let Some(id) = current {
            self.update_stats(id, value, alpha, gamma);
            value = 1.0 - value;
            current = self.get(id).parent;
        }
    }

    /// Root child that wins on the spot, if any.
    pub fn winning_root_child(&self) -> Option<NodeId> {
        let root = self.get(self.root());
        let mover = root.to_move;
        root.children
            .iter()
            .copied()
            .find(|&c| self.get(c).outcome == Some(Outcome::Win(mover)))
    }

    /// Visited root child with the highest win rate; ties go to the first.
    pub fn best_root_child(&self) -> Option<NodeId> {
        let root = self.get(self.root());
        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &root.children {
            let child = self.get(child_id);
            if child.visits == 0 {
                continue;
            }
            let rate = child.win_rate();
            match best {
                Some((_, best_rate)) if rate <= best_rate => {}
                _ => best = Some((child_id, rate)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Moves of the root's children, in child order.
    pub fn root_moves(&self) -> Vec<Pos> {
        self.get(self.root())
            .children
            .iter()
            .filter_map(|&c| self.get(c).mv)
            .collect()
    }
}

/// Candidate moves arranged so that `pop()` yields them in ascending order.
fn untried_stack(board: &Board) -> Vec<Pos> {
    let mut moves = available_moves(board);
    if board.is_full() {
        moves.clear();
    }
    moves.reverse();
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHA: f64 = 0.1;
    const GAMMA: f64 = 0.9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_root_children_follow_candidates() {
        let board = Board::new().apply_move(Pos::CENTER, Stone::Black);
        let mut tree = SearchTree::new(board, Stone::White);
        tree.expand_all(tree.root()).unwrap();

        let root = tree.get(tree.root());
        assert!(root.fully_expanded);
        assert_eq!(root.children.len(), 24);
        assert_eq!(tree.root_moves(), available_moves(&board));
        for &c in &root.children {
            let child = tree.get(c);
            assert_eq!(child.mover(), Stone::White);
            assert_eq!(child.to_move, Stone::Black);
            assert_eq!(child.parent, Some(tree.root()));
        }
    }

    #[test]
    fn test_expand_one_marks_fully_expanded() {
        let board = Board::new();
        let mut tree = SearchTree::new(board, Stone::Black);
        let root = tree.root();
        // Empty board: only the center
        let child = tree.expand_one(root).unwrap().unwrap();
        assert_eq!(tree.get(child).mv, Some(Pos::CENTER));
        assert!(tree.get(root).fully_expanded);
        assert!(tree.expand_one(root).unwrap().is_none());
    }

    #[test]
    fn test_winning_child_is_terminal() {
        let mut board = Board::new();
        for c in 3..7 {
            board.place_stone(Pos::new(7, c), Stone::Black);
        }
        board.place_stone(Pos::new(0, 0), Stone::White);
        let mut tree = SearchTree::new(board, Stone::Black);
        tree.expand_all(tree.root()).unwrap();

        let win = tree.winning_root_child().expect("a winning child");
        let mv = tree.get(win).mv.unwrap();
        assert!(mv == Pos::new(7, 2) || mv == Pos::new(7, 7));
        assert_eq!(tree.get(win).outcome, Some(Outcome::Win(Stone::Black)));
        assert!(tree.get(win).fully_expanded);
    }

    #[test]
    fn test_select_prefers_unvisited_then_first_max() {
        let board = Board::new().apply_move(Pos::CENTER, Stone::Black);
        let mut tree = SearchTree::new(board, Stone::White);
        let root = tree.root();
        tree.expand_all(root).unwrap();
        let children = tree.get(root).children.clone();

        // All unvisited: first child
        assert_eq!(tree.select_best_child(root, 1.4, 0.1), Some(children[0]));

        // Visit the first one; the second (unvisited) wins now
        tree.backpropagate(children[0], 1.0, Stone::White, ALPHA, GAMMA);
        assert_eq!(tree.select_best_child(root, 1.4, 0.1), Some(children[1]));
    }

    /// Root (Black to move) -> A (Black's move) -> B (White's move).
    #[test]
    fn test_backpropagate_hand_computed_tree() {
        let board = Board::new().apply_move(Pos::CENTER, Stone::White);
        let mut tree = SearchTree::new(board, Stone::Black);
        let root = tree.root();
        let a = tree.expand_one(root).unwrap().unwrap();
        let b = tree.expand_one(a).unwrap().unwrap();
        assert_eq!(tree.get(a).mover(), Stone::Black);
        assert_eq!(tree.get(b).mover(), Stone::White);

        // Black wins the first rollout
        tree.backpropagate(b, 1.0, Stone::Black, ALPHA, GAMMA);
        assert_eq!(tree.get(b).visits, 1);
        assert_close(tree.get(b).wins, 0.0);
        assert_close(tree.get(b).q_value, 0.0);
        assert_close(tree.get(a).wins, 1.0);
        assert_close(tree.get(a).q_value, 0.1);
        assert_close(tree.get(root).wins, 0.0);
        assert_close(tree.get(root).q_value, 0.009);

        // White wins the second
        tree.backpropagate(b, 0.0, Stone::Black, ALPHA, GAMMA);
        assert_eq!(tree.get(b).visits, 2);
        assert_close(tree.get(b).wins, 1.0);
        assert_close(tree.get(b).q_value, 0.1);
        assert_eq!(tree.get(a).visits, 2);
        assert_close(tree.get(a).wins, 1.0);
        assert_close(tree.get(a).q_value, 0.099);
        assert_eq!(tree.get(root).visits, 2);
        assert_close(tree.get(root).wins, 1.0);
        assert_close(tree.get(root).q_value, 0.11701);
    }

    #[test]
    fn test_backpropagate_partial_result_flips_per_level() {
        let board = Board::new().apply_move(Pos::CENTER, Stone::White);
        let mut tree = SearchTree::new(board, Stone::Black);
        let root = tree.root();
        let a = tree.expand_one(root).unwrap().unwrap();
        let b = tree.expand_one(a).unwrap().unwrap();
        let c = tree.expand_one(b).unwrap().unwrap();

        tree.backpropagate(c, 0.8, Stone::Black, ALPHA, GAMMA);
        // c and a are Black's moves, b and root are not
        assert_close(tree.get(c).wins, 0.8);
        assert_close(tree.get(b).wins, 0.2);
        assert_close(tree.get(a).wins, 0.8);
        assert_close(tree.get(root).wins, 0.2);
    }

    #[test]
    fn test_best_root_child_by_win_rate_not_visits() {
        let board = Board::new().apply_move(Pos::CENTER, Stone::Black);
        let mut tree = SearchTree::new(board, Stone::White);
        let root = tree.root();
        tree.expand_all(root).unwrap();
        let children = tree.get(root).children.clone();

        assert!(tree.best_root_child().is_none());

        // children[0]: 3 visits, 2 wins. children[1]: 1 visit, 1 win.
        for r in [1.0, 1.0, 0.0] {
            tree.backpropagate(children[0], r, Stone::White, ALPHA, GAMMA);
        }
        tree.backpropagate(children[1], 1.0, Stone::White, ALPHA, GAMMA);
        assert_eq!(tree.best_root_child(), Some(children[1]));

        // Equal rate: the earlier child wins the tie
        tree.backpropagate(children[2], 1.0, Stone::White, ALPHA, GAMMA);
        assert_eq!(tree.best_root_child(), Some(children[1]));
    }
}
