//! Arena-allocated search tree.
//!
//! Using a Vec<Node> with indices provides better cache locality
//! and simpler ownership compared to Rc<RefCell<Node>>. Nodes are only
//! ever appended; the whole arena is dropped when the engine moves on.

use crate::node::{Node, NodeId};
use mcts_core::{MctsError, Result};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Arena-allocated search tree.
///
/// The node at [`NodeId::ROOT`] is the only one without a parent. Every
/// other node is created by [`Tree::add_child`].
#[derive(Clone, Debug)]
pub struct Tree<M, B, P> {
    nodes: Vec<Node<M, B, P>>,
}

impl<M, B, P> Tree<M, B, P> {
    /// Create a tree holding a single parentless root.
    pub fn new(board: B, player: P) -> Self {
        Self {
            nodes: vec![Node::new(board, player, None)],
        }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId was not issued by this tree.
    pub fn get(&self, id: NodeId) -> &Node<M, B, P> {
        &self.nodes[id.0]
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<M, B, P> {
        self.get(NodeId::ROOT)
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists for the lifetime of the tree.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.get(id).is_leaf()
    }

    /// Children of `id` in expansion order.
    pub fn children(&self, id: NodeId) -> &[(M, NodeId)] {
        self.get(id).children()
    }

    /// Iterate from `id` up to the root, both inclusive.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |current| self.get(*current).parent)
    }

    /// Number of moves between the root and `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count() - 1
    }
}

impl<M, B, P> Tree<M, B, P>
where
    M: Eq + Debug,
{
    /// Add a child under `parent`, reached from it by `mv`.
    ///
    /// # Errors
    /// Returns `MctsError::DuplicateMoveKey` if `parent` already has a child
    /// for `mv`.
    pub fn add_child(&mut self, parent: NodeId, mv: M, board: B, player: P) -> Result<NodeId> {
        if self.get(parent).children.iter().any(|(m, _)| *m == mv) {
            return Err(MctsError::DuplicateMoveKey(format!("{:?}", mv)));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(board, player, Some(parent)));
        self.nodes[parent.0].children.push((mv, id));
        Ok(id)
    }
}

impl<M, B, P> Tree<M, B, P>
where
    P: Eq + Hash,
{
    /// Record one simulation passing through `id`.
    ///
    /// The visit always counts. The win counts when `id` is the root, or
    /// when the player who moved into `id` (its parent's player) is among
    /// the winners.
    pub fn record_visit(&mut self, id: NodeId, winners: &HashSet<P>) {
        let credited = match self.get(id).parent {
            None => true,
            Some(parent) => winners.contains(&self.get(parent).player),
        };

        let node = &mut self.nodes[id.0];
        node.visit_count += 1;
        if credited {
            node.win_count += 1;
        }
    }
}
