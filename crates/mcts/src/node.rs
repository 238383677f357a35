//! Search tree node types.
//!
//! Nodes live in an arena ([`crate::tree::Tree`]) and refer to each other by
//! index, so the parent link is a lookup rather than a second owner.

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Using indices instead of pointers avoids Rc/RefCell overhead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the search tree.
///
/// A node stands for "`player` is about to move from `board`". Its board,
/// player and parent are fixed at creation; only the children and the
/// counters change, and only through the owning tree.
#[derive(Clone, Debug)]
pub struct Node<M, B, P> {
    pub(crate) board: B,
    pub(crate) player: P,
    pub(crate) parent: Option<NodeId>,

    /// Children in the order they were expanded: (move, node_id) pairs.
    pub(crate) children: Vec<(M, NodeId)>,

    pub(crate) visit_count: u32,
    pub(crate) win_count: u32,
}

impl<M, B, P> Node<M, B, P> {
    pub(crate) fn new(board: B, player: P, parent: Option<NodeId>) -> Self {
        Self {
            board,
            player,
            parent,
            children: Vec::new(),
            visit_count: 0,
            win_count: 0,
        }
    }

    /// The board state at this node.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// The player whose move decides which child is reached next.
    pub fn player(&self) -> &P {
        &self.player
    }

    /// The node this one was expanded from, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Nodes reachable by a single move, in expansion order.
    pub fn children(&self) -> &[(M, NodeId)] {
        &self.children
    }

    /// Number of simulations whose backpropagation passed through this node.
    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }

    /// Number of those visits credited as a win for the move leading here.
    pub fn win_count(&self) -> u32 {
        self.win_count
    }

    /// Whether this node has no children yet.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Fraction of visits that were wins.
    ///
    /// Returns 0.0 if the node has never been visited.
    pub fn win_rate(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            f64::from(self.win_count) / f64::from(self.visit_count)
        }
    }
}

impl<M: PartialEq, B, P> Node<M, B, P> {
    /// Child reached by `mv`, if it has been expanded.
    pub fn child(&self, mv: &M) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(m, _)| m == mv)
            .map(|(_, id)| *id)
    }
}
