//! Search results reported at the root.

use crate::node::NodeId;
use crate::tree::Tree;
use std::collections::HashMap;
use std::hash::Hash;

/// Statistics for one move available from the root.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveEstimate<M> {
    /// The move, as listed by the game.
    pub mv: M,

    /// `win_count / visit_count`, or 0.0 for an unvisited child.
    pub win_rate: f64,

    /// Simulations that went through this move.
    pub visit_count: u32,

    /// Of those, simulations won by the player making the move.
    pub win_count: u32,
}

/// Result of a search: one estimate per child of the root.
///
/// Estimates keep the order in which the game listed the moves.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult<M> {
    estimates: Vec<MoveEstimate<M>>,
}

impl<M: Clone + PartialEq> SearchResult<M> {
    /// Collect the estimates for the children of `id`.
    pub fn from_tree<B, P>(tree: &Tree<M, B, P>, id: NodeId) -> Self {
        let estimates = tree
            .children(id)
            .iter()
            .map(|(mv, child_id)| {
                let child = tree.get(*child_id);
                MoveEstimate {
                    mv: mv.clone(),
                    win_rate: child.win_rate(),
                    visit_count: child.visit_count(),
                    win_count: child.win_count(),
                }
            })
            .collect();

        Self { estimates }
    }

    /// Estimate for `mv`, if it is a child of the root.
    pub fn get(&self, mv: &M) -> Option<&MoveEstimate<M>> {
        self.estimates.iter().find(|e| e.mv == *mv)
    }

    /// Win rate of `mv`, if it is a child of the root.
    pub fn win_rate(&self, mv: &M) -> Option<f64> {
        self.get(mv).map(|e| e.win_rate)
    }

    /// The visited move with the highest win rate.
    ///
    /// Ties go to the move listed first by the game. Returns `None` when no
    /// child of the root has been visited (terminal root, or nothing run).
    pub fn best(&self) -> Option<M> {
        let mut best: Option<&MoveEstimate<M>> = None;
        for estimate in self.estimates.iter().filter(|e| e.visit_count > 0) {
            match best {
                Some(current) if current.win_rate >= estimate.win_rate => {}
                _ => best = Some(estimate),
            }
        }
        best.map(|e| e.mv.clone())
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveEstimate<M>> {
        self.estimates.iter()
    }

    /// Sum of visits over all root children.
    pub fn total_visits(&self) -> u64 {
        self.estimates.iter().map(|e| u64::from(e.visit_count)).sum()
    }
}

impl<M: Clone + Eq + Hash> SearchResult<M> {
    /// Win rate per move.
    pub fn to_map(&self) -> HashMap<M, f64> {
        self.estimates
            .iter()
            .map(|e| (e.mv.clone(), e.win_rate))
            .collect()
    }
}

impl<M> IntoIterator for SearchResult<M> {
    type Item = MoveEstimate<M>;
    type IntoIter = std::vec::IntoIter<MoveEstimate<M>>;

    fn into_iter(self) -> Self::IntoIter {
        self.estimates.into_iter()
    }
}
