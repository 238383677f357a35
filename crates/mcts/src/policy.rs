//! Choice policies for the three decision points of a search iteration.
//!
//! Each phase that has to pick one candidate out of many delegates to a
//! policy:
//! - selection: which child to descend into while walking to a leaf
//! - expansion: which freshly created child to simulate from
//! - simulation: which move to play at each step of a rollout
//!
//! [`UniformRandom`] implements all three and is what [`crate::Engine::new`]
//! uses. A smarter selection rule (UCB1, UCT) slots in by implementing
//! [`SelectionPolicy`]; the tree and the search loop stay unchanged.

use crate::node::NodeId;
use crate::tree::Tree;
use mcts_core::{Game, MctsError, Phase, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Search tree specialised to the types of a game.
pub type GameTree<G> = Tree<<G as Game>::Move, <G as Game>::Board, <G as Game>::Player>;

/// Picks the child to descend into during selection.
pub trait SelectionPolicy<G: Game> {
    /// Choose one of the children of `parent`.
    ///
    /// `parent` is never a leaf when called by the engine.
    ///
    /// # Errors
    /// Returns `MctsError::EmptyChoiceSet` if `parent` has no children.
    fn choose_child<R: Rng + ?Sized>(
        &self,
        tree: &GameTree<G>,
        parent: NodeId,
        rng: &mut R,
    ) -> Result<NodeId>;
}

/// Picks which of the children created by an expansion to simulate from.
pub trait ExpansionPolicy<G: Game> {
    /// Choose one of `created`, the nodes the expansion just added.
    ///
    /// # Errors
    /// Returns `MctsError::EmptyChoiceSet` if `created` is empty.
    fn choose_expanded<R: Rng + ?Sized>(
        &self,
        tree: &GameTree<G>,
        created: &[NodeId],
        rng: &mut R,
    ) -> Result<NodeId>;
}

/// Picks the next move of a rollout.
pub trait SimulationPolicy<G: Game> {
    /// Choose one of `moves`, the legal moves from `board`.
    ///
    /// # Errors
    /// Returns `MctsError::EmptyChoiceSet` if `moves` is empty.
    fn choose_move<R: Rng + ?Sized>(
        &self,
        game: &G,
        board: &G::Board,
        moves: &[G::Move],
        rng: &mut R,
    ) -> Result<G::Move>;
}

/// Uniformly random choice at every decision point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UniformRandom;

/// Pick one element of `candidates` uniformly at random.
fn choose_uniform<'a, T, R: Rng + ?Sized>(
    candidates: &'a [T],
    phase: Phase,
    rng: &mut R,
) -> Result<&'a T> {
    candidates
        .choose(rng)
        .ok_or(MctsError::EmptyChoiceSet(phase))
}

impl<G: Game> SelectionPolicy<G> for UniformRandom {
    fn choose_child<R: Rng + ?Sized>(
        &self,
        tree: &GameTree<G>,
        parent: NodeId,
        rng: &mut R,
    ) -> Result<NodeId> {
        choose_uniform(tree.children(parent), Phase::Selection, rng).map(|(_, id)| *id)
    }
}

impl<G: Game> ExpansionPolicy<G> for UniformRandom {
    fn choose_expanded<R: Rng + ?Sized>(
        &self,
        _tree: &GameTree<G>,
        created: &[NodeId],
        rng: &mut R,
    ) -> Result<NodeId> {
        choose_uniform(created, Phase::Expansion, rng).copied()
    }
}

impl<G: Game> SimulationPolicy<G> for UniformRandom {
    fn choose_move<R: Rng + ?Sized>(
        &self,
        _game: &G,
        _board: &G::Board,
        moves: &[G::Move],
        rng: &mut R,
    ) -> Result<G::Move> {
        choose_uniform(moves, Phase::Simulation, rng).cloned()
    }
}
