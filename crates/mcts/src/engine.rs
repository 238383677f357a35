//! Monte Carlo Tree Search engine.
//!
//! Every iteration runs the four classic phases against the tree rooted at
//! the current position:
//!
//! 1. **Select**: walk down from the root to a leaf.
//! 2. **Expand**: add a child for every legal move of that leaf, pick one.
//! 3. **Simulate**: play random moves from it until the game is over.
//! 4. **Backpropagate**: record the winners on every node back to the root.

use crate::{
    config::EngineConfig,
    node::{Node, NodeId},
    policy::{ExpansionPolicy, GameTree, SelectionPolicy, SimulationPolicy, UniformRandom},
    result::SearchResult,
    tree::Tree,
};
use log::{debug, trace};
use mcts_core::{Game, MctsError, Result};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Monte Carlo Tree Search over a [`Game`].
///
/// Generic over:
/// - `G`: The game being played
/// - `R`: The random number generator handed to the policies
/// - `S`, `E`, `X`: The selection, expansion and simulation policies
pub struct Engine<G, R, S = UniformRandom, E = UniformRandom, X = UniformRandom>
where
    G: Game,
{
    game: G,
    rng: R,
    selection: S,
    expansion: E,
    simulation: X,
    tree: GameTree<G>,
}

impl<G, R> Engine<G, R>
where
    G: Game,
    R: Rng,
{
    /// Create an engine at the game's starting position, choosing uniformly
    /// at random in every phase.
    pub fn new(game: G, rng: R) -> Self {
        Self::with_policies(game, rng, UniformRandom, UniformRandom, UniformRandom)
    }
}

impl<G, R, S, E, X> Engine<G, R, S, E, X>
where
    G: Game,
    R: Rng,
    S: SelectionPolicy<G>,
    E: ExpansionPolicy<G>,
    X: SimulationPolicy<G>,
{
    /// Create an engine at the game's starting position with custom policies.
    pub fn with_policies(game: G, rng: R, selection: S, expansion: E, simulation: X) -> Self {
        let tree = Tree::new(game.initial_board(), game.first_player());
        Self {
            game,
            rng,
            selection,
            expansion,
            simulation,
            tree,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Board at the current position.
    pub fn board(&self) -> &G::Board {
        self.current_node().board()
    }

    /// Root of the current search tree.
    pub fn current_node(&self) -> &Node<G::Move, G::Board, G::Player> {
        self.tree.root()
    }

    /// The current search tree.
    pub fn tree(&self) -> &GameTree<G> {
        &self.tree
    }

    /// Apply a move decided outside the search (a human, another engine).
    ///
    /// The move does not have to be one the search looked at. The tree and
    /// all its statistics are discarded; the engine restarts from a fresh
    /// root holding the resulting position.
    pub fn apply(&mut self, mv: &G::Move) {
        let root = self.tree.root();
        let next_board = self.game.apply(root.board(), mv);
        let next_player = self.game.next_player(root.player());

        debug!(
            "applied {:?}, discarding search tree of {} nodes",
            mv,
            self.tree.len()
        );
        self.tree = Tree::new(next_board, next_player);
    }

    /// Run the search for `iterations` iterations.
    pub fn run(&mut self, iterations: usize) -> Result<SearchResult<G::Move>> {
        let mut remaining = iterations;
        self.run_while(|| {
            if remaining == 0 {
                false
            } else {
                remaining -= 1;
                true
            }
        })
    }

    /// Run the search for `iterations` iterations and return the best move.
    ///
    /// See [`SearchResult::best`] for how ties are broken.
    pub fn run_best(&mut self, iterations: usize) -> Result<Option<G::Move>> {
        Ok(self.run(iterations)?.best())
    }

    /// Run the search while `keep_going` returns true, then return the best
    /// move.
    pub fn run_best_while<F>(&mut self, keep_going: F) -> Result<Option<G::Move>>
    where
        F: FnMut() -> bool,
    {
        Ok(self.run_while(keep_going)?.best())
    }

    /// Run the search within the budget of `config`.
    pub fn search(&mut self, config: &EngineConfig) -> Result<SearchResult<G::Move>> {
        self.run_while(config.budget())
    }

    /// Run the search within the budget of `config` and return the best move.
    pub fn search_best(&mut self, config: &EngineConfig) -> Result<Option<G::Move>> {
        self.run_best_while(config.budget())
    }

    /// Run the search while `keep_going` returns true.
    ///
    /// The predicate is checked before every iteration, never during one.
    /// Statistics accumulate across calls until the next [`Engine::apply`].
    ///
    /// # Errors
    /// Stops at the first broken `Game` contract; the failing iteration is
    /// not recorded.
    pub fn run_while<F>(&mut self, mut keep_going: F) -> Result<SearchResult<G::Move>>
    where
        F: FnMut() -> bool,
    {
        let mut iterations = 0usize;
        while keep_going() {
            self.iterate()?;
            iterations += 1;
        }

        debug!(
            "search finished: {} iterations, {} root visits, {} nodes",
            iterations,
            self.tree.root().visit_count(),
            self.tree.len()
        );

        Ok(self.result())
    }

    /// Estimates for the moves available at the current position.
    pub fn result(&self) -> SearchResult<G::Move> {
        SearchResult::from_tree(&self.tree, NodeId::ROOT)
    }

    /// Run a single iteration: select -> expand -> simulate -> backpropagate.
    fn iterate(&mut self) -> Result<()> {
        let leaf = self.select(NodeId::ROOT)?;
        let leaf = self.expand(leaf)?;
        let winners = self.simulate(leaf)?;

        trace!(
            "rollout from depth {} won by {:?}",
            self.tree.depth(leaf),
            winners
        );

        self.backpropagate(leaf, &winners);
        Ok(())
    }

    /// Descend from `from` to a leaf using the selection policy.
    ///
    /// Returns `from` itself if it is a leaf.
    pub fn select(&mut self, from: NodeId) -> Result<NodeId> {
        let mut current = from;
        while !self.tree.is_leaf(current) {
            current = self
                .selection
                .choose_child(&self.tree, current, &mut self.rng)?;
        }
        Ok(current)
    }

    /// Expand `leaf` by one full layer and pick the child to simulate from.
    ///
    /// A child is created for every legal move even though only one is
    /// simulated, so an expanded node always has its complete child set.
    /// A finished position has no moves and `leaf` itself is returned.
    ///
    /// # Errors
    /// Returns `MctsError::DuplicateMoveKey` if the game lists a move twice,
    /// before any child is added.
    pub fn expand(&mut self, leaf: NodeId) -> Result<NodeId> {
        let node = self.tree.get(leaf);
        let moves = self.game.possible_moves(node.board());
        if moves.is_empty() {
            return Ok(leaf);
        }

        let mut seen = HashSet::with_capacity(moves.len());
        if let Some(duplicate) = moves.iter().find(|mv| !seen.insert(*mv)) {
            return Err(MctsError::DuplicateMoveKey(format!("{:?}", duplicate)));
        }

        let next_player = self.game.next_player(node.player());
        let boards: Vec<G::Board> = moves
            .iter()
            .map(|mv| self.game.apply(node.board(), mv))
            .collect();

        let mut created = Vec::with_capacity(moves.len());
        for (mv, board) in moves.into_iter().zip(boards) {
            created.push(self.tree.add_child(leaf, mv, board, next_player.clone())?);
        }

        self.expansion
            .choose_expanded(&self.tree, &created, &mut self.rng)
    }

    /// Play the game out from `leaf` and return the winners.
    ///
    /// The tree is not modified. Several winners mean a draw between them;
    /// the set is never empty.
    ///
    /// # Errors
    /// Returns `MctsError::EmptyScoreSet` if the game reports no scores for
    /// the finished board.
    pub fn simulate(&mut self, leaf: NodeId) -> Result<HashSet<G::Player>> {
        let mut board = self.tree.get(leaf).board().clone();

        while !self.game.is_over(&board) {
            let moves = self.game.possible_moves(&board);
            let mv = self
                .simulation
                .choose_move(&self.game, &board, &moves, &mut self.rng)?;
            board = self.game.apply(&board, &mv);
        }

        winners(self.game.scores(&board))
    }

    /// Record a simulation on every node from `leaf` up to the root.
    pub fn backpropagate(&mut self, leaf: NodeId, winners: &HashSet<G::Player>) {
        let path: Vec<NodeId> = self.tree.ancestors(leaf).collect();
        for node_id in path {
            self.tree.record_visit(node_id, winners);
        }
    }
}

/// Players sharing the highest score.
fn winners<P: Eq + Hash>(scores: HashMap<P, i64>) -> Result<HashSet<P>> {
    let best = scores
        .values()
        .copied()
        .max()
        .ok_or(MctsError::EmptyScoreSet)?;

    Ok(scores
        .into_iter()
        .filter(|(_, score)| *score == best)
        .map(|(player, _)| player)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::Letters;
    use mcts_core::Phase;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn letters_engine(rounds: usize) -> Engine<Letters, ChaCha8Rng> {
        Engine::new(Letters::new(rounds), ChaCha8Rng::seed_from_u64(42))
    }

    fn set(players: &[u8]) -> HashSet<u8> {
        players.iter().copied().collect()
    }

    // A game that breaks its contract in a configurable way.
    #[derive(Clone)]
    struct BrokenGame {
        duplicate_moves: bool,
        empty_scores: bool,
        over_with_moves: bool,
    }

    impl BrokenGame {
        fn honest() -> Self {
            Self {
                duplicate_moves: false,
                empty_scores: false,
                over_with_moves: false,
            }
        }
    }

    impl Game for BrokenGame {
        type Move = u8;
        type Board = u8;
        type Player = u8;

        fn initial_board(&self) -> u8 {
            0
        }

        fn first_player(&self) -> u8 {
            0
        }

        fn apply(&self, board: &u8, _mv: &u8) -> u8 {
            board + 1
        }

        fn next_player(&self, current: &u8) -> u8 {
            1 - current
        }

        fn is_over(&self, board: &u8) -> bool {
            *board >= 2 && !self.over_with_moves
        }

        fn possible_moves(&self, board: &u8) -> Vec<u8> {
            if self.duplicate_moves {
                vec![1, 2, 1]
            } else if *board >= 2 {
                Vec::new()
            } else {
                vec![1, 2]
            }
        }

        fn scores(&self, board: &u8) -> HashMap<u8, i64> {
            if self.empty_scores || *board < 2 {
                HashMap::new()
            } else {
                [(0, 1), (1, 0)].into_iter().collect()
            }
        }
    }

    #[test]
    fn test_winners_single() {
        let scores: HashMap<u8, i64> = [(0, 3), (1, 1)].into_iter().collect();
        assert_eq!(winners(scores).unwrap(), set(&[0]));
    }

    #[test]
    fn test_winners_tie() {
        let scores: HashMap<u8, i64> = [(0, 2), (1, 2), (2, -1)].into_iter().collect();
        assert_eq!(winners(scores).unwrap(), set(&[0, 1]));
    }

    #[test]
    fn test_winners_empty() {
        let scores: HashMap<u8, i64> = HashMap::new();
        assert_eq!(winners(scores), Err(MctsError::EmptyScoreSet));
    }

    #[test]
    fn test_new_engine_starts_at_initial_board() {
        let engine = letters_engine(2);
        assert_eq!(engine.board(), "");
        assert_eq!(*engine.current_node().player(), 0);
        assert_eq!(engine.current_node().parent(), None);
    }

    #[test]
    fn test_apply_updates_board() {
        let game = Letters::new(10);
        let board = game.initial_board();

        for mv in game.possible_moves(&board) {
            let mut engine = letters_engine(10);
            engine.apply(&mv);
            assert_eq!(*engine.board(), game.apply(&board, &mv));
            assert_eq!(*engine.current_node().player(), 1);
        }
    }

    #[test]
    fn test_apply_discards_statistics() {
        let mut engine = letters_engine(4);
        engine.run(20).unwrap();
        assert!(engine.tree().len() > 1);

        engine.apply(&"a".to_string());
        let root = engine.current_node();
        assert!(root.is_leaf());
        assert_eq!(root.visit_count(), 0);
        assert_eq!(root.win_count(), 0);
        assert_eq!(root.parent(), None);
        assert_eq!(engine.tree().len(), 1);
    }

    #[test]
    fn test_backpropagate_root_first_player() {
        let mut engine = letters_engine(10);

        engine.backpropagate(NodeId::ROOT, &set(&[0]));
        assert_eq!(engine.current_node().visit_count(), 1);
        assert_eq!(engine.current_node().win_count(), 1);
    }

    #[test]
    fn test_backpropagate_root_second_player() {
        let mut engine = letters_engine(10);

        engine.backpropagate(NodeId::ROOT, &set(&[1]));
        assert_eq!(engine.current_node().visit_count(), 1);
        assert_eq!(engine.current_node().win_count(), 1);
    }

    #[test]
    fn test_backpropagate_child_first_player() {
        let mut engine = letters_engine(10);
        let child = engine
            .tree
            .add_child(NodeId::ROOT, "move".to_string(), "child".to_string(), 1)
            .unwrap();

        engine.backpropagate(child, &set(&[0]));
        assert_eq!(engine.tree.get(child).visit_count(), 1);
        assert_eq!(engine.tree.get(child).win_count(), 1);
        assert_eq!(engine.current_node().visit_count(), 1);
    }

    #[test]
    fn test_backpropagate_child_second_player() {
        let mut engine = letters_engine(10);
        let child = engine
            .tree
            .add_child(NodeId::ROOT, "move".to_string(), "child".to_string(), 1)
            .unwrap();

        engine.backpropagate(child, &set(&[1]));
        assert_eq!(engine.tree.get(child).visit_count(), 1);
        assert_eq!(engine.tree.get(child).win_count(), 0);
        // The root is credited regardless
        assert_eq!(engine.current_node().win_count(), 1);
    }

    #[test]
    fn test_backpropagate_skips_siblings() {
        let mut engine = letters_engine(10);
        let a = engine
            .tree
            .add_child(NodeId::ROOT, "a".to_string(), "a".to_string(), 1)
            .unwrap();
        let b = engine
            .tree
            .add_child(NodeId::ROOT, "b".to_string(), "b".to_string(), 1)
            .unwrap();

        engine.backpropagate(a, &set(&[0]));
        assert_eq!(engine.tree.get(a).visit_count(), 1);
        assert_eq!(engine.tree.get(b).visit_count(), 0);
    }

    #[test]
    fn test_expand_one_full_layer() {
        let mut engine = letters_engine(10);

        let child = engine.expand(NodeId::ROOT).unwrap();
        let node = engine.tree.get(child);
        assert_eq!(node.parent(), Some(NodeId::ROOT));
        assert!(engine
            .tree
            .children(NodeId::ROOT)
            .iter()
            .any(|(_, id)| *id == child));
        assert_eq!(engine.tree.children(NodeId::ROOT).len(), 2);
        assert_eq!(*node.player(), engine.game.next_player(&0));
    }

    #[test]
    fn test_expand_children_hold_applied_boards() {
        let mut engine = letters_engine(10);
        engine.expand(NodeId::ROOT).unwrap();

        for (mv, id) in engine.tree.children(NodeId::ROOT) {
            assert_eq!(engine.tree.get(*id).board(), mv);
        }
    }

    #[test]
    fn test_expand_terminal_returns_leaf() {
        let mut engine = letters_engine(0);

        let expanded = engine.expand(NodeId::ROOT).unwrap();
        assert_eq!(expanded, NodeId::ROOT);
        assert!(engine.current_node().is_leaf());
    }

    #[test]
    fn test_expand_duplicate_move_adds_nothing() {
        let game = BrokenGame {
            duplicate_moves: true,
            ..BrokenGame::honest()
        };
        let mut engine = Engine::new(game, ChaCha8Rng::seed_from_u64(1));

        let err = engine.expand(NodeId::ROOT).unwrap_err();
        assert_eq!(err, MctsError::DuplicateMoveKey("1".to_string()));
        assert_eq!(engine.tree().len(), 1);
    }

    #[test]
    fn test_select_returns_root_if_leaf() {
        let mut engine = letters_engine(10);
        assert_eq!(engine.select(NodeId::ROOT).unwrap(), NodeId::ROOT);
    }

    #[test]
    fn test_select_returns_only_child() {
        let mut engine = letters_engine(10);
        let child = engine
            .tree
            .add_child(NodeId::ROOT, "move".to_string(), "child".to_string(), 1)
            .unwrap();

        assert_eq!(engine.select(NodeId::ROOT).unwrap(), child);
    }

    #[test]
    fn test_select_returns_a_leaf_among_several() {
        let mut engine = letters_engine(10);
        let a = engine
            .tree
            .add_child(NodeId::ROOT, "a".to_string(), "a".to_string(), 1)
            .unwrap();
        engine
            .tree
            .add_child(NodeId::ROOT, "b".to_string(), "b".to_string(), 1)
            .unwrap();
        let aa = engine
            .tree
            .add_child(a, "a".to_string(), "aa".to_string(), 0)
            .unwrap();

        for _ in 0..20 {
            let selected = engine.select(NodeId::ROOT).unwrap();
            assert!(engine.tree.is_leaf(selected));
            assert_ne!(selected, a);
            assert_ne!(selected, NodeId::ROOT);
            if engine.tree.depth(selected) == 2 {
                assert_eq!(selected, aa);
            }
        }
    }

    #[test]
    fn test_simulate_letters_winner() {
        // Board "aa" with 2 rounds is over: player 0 has 2, player 1 has 0
        let mut engine = letters_engine(2);
        let aa = engine
            .tree
            .add_child(NodeId::ROOT, "x".to_string(), "aa".to_string(), 0)
            .unwrap();

        assert_eq!(engine.simulate(aa).unwrap(), set(&[0]));
    }

    #[test]
    fn test_simulate_draw_returns_both() {
        let mut engine = letters_engine(2);
        let ab = engine
            .tree
            .add_child(NodeId::ROOT, "x".to_string(), "ab".to_string(), 0)
            .unwrap();

        assert_eq!(engine.simulate(ab).unwrap(), set(&[0, 1]));
    }

    #[test]
    fn test_simulate_does_not_touch_tree() {
        let mut engine = letters_engine(6);

        let winners = engine.simulate(NodeId::ROOT).unwrap();
        assert!(!winners.is_empty());
        assert_eq!(engine.tree().len(), 1);
        assert_eq!(engine.current_node().visit_count(), 0);
    }

    #[test]
    fn test_simulate_empty_scores_fails() {
        let game = BrokenGame {
            empty_scores: true,
            ..BrokenGame::honest()
        };
        let mut engine = Engine::new(game, ChaCha8Rng::seed_from_u64(1));

        assert_eq!(engine.simulate(NodeId::ROOT), Err(MctsError::EmptyScoreSet));
    }

    #[test]
    fn test_simulate_without_moves_fails() {
        // Board 2 claims not to be over but has no moves
        let game = BrokenGame {
            over_with_moves: true,
            ..BrokenGame::honest()
        };
        let mut engine = Engine::new(game, ChaCha8Rng::seed_from_u64(1));

        assert_eq!(
            engine.simulate(NodeId::ROOT),
            Err(MctsError::EmptyChoiceSet(Phase::Simulation))
        );
    }

    #[test]
    fn test_run_error_records_nothing() {
        let game = BrokenGame {
            empty_scores: true,
            ..BrokenGame::honest()
        };
        let mut engine = Engine::new(game, ChaCha8Rng::seed_from_u64(1));

        assert_eq!(engine.run(5).unwrap_err(), MctsError::EmptyScoreSet);
        assert_eq!(engine.current_node().visit_count(), 0);
    }

    #[test]
    fn test_run_counts_iterations() {
        let mut engine = letters_engine(6);

        let result = engine.run(50).unwrap();
        assert_eq!(engine.current_node().visit_count(), 50);
        assert_eq!(result.total_visits(), 50);
    }

    #[test]
    fn test_run_zero_iterations() {
        let mut engine = letters_engine(6);

        let result = engine.run(0).unwrap();
        assert!(result.is_empty());
        assert_eq!(engine.run_best(0).unwrap(), None);
    }

    #[test]
    fn test_run_accumulates_across_calls() {
        let mut engine = letters_engine(6);

        engine.run(10).unwrap();
        engine.run(15).unwrap();
        assert_eq!(engine.current_node().visit_count(), 25);
    }

    #[test]
    fn test_run_on_finished_game() {
        let mut engine = letters_engine(1);
        engine.apply(&"b".to_string());

        let result = engine.run(10).unwrap();
        assert!(result.is_empty());
        assert_eq!(engine.current_node().visit_count(), 10);
        assert_eq!(engine.current_node().win_count(), 10);
        assert_eq!(engine.run_best(5).unwrap(), None);
    }

    #[test]
    fn test_run_while_checks_predicate_per_iteration() {
        let mut engine = letters_engine(6);
        let mut calls = 0;

        engine
            .run_while(|| {
                calls += 1;
                calls <= 7
            })
            .unwrap();

        assert_eq!(calls, 8);
        assert_eq!(engine.current_node().visit_count(), 7);
    }

    #[test]
    fn test_run_best_returns_root_child() {
        let mut engine = letters_engine(4);

        let best = engine.run_best(30).unwrap().unwrap();
        assert!(engine.current_node().child(&best).is_some());
    }

    #[test]
    fn test_letters_prefers_own_letter() {
        // Player 0 scores "a": with enough rollouts "a" must look better
        let mut engine = letters_engine(3);

        let result = engine.run(2000).unwrap();
        let a = result.win_rate(&"a".to_string()).unwrap();
        let b = result.win_rate(&"b".to_string()).unwrap();
        assert!(a > b, "a={} b={}", a, b);
        assert_eq!(engine.run_best(0).unwrap(), Some("a".to_string()));
    }

    #[test]
    fn test_search_uses_config_budget() {
        let mut engine = letters_engine(6);

        engine.search(&EngineConfig::with_iterations(12)).unwrap();
        assert_eq!(engine.current_node().visit_count(), 12);

        let best = engine
            .search_best(&EngineConfig::with_iterations(12))
            .unwrap();
        assert!(best.is_some());
        assert_eq!(engine.current_node().visit_count(), 24);
    }

    #[test]
    fn test_deterministic_with_seed() {
        let run_search = |seed: u64| {
            let mut engine = Engine::new(Letters::new(5), ChaCha8Rng::seed_from_u64(seed));
            engine.run(200).unwrap()
        };

        assert_eq!(run_search(12345), run_search(12345));
    }
}
