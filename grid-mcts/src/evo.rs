//! Evolutionary tree search over genome mutations.
//!
//! Instead of single-action edges, each node carries a whole fixed-length
//! plan (genome); children are single-gene mutations of their parent. The
//! state is never advanced while the tree grows — only leaf evaluation
//! rolls independent copies forward through a genome. Evaluated leaves feed
//! a turn-scoped scoreboard that records strict improvements only.

use std::time::Instant;

use rand::Rng;
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::config::EmctsConfig;
use crate::genome::Genome;
use crate::model::{ForwardModel, Heuristic};
use crate::policy::advance_joint;
use crate::util::noise;

/// Index into the genome-node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenomeNodeId(pub u32);

/// One position in the mutation tree.
#[derive(Debug, Clone)]
pub struct GenomeNode {
    pub parent: Option<GenomeNodeId>,
    pub depth: u32,
    pub genome: Genome,
    pub children: Vec<GenomeNodeId>,
}

/// Arena-allocated mutation tree for one turn.
#[derive(Debug)]
pub struct GenomeTree {
    nodes: Vec<GenomeNode>,
    root: GenomeNodeId,
}

impl GenomeTree {
    pub fn new(root_genome: Genome) -> Self {
        let root = GenomeNode {
            parent: None,
            depth: 0,
            genome: root_genome,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: GenomeNodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> GenomeNodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: GenomeNodeId) -> &GenomeNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_child(&mut self, parent: GenomeNodeId, genome: Genome) -> GenomeNodeId {
        let depth = self.get(parent).depth + 1;
        let id = GenomeNodeId(self.nodes.len() as u32);
        self.nodes.push(GenomeNode {
            parent: Some(parent),
            depth,
            genome,
            children: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }
}

/// A recorded improvement: the genome and the score it achieved.
#[derive(Debug, Clone)]
pub struct ScoreEntry {
    pub genome: Genome,
    pub score: f64,
}

/// Turn-scoped, append-only improvement trace shared by the whole tree.
///
/// Entries are recorded only on strict improvement, so successive scores
/// are strictly increasing. The cached best is the decision source of
/// truth; the entry list is an audit trail.
#[derive(Debug)]
pub struct Scoreboard {
    entries: Vec<ScoreEntry>,
    best_score: f64,
    best_genome: Option<Genome>,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            best_score: f64::NEG_INFINITY,
            best_genome: None,
        }
    }

    /// Record the genome if its score strictly beats the current best.
    /// Returns whether it was recorded.
    pub fn record_if_better(&mut self, genome: &Genome, score: f64) -> bool {
        if score > self.best_score {
            self.entries.push(ScoreEntry {
                genome: genome.clone(),
                score,
            });
            self.best_score = score;
            self.best_genome = Some(genome.clone());
            true
        } else {
            false
        }
    }

    pub fn best_genome(&self) -> Option<&Genome> {
        self.best_genome.as_ref()
    }

    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of an evolutionary search.
#[derive(Debug, Clone)]
pub struct EmctsResult {
    /// Best genome found, or `None` when no leaf was ever evaluated (e.g.
    /// a terminal root state). Callers fall back to the model's default
    /// action in that case.
    pub genome: Option<Genome>,

    /// Score of the best genome (`-inf` when `genome` is `None`).
    pub score: f64,

    /// Completed tree-growth iterations.
    pub iterations: u32,
}

impl EmctsResult {
    /// This turn's action: the best genome's first gene, or the fallback.
    pub fn action_or(&self, fallback: usize) -> usize {
        self.genome
            .as_ref()
            .and_then(Genome::first)
            .unwrap_or(fallback)
    }
}

/// Evolutionary search bound to one turn's state snapshot.
pub struct EmctsSearch<'a, M: ForwardModel, H: Heuristic<M>> {
    tree: GenomeTree,
    scoreboard: Scoreboard,
    root_state: &'a M,
    heuristic: &'a H,
    config: EmctsConfig,
    num_actions: usize,
}

impl<'a, M: ForwardModel, H: Heuristic<M>> EmctsSearch<'a, M, H> {
    /// Start from a uniformly random root genome.
    pub fn new(
        root_state: &'a M,
        heuristic: &'a H,
        config: EmctsConfig,
        rng: &mut ChaCha20Rng,
    ) -> Self {
        let genome = Genome::random(config.genome_length, root_state.num_actions(), rng);
        Self::with_root_genome(root_state, heuristic, config, genome)
    }

    /// Start from a carried-over genome (see [`Genome::shifted`]).
    pub fn with_root_genome(
        root_state: &'a M,
        heuristic: &'a H,
        config: EmctsConfig,
        genome: Genome,
    ) -> Self {
        let num_actions = root_state.num_actions();
        Self {
            tree: GenomeTree::new(genome),
            scoreboard: Scoreboard::new(),
            root_state,
            heuristic,
            config,
            num_actions,
        }
    }

    /// Run until the iteration budget (and optional wall-clock budget) is
    /// exhausted. The best genome is cached as leaves are evaluated, so the
    /// result is ready the moment the loop stops.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> EmctsResult {
        let started = Instant::now();
        let mut iterations = 0;

        for _ in 0..self.config.max_iterations {
            if let Some(budget) = self.config.time_budget {
                if started.elapsed() >= budget {
                    break;
                }
            }

            let state = self.root_state.clone();
            self.grow(&state, rng);
            iterations += 1;
        }

        EmctsResult {
            genome: self.scoreboard.best_genome().cloned(),
            score: self.scoreboard.best_score(),
            iterations,
        }
    }

    /// One growth pass: depth-first expansion via an explicit work-list.
    ///
    /// Interior nodes (depth < limit - 1) branch into mutated children;
    /// nodes one level above the limit create their leaf children and
    /// evaluate them. Leaves themselves are never pushed.
    fn grow(&mut self, state: &M, rng: &mut ChaCha20Rng) {
        let mut stack = vec![self.tree.root()];

        while let Some(node_id) = stack.pop() {
            let depth = self.tree.get(node_id).depth;

            if !state.is_terminal() && depth + 1 < self.config.max_rollout_depth {
                for _ in 0..self.config.branching_factor {
                    let child = self.expand(node_id, state, rng);
                    stack.push(child);
                }
            } else if depth + 1 == self.config.max_rollout_depth {
                for _ in 0..self.config.branching_factor {
                    self.expand(node_id, state, rng);
                }
                self.evaluate_leaves(node_id, state, rng);
            }
        }
    }

    /// Mutate one gene of the parent's genome into a new child.
    fn expand(&mut self, parent: GenomeNodeId, state: &M, rng: &mut ChaCha20Rng) -> GenomeNodeId {
        let parent_genome = self.tree.get(parent).genome.clone();
        let position = rng.gen_range(0..self.config.genome_length);
        let gene = if self.config.fpu {
            self.urgent_gene(&parent_genome, state, rng)
        } else {
            rng.gen_range(0..self.num_actions)
        };
        self.tree.add_child(parent, parent_genome.mutated(position, gene))
    }

    /// First-play-urgency gene selection.
    ///
    /// Actions already in the genome get the fixed default urgency; absent
    /// actions are ranked by a noised one-step lookahead (acting agent
    /// moves, everyone else stays). Highest urgency wins, first index on
    /// ties.
    fn urgent_gene(&self, genome: &Genome, state: &M, rng: &mut ChaCha20Rng) -> usize {
        let mut best = 0;
        let mut best_urgency = f64::NEG_INFINITY;

        for action in 0..self.num_actions {
            let urgency = if genome.contains(action) {
                self.config.fpu_urgency
            } else {
                let mut lookahead = state.clone();
                let acting = lookahead.acting_agent();
                let stay = lookahead.default_action();
                let joint: Vec<usize> = (0..lookahead.num_agents())
                    .map(|agent| if agent == acting { action } else { stay })
                    .collect();
                lookahead.advance(&joint);
                noise(
                    self.heuristic.evaluate(&lookahead),
                    self.config.epsilon,
                    rng.gen(),
                )
            };

            if urgency > best_urgency {
                best_urgency = urgency;
                best = action;
            }
        }

        best
    }

    /// Score every leaf child of `node_id` against an independent copy of
    /// the state, rolled forward gene by gene (random opponents), and feed
    /// strict improvements to the scoreboard.
    fn evaluate_leaves(&mut self, node_id: GenomeNodeId, state: &M, rng: &mut ChaCha20Rng) {
        let leaves = self.tree.get(node_id).children.clone();

        for leaf_id in leaves {
            let genome = self.tree.get(leaf_id).genome.clone();
            let mut rolled = state.clone();

            for &gene in genome.genes() {
                advance_joint(&mut rolled, gene, rng);
                if rolled.is_terminal() {
                    break;
                }
            }

            let score = noise(
                self.heuristic.evaluate(&rolled),
                self.config.epsilon,
                rng.gen(),
            );
            if self.scoreboard.record_if_better(&genome, score) {
                trace!(score, leaf = leaf_id.0, "new best genome");
            }
        }
    }

    /// The mutation tree (for inspection in tests).
    pub fn tree(&self) -> &GenomeTree {
        &self.tree
    }

    /// The improvement trace for this turn.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testmodel::LineWorld;
    use rand::SeedableRng;

    fn constant(_: &LineWorld) -> f64 {
        1.0
    }

    fn rightward(state: &LineWorld) -> f64 {
        state.x as f64
    }

    #[test]
    fn budgeted_search_returns_a_full_genome() {
        // branching 2, genome length 5, depth 4, 8 iterations.
        let state = LineWorld::fresh(50);
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let mut search = EmctsSearch::new(&state, &constant, EmctsConfig::for_testing(), &mut rng);
        let result = search.run(&mut rng);

        assert_eq!(result.iterations, 8);
        let genome = result.genome.expect("constant heuristic still records a best");
        assert_eq!(genome.len(), 5);
        assert!(genome.genes().iter().all(|&g| g < state.num_actions()));
    }

    #[test]
    fn scoreboard_is_a_strict_improvement_trace() {
        let state = LineWorld::fresh(50);
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let config = EmctsConfig::for_testing().with_iterations(20);
        let mut search = EmctsSearch::new(&state, &rightward, config, &mut rng);
        search.run(&mut rng);

        let entries = search.scoreboard().entries();
        assert!(!entries.is_empty());
        for pair in entries.windows(2) {
            assert!(pair[1].score > pair[0].score);
        }
        // Cached best matches the last recorded entry.
        let last = entries.last().unwrap();
        assert_eq!(search.scoreboard().best_genome(), Some(&last.genome));
        assert!((search.scoreboard().best_score() - last.score).abs() < 1e-12);
    }

    #[test]
    fn terminal_root_yields_no_genome_but_spends_the_budget() {
        let state = LineWorld::fresh(0);
        assert!(state.is_terminal());

        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let mut search = EmctsSearch::new(&state, &constant, EmctsConfig::for_testing(), &mut rng);
        let result = search.run(&mut rng);

        assert_eq!(result.iterations, 8);
        assert!(result.genome.is_none());
        assert_eq!(result.action_or(state.default_action()), LineWorld::STAY);
    }

    #[test]
    fn deterministic_under_fixed_seed() {
        let state = LineWorld::fresh(50);
        let config = EmctsConfig::for_testing().with_iterations(12);

        let mut rng_a = ChaCha20Rng::seed_from_u64(13);
        let mut search_a = EmctsSearch::new(&state, &rightward, config.clone(), &mut rng_a);
        let a = search_a.run(&mut rng_a);

        let mut rng_b = ChaCha20Rng::seed_from_u64(13);
        let mut search_b = EmctsSearch::new(&state, &rightward, config, &mut rng_b);
        let b = search_b.run(&mut rng_b);

        assert_eq!(a.genome, b.genome);
        assert!((a.score - b.score).abs() < 1e-12);
    }

    #[test]
    fn children_differ_from_parent_by_one_gene() {
        let state = LineWorld::fresh(50);
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let mut search = EmctsSearch::new(&state, &constant, EmctsConfig::for_testing(), &mut rng);
        search.run(&mut rng);

        let tree = search.tree();
        for id in (1..tree.len() as u32).map(GenomeNodeId) {
            let node = tree.get(id);
            let parent = tree.get(node.parent.unwrap());
            assert_eq!(node.depth, parent.depth + 1);
            let differing = parent
                .genome
                .genes()
                .iter()
                .zip(node.genome.genes())
                .filter(|(a, b)| a != b)
                .count();
            assert!(differing <= 1);
        }
    }

    #[test]
    fn fpu_lookahead_prefers_the_rewarding_gene() {
        let state = LineWorld::fresh(50);
        let heuristic = rightward;
        let config = EmctsConfig::for_testing().with_fpu(0.0);
        let search = EmctsSearch::with_root_genome(
            &state,
            &heuristic,
            config,
            Genome::from_genes(vec![LineWorld::STAY; 5]),
        );

        // Stay is in the genome (urgency 0.0); left scores x-1, right x+1.
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let genome = Genome::from_genes(vec![LineWorld::STAY; 5]);
        let gene = search.urgent_gene(&genome, &state, &mut rng);
        assert_eq!(gene, LineWorld::RIGHT);
    }

    #[test]
    fn fpu_search_runs_end_to_end() {
        let state = LineWorld::fresh(50);
        let mut rng = ChaCha20Rng::seed_from_u64(30);
        let config = EmctsConfig::for_testing().with_fpu(0.5);
        let mut search = EmctsSearch::new(&state, &rightward, config, &mut rng);
        let result = search.run(&mut rng);

        assert_eq!(result.iterations, 8);
        assert!(result.genome.is_some());
    }

    #[test]
    fn scoreboard_records_strict_improvements_only() {
        let mut scoreboard = Scoreboard::new();
        let a = Genome::from_genes(vec![0, 0, 0, 0, 0]);
        let b = Genome::from_genes(vec![1, 1, 1, 1, 1]);

        assert!(scoreboard.record_if_better(&a, 0.4));
        assert!(!scoreboard.record_if_better(&b, 0.4));
        assert!(!scoreboard.record_if_better(&b, 0.1));
        assert!(scoreboard.record_if_better(&b, 0.6));

        assert_eq!(scoreboard.len(), 2);
        assert_eq!(scoreboard.best_genome(), Some(&b));
    }
}
