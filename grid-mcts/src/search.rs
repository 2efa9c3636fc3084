//! Classical budgeted tree search.
//!
//! Each iteration clones the turn-root state, descends the tree (expanding
//! the first node with an empty child slot, otherwise following the
//! confidence-bound rule), rolls out to the depth limit under the
//! safe-random policy, and backpropagates the heuristic result.

use std::time::Instant;

use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::trace;

use crate::config::MctsConfig;
use crate::model::{ForwardModel, Heuristic};
use crate::node::NodeId;
use crate::policy::{advance_joint, safe_random_action};
use crate::tree::SearchTree;
use crate::util::{noise, normalize};

/// Errors raised by the classical search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Confidence-bound selection found no eligible child on a node that
    /// passed the fully-expanded check. This is an invariant breach, never
    /// recovered from: masking it would silently corrupt the statistics.
    #[error("no selectable child (bounds [{low}, {high}], {children} slots)")]
    NoSelectableChild {
        low: f64,
        high: f64,
        children: usize,
    },

    /// The root was never expanded (zero-iteration budget or a terminal
    /// root state), so there is no visited child to recommend.
    #[error("root has no visited children to recommend")]
    NoVisitedChildren,
}

/// Outcome of a budgeted search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Recommended action (robust-child rule).
    pub action: usize,

    /// Completed iterations; equals the root's visit count.
    pub iterations: u32,

    /// Mean backpropagated value at the root.
    pub value: f64,
}

/// Classical search bound to one turn's state snapshot.
pub struct MctsSearch<'a, M: ForwardModel, H: Heuristic<M>> {
    tree: SearchTree,
    root_state: &'a M,
    heuristic: &'a H,
    config: MctsConfig,
    num_actions: usize,
}

impl<'a, M: ForwardModel, H: Heuristic<M>> MctsSearch<'a, M, H> {
    pub fn new(root_state: &'a M, heuristic: &'a H, config: MctsConfig) -> Self {
        let num_actions = root_state.num_actions();
        Self {
            tree: SearchTree::new(num_actions),
            root_state,
            heuristic,
            config,
            num_actions,
        }
    }

    /// Run until the iteration budget (and optional wall-clock budget) is
    /// exhausted, then recommend an action. Iterations are atomic: the
    /// budget is only checked between them.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        let started = Instant::now();
        let mut iterations = 0;

        for _ in 0..self.config.max_iterations {
            if let Some(budget) = self.config.time_budget {
                if started.elapsed() >= budget {
                    break;
                }
            }

            let mut state = self.root_state.clone();
            let selected = self.select(&mut state, rng)?;
            let depth = self.tree.get(selected).depth;
            let result = self.rollout(&mut state, depth, rng);
            self.tree.backpropagate(selected, result);
            iterations += 1;

            trace!(
                selected = selected.0,
                depth,
                result,
                nodes = self.tree.len(),
                "simulation complete"
            );
        }

        let action = self
            .tree
            .best_action()
            .ok_or(SearchError::NoVisitedChildren)?;
        let root = self.tree.get(self.tree.root());

        Ok(SearchResult {
            action,
            iterations,
            value: root.mean_value(self.config.epsilon),
        })
    }

    /// Descend from the root, advancing `state` along the chosen actions.
    /// Returns either a freshly expanded node or the node at the depth /
    /// terminal ceiling.
    fn select(&mut self, state: &mut M, rng: &mut ChaCha20Rng) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();

        while !state.is_terminal() && self.tree.get(current).depth < self.config.max_rollout_depth
        {
            if !self.tree.get(current).is_fully_expanded() {
                return Ok(self.expand(current, state, rng));
            }

            let (child, action) = self.select_confident_child(current, rng)?;
            advance_joint(state, action, rng);
            current = child;
        }

        Ok(current)
    }

    /// Expand one empty child slot, chosen uniformly at random, advancing
    /// the shared state copy by that action.
    fn expand(&mut self, parent: NodeId, state: &mut M, rng: &mut ChaCha20Rng) -> NodeId {
        let unexpanded = self.tree.get(parent).unexpanded_actions();
        let action = unexpanded[rng.gen_range(0..unexpanded.len())];
        advance_joint(state, action, rng);
        self.tree.add_child(parent, action)
    }

    /// Confidence-bound rule: normalized mean blended with the RAVE
    /// estimate, plus an exploration term, perturbed by tie-break noise.
    fn select_confident_child(
        &self,
        parent_id: NodeId,
        rng: &mut ChaCha20Rng,
    ) -> Result<(NodeId, usize), SearchError> {
        let parent = self.tree.get(parent_id);
        let epsilon = self.config.epsilon;
        let r = self.config.rave_constant;

        let mut best: Option<(NodeId, usize)> = None;
        let mut best_score = f64::NEG_INFINITY;

        for (action, slot) in parent.children.iter().enumerate() {
            let Some(child_id) = *slot else { continue };
            let child = self.tree.get(child_id);
            let visits = child.visit_count as f64;

            let mean = normalize(
                child.mean_value(epsilon),
                parent.bounds[0],
                parent.bounds[1],
            );
            let beta = (r / (r + 3.0 * visits)).sqrt();
            let blended = (1.0 - beta) * mean + beta * self.tree.rave_value(action);
            let explore = self.config.exploration
                * (((parent.visit_count as f64 + 1.0).ln()) / (visits + epsilon)).sqrt();

            let score = noise(blended + explore, epsilon, rng.gen());
            if score > best_score {
                best_score = score;
                best = Some((child_id, action));
            }
        }

        best.ok_or(SearchError::NoSelectableChild {
            low: parent.bounds[0],
            high: parent.bounds[1],
            children: parent.children.len(),
        })
    }

    /// Safe-random rollout from `depth` to the depth/terminal limit, scored
    /// by the heuristic.
    fn rollout(&self, state: &mut M, depth: u32, rng: &mut ChaCha20Rng) -> f64 {
        let mut depth = depth;
        while depth <= self.config.max_rollout_depth && !state.is_terminal() {
            let action = safe_random_action(state, rng);
            advance_joint(state, action, rng);
            depth += 1;
        }
        self.heuristic.evaluate(state)
    }

    /// The search tree (for inspection in tests).
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }
}

/// Convenience wrapper: build a search for one turn and run it.
pub fn run_search<M: ForwardModel, H: Heuristic<M>>(
    root_state: &M,
    heuristic: &H,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    MctsSearch::new(root_state, heuristic, config).run(rng)
}
