//! Search configuration parameters.

use std::time::Duration;

/// Configuration for the classical confidence-bound search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of simulate-backpropagate iterations per search.
    pub max_iterations: u32,

    /// Maximum tree/rollout depth in plies from the turn root.
    pub max_rollout_depth: u32,

    /// Exploration constant K in the confidence-bound term.
    /// Typical range 0.5 - 2.0; sqrt(2) is the UCB1 default.
    pub exploration: f64,

    /// Tie-break epsilon: guards divisions by zero visit counts and scales
    /// the multiplicative selection noise.
    pub epsilon: f64,

    /// RAVE blending constant R. The blend weight for a child with v visits
    /// is sqrt(R / (R + 3v)), so larger R trusts the rapid estimate longer.
    pub rave_constant: f64,

    /// Optional wall-clock budget, checked between iterations. Whichever of
    /// the iteration and time budgets is hit first stops the search;
    /// in-flight iterations are never aborted.
    pub time_budget: Option<Duration>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_rollout_depth: 10,
            exploration: std::f64::consts::SQRT_2,
            epsilon: 1e-6,
            rave_constant: 2.0,
            time_budget: None,
        }
    }
}

impl MctsConfig {
    /// Fast config for tests.
    pub fn for_testing() -> Self {
        Self {
            max_iterations: 50,
            max_rollout_depth: 6,
            ..Self::default()
        }
    }

    pub fn with_iterations(mut self, n: u32) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    pub fn with_exploration(mut self, k: f64) -> Self {
        self.exploration = k;
        self
    }

    pub fn with_rave_constant(mut self, r: f64) -> Self {
        self.rave_constant = r;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

/// Configuration for the evolutionary (genome-mutation) search.
#[derive(Debug, Clone)]
pub struct EmctsConfig {
    /// Number of tree-growth iterations per search.
    pub max_iterations: u32,

    /// Depth of the mutation tree; leaves sit at this depth.
    pub max_rollout_depth: u32,

    /// Tie-break epsilon for selection and leaf-score noise.
    pub epsilon: f64,

    /// Mutated children created per node per iteration.
    pub branching_factor: usize,

    /// Number of genes (actions) in every genome.
    pub genome_length: usize,

    /// Enable the first-play-urgency gene-selection rule. When disabled,
    /// replacement genes are drawn uniformly at random.
    pub fpu: bool,

    /// Urgency assigned to actions already present in the genome when FPU
    /// is enabled. Actions absent from the genome are ranked by one-step
    /// lookahead instead, so this value is on the heuristic's scale.
    pub fpu_urgency: f64,

    /// Optional wall-clock budget, same contract as [`MctsConfig`].
    pub time_budget: Option<Duration>,
}

impl Default for EmctsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            max_rollout_depth: 20,
            epsilon: 1e-6,
            branching_factor: 2,
            genome_length: 5,
            fpu: false,
            fpu_urgency: 0.5,
            time_budget: None,
        }
    }
}

impl EmctsConfig {
    /// Fast config for tests: a shallow tree built in a handful of
    /// iterations.
    pub fn for_testing() -> Self {
        Self {
            max_iterations: 8,
            max_rollout_depth: 4,
            ..Self::default()
        }
    }

    pub fn with_iterations(mut self, n: u32) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    pub fn with_branching_factor(mut self, branching: usize) -> Self {
        self.branching_factor = branching;
        self
    }

    pub fn with_genome_length(mut self, length: usize) -> Self {
        self.genome_length = length;
        self
    }

    pub fn with_fpu(mut self, default_urgency: f64) -> Self {
        self.fpu = true;
        self.fpu_urgency = default_urgency;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}
