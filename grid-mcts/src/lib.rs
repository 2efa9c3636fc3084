//! Budgeted decision search for turn-synchronous multi-agent grid games.
//!
//! One search runs per decision turn: it clones the authoritative game
//! state, explores hypothetical futures through repeated forward
//! simulation, and recommends a single action once its iteration (or
//! wall-clock) budget is spent. Two strategies share the same forward-model
//! contract:
//!
//! - [`MctsSearch`] — classical tree search with confidence-bound selection
//!   blended with rapid-action-value estimation (RAVE), safe-random
//!   rollouts, and backpropagation with running value bounds.
//! - [`EmctsSearch`] — an evolutionary variant that searches over
//!   fixed-length action sequences ([`Genome`]s) mutated one gene at a time
//!   across tree levels, with an optional first-play-urgency selection rule
//!   and a monotonic improvement [`Scoreboard`].
//!
//! The game's rules and the scoring function stay outside the crate: both
//! searches drive a [`ForwardModel`] and score states with a [`Heuristic`],
//! injected by the enclosing player.
//!
//! # Usage
//!
//! ```rust,ignore
//! use grid_mcts::{EmctsConfig, EmctsSearch, MctsConfig, MctsSearch};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! // Classical: one action per turn.
//! let mut search = MctsSearch::new(&state, &heuristic, MctsConfig::default());
//! let decision = search.run(&mut rng)?;
//! play(decision.action);
//!
//! // Evolutionary: a plan per turn, carried over between turns.
//! let mut search = EmctsSearch::new(&state, &heuristic, EmctsConfig::default(), &mut rng);
//! let result = search.run(&mut rng);
//! play(result.action_or(state.default_action()));
//! let carried = result.genome.map(|g| g.shifted(state.num_actions(), &mut rng));
//! ```
//!
//! Both drivers take an explicit [`rand_chacha::ChaCha20Rng`]; a fixed
//! seed, configuration, and state reproduce the exact same decision.

pub mod config;
pub mod evo;
pub mod genome;
pub mod model;
pub mod node;
pub mod policy;
pub mod search;
pub mod tree;
pub mod util;

#[cfg(test)]
mod testmodel;

pub use config::{EmctsConfig, MctsConfig};
pub use evo::{EmctsResult, EmctsSearch, GenomeNode, GenomeNodeId, GenomeTree, ScoreEntry, Scoreboard};
pub use genome::Genome;
pub use model::{ForwardModel, Heuristic};
pub use node::{NodeId, SearchNode};
pub use policy::{advance_joint, safe_random_action};
pub use search::{run_search, MctsSearch, SearchError, SearchResult};
pub use tree::SearchTree;
