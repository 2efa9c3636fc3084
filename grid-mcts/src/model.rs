//! Contracts between the search core and its collaborators.
//!
//! The search never implements game rules. It drives a [`ForwardModel`]
//! (the game's rule engine, advanced one joint action at a time) and scores
//! simulated futures with a [`Heuristic`]. Both are injected by the
//! enclosing player; the search core stays game-agnostic.

/// A simulatable game state under a turn-synchronous forward model.
///
/// `Clone` must produce an independent deep copy: simulated futures may not
/// share mutable sub-objects with the authoritative state, otherwise one
/// agent's search would contaminate another's.
///
/// Actions form a finite, totally ordered set identified by indices
/// `0..num_actions()`. The index mapping must be stable for the lifetime of
/// the state, since the search keeps per-action accumulators and encodes
/// genomes as index sequences.
pub trait ForwardModel: Clone {
    /// Whether the game has ended at this state.
    fn is_terminal(&self) -> bool;

    /// Identity of the agent this search is deciding for.
    fn acting_agent(&self) -> usize;

    /// Number of agents that submit an action every turn.
    fn num_agents(&self) -> usize;

    /// Size of the action set (same for every agent).
    fn num_actions(&self) -> usize;

    /// Advance the state by one turn given one action per agent.
    ///
    /// `joint[i]` is agent `i`'s action. Mutates in place.
    fn advance(&mut self, joint: &[usize]);

    /// Current grid position `(x, y)` of an agent.
    fn agent_position(&self, agent: usize) -> (i32, i32);

    /// Whether `(x, y)` lies on the board.
    fn in_bounds(&self, x: i32, y: i32) -> bool;

    /// Whether `(x, y)` is an active hazard tile an agent should avoid.
    fn is_hazard(&self, x: i32, y: i32) -> bool;

    /// Movement direction `(dx, dy)` associated with an action.
    /// Non-movement actions map to `(0, 0)`.
    fn action_direction(&self, action: usize) -> (i32, i32);

    /// A safe no-op action (stay in place). Used as the fallback when a
    /// search yields no decision and as the opponent stand-in for one-step
    /// lookaheads.
    fn default_action(&self) -> usize {
        0
    }
}

/// Scores a simulated state from the acting agent's perspective.
///
/// Implementations must be deterministic given the state; tie-break noise
/// is added by the search core, never by the heuristic.
pub trait Heuristic<M: ForwardModel>: Send + Sync {
    fn evaluate(&self, state: &M) -> f64;
}

impl<M: ForwardModel, F> Heuristic<M> for F
where
    F: Fn(&M) -> f64 + Send + Sync,
{
    fn evaluate(&self, state: &M) -> f64 {
        self(state)
    }
}
