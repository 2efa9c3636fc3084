//! Rollout policies shared by both search variants.

use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::model::ForwardModel;

/// Advance `state` by one turn: the acting agent plays `action`, every
/// other agent plays a uniformly random action.
pub fn advance_joint<M: ForwardModel>(state: &mut M, action: usize, rng: &mut ChaCha20Rng) {
    let acting = state.acting_agent();
    let num_actions = state.num_actions();
    let joint: Vec<usize> = (0..state.num_agents())
        .map(|agent| {
            if agent == acting {
                action
            } else {
                rng.gen_range(0..num_actions)
            }
        })
        .collect();
    state.advance(&joint);
}

/// Pick a random action whose destination cell is in bounds and not a
/// hazard tile. Candidates are tried in random order; if no direction is
/// safe, fall back to a uniformly random action over the full set. Always
/// returns a legal index, never an error.
pub fn safe_random_action<M: ForwardModel>(state: &M, rng: &mut ChaCha20Rng) -> usize {
    let (px, py) = state.agent_position(state.acting_agent());
    let mut candidates: Vec<usize> = (0..state.num_actions()).collect();

    while !candidates.is_empty() {
        let pick = rng.gen_range(0..candidates.len());
        let action = candidates[pick];
        let (dx, dy) = state.action_direction(action);
        let (x, y) = (px + dx, py + dy);

        if state.in_bounds(x, y) && !state.is_hazard(x, y) {
            return action;
        }
        candidates.swap_remove(pick);
    }

    rng.gen_range(0..state.num_actions())
}
