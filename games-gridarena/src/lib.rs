//! Minimal multi-agent grid arena for the `grid-mcts` forward-model
//! contract.
//!
//! Up to four agents move simultaneously on a rectangular board of empty,
//! wall and flame tiles. Walls block movement, flames kill whoever stands
//! on them, and the game ends when at most one agent is alive or the tick
//! limit is reached. The rules are deliberately tiny: this crate exists as
//! a reference implementation of the contract so the search crates can be
//! exercised end-to-end, not as a full game.
//!
//! # Usage
//!
//! ```rust
//! use games_gridarena::{Arena, Tile};
//! use grid_mcts::ForwardModel;
//!
//! let mut arena = Arena::new(5, 5, 100).with_agent(1, 1).with_agent(3, 3);
//! arena.set_tile(2, 2, Tile::Flame);
//!
//! assert!(!arena.is_terminal());
//! arena.advance(&[games_gridarena::RIGHT, games_gridarena::STAY]);
//! ```

use grid_mcts::{ForwardModel, Heuristic};

/// Stay in place: the safe default action.
pub const STAY: usize = 0;
pub const UP: usize = 1;
pub const DOWN: usize = 2;
pub const LEFT: usize = 3;
pub const RIGHT: usize = 4;

/// Stable action-index ordering; `DIRECTIONS[action]` is its movement.
pub const NUM_ACTIONS: usize = 5;
const DIRECTIONS: [(i32, i32); NUM_ACTIONS] = [(0, 0), (0, -1), (0, 1), (-1, 0), (1, 0)];

/// Board tile types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    Flame,
}

/// Position and liveness of one agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentState {
    pub x: i32,
    pub y: i32,
    pub alive: bool,
}

/// The arena state: board, agents, and turn counter.
#[derive(Debug, Clone)]
pub struct Arena {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    agents: Vec<AgentState>,
    acting: usize,
    tick: u32,
    max_ticks: u32,
}

impl Arena {
    /// Empty board with no agents. Agent 0 acts by default.
    pub fn new(width: i32, height: i32, max_ticks: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; (width * height) as usize],
            agents: Vec::new(),
            acting: 0,
            tick: 0,
            max_ticks,
        }
    }

    /// Add an agent at `(x, y)`. Order defines agent identity.
    pub fn with_agent(mut self, x: i32, y: i32) -> Self {
        self.agents.push(AgentState { x, y, alive: true });
        self
    }

    /// Choose which agent's perspective the search decides for.
    pub fn acting_as(mut self, agent: usize) -> Self {
        self.acting = agent;
        self
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        let idx = self.index(x, y);
        self.tiles[idx] = tile;
    }

    pub fn tile(&self, x: i32, y: i32) -> Tile {
        self.tiles[self.index(x, y)]
    }

    pub fn agent(&self, agent: usize) -> &AgentState {
        &self.agents[agent]
    }

    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.in_bounds(x, y));
        (y * self.width + x) as usize
    }
}

impl ForwardModel for Arena {
    fn is_terminal(&self) -> bool {
        self.tick >= self.max_ticks || (self.agents.len() > 1 && self.alive_count() <= 1)
    }

    fn acting_agent(&self) -> usize {
        self.acting
    }

    fn num_agents(&self) -> usize {
        self.agents.len()
    }

    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn advance(&mut self, joint: &[usize]) {
        // Simultaneous movement: walls block, everything else is passable
        // (agents may share a cell).
        for (agent, &action) in self.agents.iter_mut().zip(joint) {
            if !agent.alive {
                continue;
            }
            let (dx, dy) = DIRECTIONS[action];
            let (x, y) = (agent.x + dx, agent.y + dy);
            if x >= 0 && x < self.width && y >= 0 && y < self.height {
                let idx = (y * self.width + x) as usize;
                if self.tiles[idx] != Tile::Wall {
                    agent.x = x;
                    agent.y = y;
                }
            }
        }

        // Flames burn after movement resolves.
        for agent in &mut self.agents {
            if agent.alive {
                let idx = (agent.y * self.width + agent.x) as usize;
                if self.tiles[idx] == Tile::Flame {
                    agent.alive = false;
                }
            }
        }

        self.tick += 1;
    }

    fn agent_position(&self, agent: usize) -> (i32, i32) {
        let a = &self.agents[agent];
        (a.x, a.y)
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn is_hazard(&self, x: i32, y: i32) -> bool {
        self.tile(x, y) == Tile::Flame
    }

    fn action_direction(&self, action: usize) -> (i32, i32) {
        DIRECTIONS[action]
    }

    fn default_action(&self) -> usize {
        STAY
    }
}

/// Scores an arena from the acting agent's perspective: staying alive
/// dominates, each downed opponent adds a bonus.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurvivalHeuristic;

impl Heuristic<Arena> for SurvivalHeuristic {
    fn evaluate(&self, state: &Arena) -> f64 {
        let me = state.agent(state.acting_agent());
        if !me.alive {
            return -10.0;
        }
        let downed = state
            .agents
            .iter()
            .enumerate()
            .filter(|(i, a)| *i != state.acting_agent() && !a.alive)
            .count();
        10.0 + downed as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agents_move_simultaneously() {
        let mut arena = Arena::new(5, 5, 100).with_agent(1, 1).with_agent(3, 3);
        arena.advance(&[RIGHT, UP]);

        assert_eq!(arena.agent_position(0), (2, 1));
        assert_eq!(arena.agent_position(1), (3, 2));
        assert_eq!(arena.tick(), 1);
    }

    #[test]
    fn walls_and_edges_block_movement() {
        let mut arena = Arena::new(3, 3, 100).with_agent(0, 0).with_agent(2, 2);
        arena.set_tile(1, 0, Tile::Wall);

        // Right into the wall, up off the board: both stay put.
        arena.advance(&[RIGHT, UP]);
        assert_eq!(arena.agent_position(0), (0, 0));
        arena.advance(&[UP, STAY]);
        assert_eq!(arena.agent_position(0), (0, 0));
    }

    #[test]
    fn flames_kill_and_end_the_game() {
        let mut arena = Arena::new(3, 3, 100).with_agent(0, 0).with_agent(2, 2);
        arena.set_tile(1, 0, Tile::Flame);

        assert!(!arena.is_terminal());
        arena.advance(&[RIGHT, STAY]);

        assert!(!arena.agent(0).alive);
        assert_eq!(arena.alive_count(), 1);
        assert!(arena.is_terminal());
    }

    #[test]
    fn tick_limit_terminates() {
        let mut arena = Arena::new(3, 3, 2).with_agent(0, 0).with_agent(2, 2);
        arena.advance(&[STAY, STAY]);
        assert!(!arena.is_terminal());
        arena.advance(&[STAY, STAY]);
        assert!(arena.is_terminal());
    }

    #[test]
    fn hazard_lookup_matches_tiles() {
        let mut arena = Arena::new(3, 3, 100).with_agent(0, 0).with_agent(2, 2);
        arena.set_tile(1, 1, Tile::Flame);

        assert!(arena.is_hazard(1, 1));
        assert!(!arena.is_hazard(0, 1));
        assert!(arena.in_bounds(2, 2));
        assert!(!arena.in_bounds(3, 0));
    }

    #[test]
    fn survival_heuristic_rewards_living() {
        let mut arena = Arena::new(3, 3, 100).with_agent(0, 0).with_agent(2, 2);
        let heuristic = SurvivalHeuristic;
        assert!((heuristic.evaluate(&arena) - 10.0).abs() < 1e-12);

        // Opponent burns: bonus for the acting agent.
        arena.set_tile(2, 1, Tile::Flame);
        arena.advance(&[STAY, UP]);
        assert!((heuristic.evaluate(&arena) - 11.0).abs() < 1e-12);

        // Acting agent dead: hard penalty.
        let mut doomed = Arena::new(3, 3, 100).with_agent(0, 0).with_agent(2, 2);
        doomed.set_tile(1, 0, Tile::Flame);
        doomed.advance(&[RIGHT, STAY]);
        assert!((heuristic.evaluate(&doomed) + 10.0).abs() < 1e-12);
    }
}
