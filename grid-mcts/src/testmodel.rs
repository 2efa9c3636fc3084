//! Tiny forward model used by unit tests across the crate.

use crate::model::ForwardModel;

/// Two agents on a 1 x 9 strip. Agent 0 (the acting agent) walks left or
/// right and is clamped at the edges; agent 1 is inert. The game ends after
/// a fixed number of ticks. `all_hazard` marks every cell as hazardous to
/// exercise the safe-random fallback.
#[derive(Clone, Debug)]
pub struct LineWorld {
    pub x: i32,
    pub tick: u32,
    pub horizon: u32,
    hazard: bool,
}

impl LineWorld {
    pub const WIDTH: i32 = 9;
    pub const STAY: usize = 0;
    pub const LEFT: usize = 1;
    pub const RIGHT: usize = 2;

    pub fn fresh(horizon: u32) -> Self {
        Self {
            x: Self::WIDTH / 2,
            tick: 0,
            horizon,
            hazard: false,
        }
    }

    pub fn all_hazard(mut self) -> Self {
        self.hazard = true;
        self
    }
}

impl ForwardModel for LineWorld {
    fn is_terminal(&self) -> bool {
        self.tick >= self.horizon
    }

    fn acting_agent(&self) -> usize {
        0
    }

    fn num_agents(&self) -> usize {
        2
    }

    fn num_actions(&self) -> usize {
        3
    }

    fn advance(&mut self, joint: &[usize]) {
        let (dx, _) = self.action_direction(joint[0]);
        self.x = (self.x + dx).clamp(0, Self::WIDTH - 1);
        self.tick += 1;
    }

    fn agent_position(&self, agent: usize) -> (i32, i32) {
        if agent == 0 {
            (self.x, 0)
        } else {
            (0, 0)
        }
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        (0..Self::WIDTH).contains(&x) && y == 0
    }

    fn is_hazard(&self, _x: i32, _y: i32) -> bool {
        self.hazard
    }

    fn action_direction(&self, action: usize) -> (i32, i32) {
        [(0, 0), (-1, 0), (1, 0)][action]
    }
}
