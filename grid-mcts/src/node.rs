//! Classical search tree node.
//!
//! Nodes live in an arena (`Vec<SearchNode>`) and reference each other by
//! [`NodeId`] indices, so the parent back-pointer never forms an ownership
//! cycle.

/// Index into the node arena. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// One decision point reached by a sequence of joint-action simulations
/// from the turn-root state.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Parent node index (NONE for root).
    pub parent: NodeId,

    /// Action index that created this node from its parent (`None` at the
    /// root). Also the node's slot in the RAVE accumulators.
    pub action: Option<usize>,

    /// Plies from the turn root (0 at root).
    pub depth: u32,

    /// Number of backpropagations through this node.
    pub visit_count: u32,

    /// Sum of rollout results backpropagated through this node.
    pub value_sum: f64,

    /// Running [min, max] of results seen at this node; used to normalize
    /// child means into [0, 1] during selection. Only ever widens.
    pub bounds: [f64; 2],

    /// One slot per legal action, filled lazily on expansion. Slot count is
    /// fixed at construction.
    pub children: Vec<Option<NodeId>>,
}

impl SearchNode {
    pub fn new_root(num_actions: usize) -> Self {
        Self {
            parent: NodeId::NONE,
            action: None,
            depth: 0,
            visit_count: 0,
            value_sum: 0.0,
            bounds: [f64::MAX, -f64::MAX],
            children: vec![None; num_actions],
        }
    }

    pub fn new_child(parent: NodeId, action: usize, depth: u32, num_actions: usize) -> Self {
        Self {
            parent,
            action: Some(action),
            depth,
            visit_count: 0,
            value_sum: 0.0,
            bounds: [f64::MAX, -f64::MAX],
            children: vec![None; num_actions],
        }
    }

    /// Whether every child slot is occupied.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.children.iter().all(|slot| slot.is_some())
    }

    /// Indices of the still-empty child slots.
    pub fn unexpanded_actions(&self) -> Vec<usize> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(action, slot)| slot.is_none().then_some(action))
            .collect()
    }

    /// Mean backpropagated value, epsilon-guarded against zero visits.
    #[inline]
    pub fn mean_value(&self, epsilon: f64) -> f64 {
        self.value_sum / (self.visit_count as f64 + epsilon)
    }

    /// Widen the bound pair to cover `result`.
    #[inline]
    pub fn widen_bounds(&mut self, result: f64) {
        if result < self.bounds[0] {
            self.bounds[0] = result;
        }
        if result > self.bounds[1] {
            self.bounds[1] = result;
        }
    }
}
