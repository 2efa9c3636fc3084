//! Arena-allocated classical search tree.
//!
//! Nodes are stored contiguously and addressed by [`NodeId`]. The RAVE
//! accumulators are owned here rather than copied per node: they are shared
//! by every node of one turn's tree and dropped with it.

use crate::node::{NodeId, SearchNode};

#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    root: NodeId,

    /// Per-action rollout counts across the whole tree (RAVE).
    rave_visits: Vec<f64>,

    /// Per-action result sums across the whole tree (RAVE).
    rave_wins: Vec<f64>,
}

impl SearchTree {
    pub fn new(num_actions: usize) -> Self {
        Self {
            nodes: vec![SearchNode::new_root(num_actions)],
            root: NodeId(0),
            rave_visits: vec![0.0; num_actions],
            rave_wins: vec![0.0; num_actions],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Rapid action-value estimate for an action: mean result over every
    /// rollout in this tree that passed through it.
    #[inline]
    pub fn rave_value(&self, action: usize) -> f64 {
        if self.rave_visits[action] > 0.0 {
            self.rave_wins[action] / self.rave_visits[action]
        } else {
            0.0
        }
    }

    #[inline]
    pub fn rave_visits(&self, action: usize) -> f64 {
        self.rave_visits[action]
    }

    /// Create a child of `parent` in the given action slot.
    ///
    /// The slot must be empty; expansion never replaces a child.
    pub fn add_child(&mut self, parent: NodeId, action: usize) -> NodeId {
        let (depth, num_actions) = {
            let node = self.get(parent);
            debug_assert!(node.children[action].is_none());
            (node.depth + 1, node.children.len())
        };

        let id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(SearchNode::new_child(parent, action, depth, num_actions));
        self.get_mut(parent).children[action] = Some(id);
        id
    }

    /// Walk from `from` to the root: bump visits, accumulate the result,
    /// widen bounds, and credit each node's originating action in the RAVE
    /// accumulators.
    pub fn backpropagate(&mut self, from: NodeId, result: f64) {
        let mut current = from;
        while current.is_some() {
            let node = &mut self.nodes[current.0 as usize];
            node.visit_count += 1;
            node.value_sum += result;
            node.widen_bounds(result);

            if let Some(action) = node.action {
                self.rave_visits[action] += 1.0;
                self.rave_wins[action] += result;
            }

            current = node.parent;
        }
    }

    /// Robust-child decision rule: the root child with the most visits.
    /// Ties go to the lowest action index. `None` if no child exists yet.
    pub fn best_action(&self) -> Option<usize> {
        let root = self.get(self.root);
        let mut best: Option<(usize, u32)> = None;

        for (action, slot) in root.children.iter().enumerate() {
            let Some(id) = *slot else { continue };
            let visits = self.get(id).visit_count;
            if best.map_or(true, |(_, best_visits)| visits > best_visits) {
                best = Some((action, visits));
            }
        }

        best.map(|(action, _)| action)
    }
}
