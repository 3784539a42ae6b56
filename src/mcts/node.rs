//! Search tree nodes.
//!
//! Nodes live in an arena owned by one determinization task and are
//! addressed by index; the parent link is an index back into the same
//! arena. The tree is discarded when the task returns its aggregates.

use smallvec::SmallVec;

use crate::game::{Action, GameState};

/// Index into a task's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for "no parent" (the root).
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of a determinization's search tree.
///
/// `untried` counts the legal actions not yet materialized as children; the
/// action list itself is never stored, only indexed by this countdown.
/// `value` is a running maximum over backpropagated rewards.
#[derive(Clone, Debug)]
pub(crate) struct SearchNode {
    pub state: GameState,
    pub action: Option<Action>,
    pub parent: NodeId,
    pub children: SmallVec<[NodeId; 8]>,
    pub visits: u32,
    pub value: f64,
    pub untried: usize,
}

impl SearchNode {
    pub fn new(state: GameState, action: Option<Action>, parent: NodeId, untried: usize) -> Self {
        Self {
            state,
            action,
            parent,
            children: SmallVec::new(),
            visits: 0,
            value: 0.0,
            untried,
        }
    }

    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried == 0
    }
}

/// Arena of nodes for one determinization task.
#[derive(Debug)]
pub(crate) struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Tree seeded with a root node.
    pub fn new(root: SearchNode) -> Self {
        Self { nodes: vec![root] }
    }

    pub const ROOT: NodeId = NodeId(0);

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.index()]
    }

    /// Append a node and return its id.
    pub fn alloc(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}
