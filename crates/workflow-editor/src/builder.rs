//! Fluent builder for workflow trees
//!
//! Provides a compact way to write a chain of nodes without nesting
//! `with_child` calls.

use crate::types::WorkflowNode;

/// Fluent builder for a start node and its chain
///
/// # Example
///
/// ```
/// use workflow_editor::{WorkflowBuilder, WorkflowNode};
///
/// let tree = WorkflowBuilder::new("start")
///     .name("Initiator")
///     .then(WorkflowNode::approver("a1"))
///     .then_route(
///         "route-1",
///         vec![WorkflowNode::condition("c1"), WorkflowNode::condition("c2")],
///     )
///     .then(WorkflowNode::notifier("n1"))
///     .build();
///
/// assert_eq!(tree.child_node.as_ref().unwrap().id, "a1");
/// ```
pub struct WorkflowBuilder {
    start: WorkflowNode,
    chain: Vec<WorkflowNode>,
}

impl WorkflowBuilder {
    /// Start a new tree with the given start node id
    pub fn new(start_id: impl Into<String>) -> Self {
        Self {
            start: WorkflowNode::start(start_id),
            chain: Vec::new(),
        }
    }

    /// Name the start node
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.start.name = Some(name.into());
        self
    }

    /// Append a node to the chain
    ///
    /// Any child the node already has is replaced by the rest of the chain.
    pub fn then(mut self, node: WorkflowNode) -> Self {
        self.chain.push(node);
        self
    }

    /// Append a route node with the given conditions
    pub fn then_route(self, id: impl Into<String>, conditions: Vec<WorkflowNode>) -> Self {
        self.then(WorkflowNode::route(id, conditions))
    }

    /// Build the tree
    pub fn build(self) -> WorkflowNode {
        let tail = self.chain.into_iter().rev().fold(None, |next, mut node: WorkflowNode| {
            node.child_node = next.map(std::sync::Arc::new);
            Some(node)
        });
        let mut start = self.start;
        start.child_node = tail.map(std::sync::Arc::new);
        start
    }
}
