//! Persistent edits over workflow trees
//!
//! Every edit returns a new root. Only the nodes on the path from the root
//! to the edited node are copied; all other subtrees are shared with the
//! input tree through their `Arc`s.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{EditorError, Result};
use crate::types::{NodeKind, NodeRef, WorkflowNode};

/// Replacement for an edited node: `None` removes it from its slot
type Slot = Option<NodeRef>;

/// Generate a fresh node identifier
pub fn create_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Visit every node in the tree, depth first (node, conditions, child)
pub fn walk<'a>(node: &'a WorkflowNode, visit: &mut impl FnMut(&'a WorkflowNode)) {
    visit(node);
    for condition in node.conditions() {
        walk(condition, visit);
    }
    if let Some(child) = &node.child_node {
        walk(child, visit);
    }
}

/// Find a node anywhere in the tree
pub fn find_node<'a>(node: &'a NodeRef, id: &str) -> Option<&'a NodeRef> {
    if node.id == id {
        return Some(node);
    }
    node.conditions()
        .iter()
        .find_map(|condition| find_node(condition, id))
        .or_else(|| node.child_node.as_ref().and_then(|child| find_node(child, id)))
}

/// Collect every id in the tree
pub fn collect_ids(node: &WorkflowNode) -> Vec<&str> {
    let mut ids = Vec::new();
    walk(node, &mut |n| ids.push(n.id.as_str()));
    ids
}

/// Return the first id that appears more than once
pub fn first_duplicate_id(node: &WorkflowNode) -> Option<String> {
    let mut seen = HashSet::new();
    let mut duplicate = None;
    walk(node, &mut |n| {
        if duplicate.is_none() && !seen.insert(n.id.as_str()) {
            duplicate = Some(n.id.clone());
        }
    });
    duplicate
}

/// Deep copy of a subtree with a fresh id on every node
///
/// Descends into the child chain and into the condition lists of nested
/// route nodes.
pub fn reset_ids(node: &WorkflowNode) -> WorkflowNode {
    let mut copy = node.clone();
    copy.id = create_id();
    copy.child_node = node.child_node.as_deref().map(|child| Arc::new(reset_ids(child)));
    if let NodeKind::Route {
        condition_node_list,
    } = &mut copy.kind
    {
        *condition_node_list = node
            .conditions()
            .iter()
            .map(|condition| Arc::new(reset_ids(condition)))
            .collect();
    }
    copy
}

/// Attach `tail` after the last node of `node`'s own chain
fn append_tail(mut node: WorkflowNode, tail: Slot) -> WorkflowNode {
    node.child_node = match node.child_node.take() {
        Some(child) => Some(Arc::new(append_tail((*child).clone(), tail))),
        None => tail,
    };
    node
}

/// Locate `target` below `node` and replace it with whatever `edit` returns
///
/// Returns `Ok(None)` when `target` is not in this subtree, otherwise the
/// new slot value for `node` itself. A condition removed from a route that
/// is left with fewer than two conditions collapses the route into its
/// child.
fn edit_subtree(
    node: &NodeRef,
    target: &str,
    edit: &mut dyn FnMut(&NodeRef) -> Result<Slot>,
) -> Result<Option<Slot>> {
    if node.id == target {
        return edit(node).map(Some);
    }

    for (index, condition) in node.conditions().iter().enumerate() {
        if let Some(slot) = edit_subtree(condition, target, edit)? {
            let mut conditions = node.conditions().to_vec();
            match slot {
                Some(replacement) => conditions[index] = replacement,
                None => {
                    conditions.remove(index);
                    if conditions.len() < 2 {
                        return Ok(Some(node.child_node.clone()));
                    }
                }
            }
            return Ok(Some(Some(Arc::new(node.with_conditions(conditions)))));
        }
    }

    if let Some(child) = &node.child_node {
        if let Some(slot) = edit_subtree(child, target, edit)? {
            let mut copy = (**node).clone();
            copy.child_node = slot;
            return Ok(Some(Some(Arc::new(copy))));
        }
    }

    Ok(None)
}

fn edit_tree(
    root: Option<&NodeRef>,
    target: &str,
    edit: &mut dyn FnMut(&NodeRef) -> Result<Slot>,
) -> Result<Slot> {
    let root = root.ok_or(EditorError::EmptyTree)?;
    let slot = edit_subtree(root, target, edit)?
        .ok_or_else(|| EditorError::NodeNotFound(target.to_string()))?;
    if let Some(new_root) = &slot {
        if let Some(id) = first_duplicate_id(new_root) {
            return Err(EditorError::DuplicateNodeId(id));
        }
    }
    Ok(slot)
}

/// Splice `node` into the chain directly after `parent_id`
///
/// The parent's previous child is re-attached at the end of the inserted
/// node's own chain.
pub fn insert_after(root: Option<&NodeRef>, parent_id: &str, node: WorkflowNode) -> Result<Slot> {
    let mut pending = Some(node);
    edit_tree(root, parent_id, &mut |parent| {
        let inserted = pending
            .take()
            .ok_or_else(|| EditorError::NodeNotFound(parent_id.to_string()))?;
        let mut copy = (**parent).clone();
        copy.child_node = Some(Arc::new(append_tail(inserted, parent.child_node.clone())));
        Ok(Some(Arc::new(copy)))
    })
}

/// Replace the node with the same id as `node`
///
/// The replacement must fit the slot: a start node stays a start node, a
/// condition stays a condition, and chain nodes stay chainable.
pub fn replace_node(root: Option<&NodeRef>, node: WorkflowNode) -> Result<Slot> {
    let replacement = Arc::new(node);
    let target = replacement.id.clone();
    edit_tree(root, &target, &mut |current| {
        let node_type = replacement.node_type();
        if !node_type.can_replace(current.node_type()) {
            return Err(EditorError::InvalidPlacement {
                node_id: replacement.id.clone(),
                node_type,
            });
        }
        Ok(Some(replacement.clone()))
    })
}

/// Remove a node from the tree
///
/// Chain nodes are replaced by their child; condition nodes leave their
/// route's list, taking their branch with them.
pub fn remove_node(root: Option<&NodeRef>, id: &str) -> Result<Slot> {
    if let Some(root) = root {
        if root.id == id {
            return Err(EditorError::CannotRemoveStartNode(id.to_string()));
        }
    }
    edit_tree(root, id, &mut |node| {
        if node.is_condition() {
            Ok(None)
        } else {
            Ok(node.child_node.clone())
        }
    })
}
