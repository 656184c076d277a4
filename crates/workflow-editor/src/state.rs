//! Editor state and history snapshots

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{NodeId, NodeRef};

/// A captured `{ startNode }` used for undo/redo
///
/// Snapshots hold the same `Arc` as the state they were taken from, so
/// taking one never copies the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node: Option<NodeRef>,
}

impl Snapshot {
    /// Capture the tree of a state
    pub fn of(state: &EditorState) -> Self {
        Self {
            start_node: state.start_node.clone(),
        }
    }
}

/// Shared, immutable history list
///
/// A list is replaced wholesale whenever it changes, so `Arc::ptr_eq`
/// tells whether two states hold the same list.
pub type SnapshotList = Arc<Vec<Snapshot>>;

/// Complete state of one editor instance
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    /// Root of the workflow tree
    pub start_node: Option<NodeRef>,
    /// Currently selected node
    pub selected_id: Option<NodeId>,
    /// Snapshots to restore on undo, oldest first
    pub undo_list: SnapshotList,
    /// Snapshots to restore on redo, oldest first
    pub redo_list: SnapshotList,
}

impl EditorState {
    /// Create a state holding the given tree and empty history
    pub fn with_start_node(start_node: Option<NodeRef>) -> Self {
        Self {
            start_node,
            ..Default::default()
        }
    }
}

/// Identity comparison for optional tree roots
pub fn same_node(a: &Option<NodeRef>, b: &Option<NodeRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
