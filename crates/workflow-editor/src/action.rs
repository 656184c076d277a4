//! Editor actions and the reducer that applies them
//!
//! The reducer is the only place where a new [`EditorState`] is derived.
//! It never touches the previous state: unchanged fields and subtrees are
//! shared between the two.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::state::{EditorState, Snapshot};
use crate::tree;
use crate::types::{NodeId, NodeRef, WorkflowNode};

/// Every `type` tag understood by [`EditorAction`]
const ACTION_TYPES: &[&str] = &[
    "ADD_NODE",
    "CHANGE_NODE",
    "DELETE_NODE",
    "SELECT_NODE",
    "SET_START_NODE",
    "SET_UNDO_LIST",
    "SET_REDO_LIST",
];

/// A state transition, as sent by the UI layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditorAction {
    /// Splice a node into the chain after `parent_id`
    #[serde(rename_all = "camelCase")]
    AddNode { parent_id: NodeId, node: WorkflowNode },

    /// Replace the node that has the same id
    ChangeNode { node: WorkflowNode },

    /// Remove a node
    DeleteNode { id: NodeId },

    /// Change the selection
    SelectNode {
        #[serde(default)]
        id: Option<NodeId>,
    },

    /// Replace the whole tree
    SetStartNode {
        #[serde(default)]
        node: Option<NodeRef>,
    },

    /// Overwrite the undo list
    SetUndoList { list: Vec<Snapshot> },

    /// Overwrite the redo list
    SetRedoList { list: Vec<Snapshot> },
}

impl EditorAction {
    /// Decode an action from JSON
    ///
    /// Unknown `type` tags yield [`EditorError::UnknownAction`] rather than
    /// a generic decoding error.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let tag = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| EditorError::UnknownAction("<missing>".to_string()))?;
        if !ACTION_TYPES.contains(&tag) {
            return Err(EditorError::UnknownAction(tag.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// The wire tag of this action
    pub fn name(&self) -> &'static str {
        match self {
            EditorAction::AddNode { .. } => "ADD_NODE",
            EditorAction::ChangeNode { .. } => "CHANGE_NODE",
            EditorAction::DeleteNode { .. } => "DELETE_NODE",
            EditorAction::SelectNode { .. } => "SELECT_NODE",
            EditorAction::SetStartNode { .. } => "SET_START_NODE",
            EditorAction::SetUndoList { .. } => "SET_UNDO_LIST",
            EditorAction::SetRedoList { .. } => "SET_REDO_LIST",
        }
    }
}

/// Apply an action to a state, producing the next state
pub fn reduce(state: &EditorState, action: EditorAction) -> Result<EditorState> {
    let mut next = state.clone();
    match action {
        EditorAction::AddNode { parent_id, node } => {
            if !node.node_type().is_chainable() {
                return Err(EditorError::InvalidPlacement {
                    node_type: node.node_type(),
                    node_id: node.id,
                });
            }
            next.start_node = tree::insert_after(state.start_node.as_ref(), &parent_id, node)?;
        }
        EditorAction::ChangeNode { node } => {
            next.start_node = tree::replace_node(state.start_node.as_ref(), node)?;
        }
        EditorAction::DeleteNode { id } => {
            next.start_node = tree::remove_node(state.start_node.as_ref(), &id)?;
        }
        EditorAction::SelectNode { id } => {
            next.selected_id = id;
        }
        EditorAction::SetStartNode { node } => {
            if let Some(id) = node.as_deref().and_then(tree::first_duplicate_id) {
                return Err(EditorError::DuplicateNodeId(id));
            }
            next.start_node = node;
        }
        EditorAction::SetUndoList { list } => {
            next.undo_list = Arc::new(list);
        }
        EditorAction::SetRedoList { list } => {
            next.redo_list = Arc::new(list);
        }
    }
    Ok(next)
}
