//! Undo/redo built from `{ startNode }` snapshots
//!
//! History is two bounded stacks held in [`EditorState`]. This module
//! only plans the list updates; the store applies them through the
//! reducer like any other action, so history changes reach subscribers the
//! same way tree changes do.
//!
//! Snapshots are cheap: a snapshot is the root `Arc` of a tree that is
//! never mutated in place, so consecutive snapshots share every subtree an
//! edit did not touch.

use crate::action::EditorAction;
use crate::state::{EditorState, Snapshot};

/// Default maximum number of snapshots per stack
pub const DEFAULT_MAX_SNAPSHOTS: usize = 100;

/// Bounds and builds history transitions
#[derive(Debug, Clone, Copy)]
pub struct HistoryPolicy {
    /// Maximum number of snapshots kept on each stack
    max_snapshots: usize,
}

impl HistoryPolicy {
    /// Create a policy keeping at most `max_snapshots` per stack
    pub fn new(max_snapshots: usize) -> Self {
        Self {
            max_snapshots: max_snapshots.max(1), // At least 1 snapshot
        }
    }

    /// Maximum number of snapshots kept on each stack
    pub fn max_snapshots(&self) -> usize {
        self.max_snapshots
    }

    /// Append a snapshot, dropping the oldest ones past the bound
    pub fn push(&self, list: &[Snapshot], snapshot: Snapshot) -> Vec<Snapshot> {
        let overflow = (list.len() + 1).saturating_sub(self.max_snapshots);
        let mut next: Vec<Snapshot> = list[overflow.min(list.len())..].to_vec();
        next.push(snapshot);
        next
    }

    /// Record the current tree as an undo point and forget the redo branch
    pub fn backup(&self, state: &EditorState) -> Vec<EditorAction> {
        vec![
            EditorAction::SetUndoList {
                list: self.push(&state.undo_list, Snapshot::of(state)),
            },
            EditorAction::SetRedoList { list: Vec::new() },
        ]
    }

    /// Step back one snapshot
    ///
    /// Returns `None` when there is nothing to undo.
    pub fn undo(&self, state: &EditorState) -> Option<Vec<EditorAction>> {
        let mut undo_list = state.undo_list.to_vec();
        let snapshot = undo_list.pop()?;
        Some(vec![
            EditorAction::SetUndoList { list: undo_list },
            EditorAction::SetRedoList {
                list: self.push(&state.redo_list, Snapshot::of(state)),
            },
            EditorAction::SetStartNode {
                node: snapshot.start_node,
            },
        ])
    }

    /// Step forward one snapshot
    ///
    /// Returns `None` when there is nothing to redo. Unlike
    /// [`backup`](Self::backup), the remaining redo branch is kept.
    pub fn redo(&self, state: &EditorState) -> Option<Vec<EditorAction>> {
        let mut redo_list = state.redo_list.to_vec();
        let snapshot = redo_list.pop()?;
        Some(vec![
            EditorAction::SetRedoList { list: redo_list },
            EditorAction::SetUndoList {
                list: self.push(&state.undo_list, Snapshot::of(state)),
            },
            EditorAction::SetStartNode {
                node: snapshot.start_node,
            },
        ])
    }

    /// Empty both stacks
    pub fn clear(&self) -> Vec<EditorAction> {
        vec![
            EditorAction::SetUndoList { list: Vec::new() },
            EditorAction::SetRedoList { list: Vec::new() },
        ]
    }
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SNAPSHOTS)
    }
}
