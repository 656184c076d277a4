//! Per-field change subscriptions
//!
//! Each subscription watches one field of [`EditorState`] and keeps its own
//! last-seen value. After every store update the store hands the new state
//! to every observer; an observer calls its listener only when its field no
//! longer matches the last-seen value.
//!
//! Trees and history lists are compared by `Arc` identity, the selected id
//! by value.

use serde::{Deserialize, Serialize};

use crate::state::{same_node, EditorState, SnapshotList};
use crate::types::{NodeId, NodeRef};

/// Handle returned by the `subscribe_*` methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

/// Something that reacts to committed states
trait StateObserver {
    fn observe(&mut self, state: &EditorState);
}

/// Observer of a single state field
struct FieldObserver<T> {
    last: T,
    extract: fn(&EditorState) -> T,
    same: fn(&T, &T) -> bool,
    listener: Box<dyn FnMut(&T)>,
}

impl<T> StateObserver for FieldObserver<T> {
    fn observe(&mut self, state: &EditorState) {
        let next = (self.extract)(state);
        if (self.same)(&self.last, &next) {
            return;
        }
        self.last = next;
        (self.listener)(&self.last);
    }
}

/// Observer list keyed by subscription id
#[derive(Default)]
pub struct Subscriptions {
    next_id: u64,
    observers: Vec<(SubscriptionId, Box<dyn StateObserver>)>,
}

impl Subscriptions {
    /// Create an empty observer list
    pub fn new() -> Self {
        Self::default()
    }

    fn insert<T: 'static>(
        &mut self,
        state: &EditorState,
        extract: fn(&EditorState) -> T,
        same: fn(&T, &T) -> bool,
        listener: Box<dyn FnMut(&T)>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let observer = FieldObserver {
            last: extract(state),
            extract,
            same,
            listener,
        };
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Watch `startNode`
    pub fn on_start_node(
        &mut self,
        state: &EditorState,
        mut listener: impl FnMut(Option<&NodeRef>) + 'static,
    ) -> SubscriptionId {
        self.insert(
            state,
            |s| s.start_node.clone(),
            same_node,
            Box::new(move |node: &Option<NodeRef>| listener(node.as_ref())),
        )
    }

    /// Watch `selectedId`
    pub fn on_selected(
        &mut self,
        state: &EditorState,
        mut listener: impl FnMut(Option<&str>) + 'static,
    ) -> SubscriptionId {
        self.insert(
            state,
            |s| s.selected_id.clone(),
            |a: &Option<NodeId>, b: &Option<NodeId>| a == b,
            Box::new(move |id: &Option<NodeId>| listener(id.as_deref())),
        )
    }

    /// Watch `undoList`
    pub fn on_undo_list(
        &mut self,
        state: &EditorState,
        listener: impl FnMut(&SnapshotList) + 'static,
    ) -> SubscriptionId {
        self.insert(state, |s| s.undo_list.clone(), same_list, Box::new(listener))
    }

    /// Watch `redoList`
    pub fn on_redo_list(
        &mut self,
        state: &EditorState,
        listener: impl FnMut(&SnapshotList) + 'static,
    ) -> SubscriptionId {
        self.insert(state, |s| s.redo_list.clone(), same_list, Box::new(listener))
    }

    /// Remove a subscription
    ///
    /// Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub_id, _)| *sub_id != id);
        self.observers.len() != before
    }

    /// Hand a committed state to every observer, in subscription order
    pub fn notify(&mut self, state: &EditorState) {
        for (_, observer) in self.observers.iter_mut() {
            observer.observe(state);
        }
    }

    /// Number of active subscriptions
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Check if there are no subscriptions
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

fn same_list(a: &SnapshotList, b: &SnapshotList) -> bool {
    std::sync::Arc::ptr_eq(a, b)
}
