//! Behavioural tests for EditorStore history, condition editing and
//! subscriptions.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use workflow_editor::{
    tree, EditorConfig, EditorError, EditorStore, SnapshotList, WorkflowBuilder, WorkflowNode,
};

fn three_way() -> WorkflowNode {
    WorkflowBuilder::new("start")
        .then(WorkflowNode::approver("a1").with_name("Manager"))
        .then_route(
            "route",
            vec![
                WorkflowNode::condition("A")
                    .with_name("A")
                    .with_child(WorkflowNode::audit("A-audit")),
                WorkflowNode::condition("B").with_name("B"),
                WorkflowNode::condition("C").with_name("C"),
            ],
        )
        .then(WorkflowNode::notifier("n1"))
        .build()
}

fn store() -> EditorStore {
    EditorStore::builder().start_node(three_way()).build().unwrap()
}

fn condition_ids(store: &EditorStore) -> Vec<String> {
    store
        .find_node("route")
        .expect("route exists")
        .conditions()
        .iter()
        .map(|c| c.id.clone())
        .collect()
}

#[test]
fn undo_restores_tree_and_fills_redo() {
    let mut store = store();
    let before = store.start_node().cloned();

    store
        .change_node(WorkflowNode::approver("a1").with_name("Director"))
        .unwrap();
    assert_eq!(store.find_node("a1").unwrap().name.as_deref(), Some("Director"));

    let edited = store.start_node().cloned();
    assert!(store.undo());
    assert_eq!(store.start_node().cloned(), before);
    assert_eq!(store.redo_list().len(), 1);
    assert_eq!(store.redo_list()[0].start_node, edited);
    assert!(store.undo_list().is_empty());
}

#[test]
fn remove_condition_shrinks_then_removes_route() {
    let mut store = store();

    store.remove_condition("route", "B").unwrap();
    assert_eq!(condition_ids(&store), vec!["A", "C"]);

    store.remove_condition("route", "C").unwrap();
    assert!(store.find_node("route").is_none());
    assert!(store.find_node("A-audit").is_none());
    // The route's continuation is reattached to its parent
    let a1 = store.find_node("a1").unwrap();
    assert_eq!(a1.child_node.as_ref().unwrap().id, "n1");
    assert_eq!(store.undo_list().len(), 2);
}

#[test]
fn clone_condition_copies_branch_with_fresh_ids() {
    let mut store = store();
    let copy_id = store.clone_condition("route", "A").unwrap();

    let route = store.find_node("route").unwrap();
    let copy = &route.conditions()[1];
    assert_eq!(copy.id, copy_id);
    assert_eq!(copy.name.as_deref(), Some("A (copy)"));
    assert_eq!(copy.child_node.as_ref().unwrap().node_type(), workflow_editor::NodeType::Audit);

    let root = store.start_node().unwrap();
    let ids = tree::collect_ids(root);
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len(), "ids must stay unique");
    assert!(store.validate().is_ok());
}

#[test]
fn moves_at_the_edges_are_noops() {
    let mut store = store();
    store.trans_condition_one_step_to_left("route", 0).unwrap();
    store.trans_condition_one_step_to_right("route", 2).unwrap();
    store.trans_condition_one_step_to_right("route", 9).unwrap();

    assert_eq!(condition_ids(&store), vec!["A", "B", "C"]);
    assert!(store.undo_list().is_empty());
}

#[test]
fn moves_with_huge_index_are_noops() {
    let mut store = store();
    store.trans_condition_one_step_to_right("route", usize::MAX).unwrap();
    store.trans_condition_one_step_to_left("route", usize::MAX).unwrap();

    assert_eq!(condition_ids(&store), vec!["A", "B", "C"]);
    assert!(store.undo_list().is_empty());
}

#[test]
fn duplicate_ids_are_rejected_on_load() {
    let duplicated = || WorkflowNode::start("x").with_child(WorkflowNode::audit("x"));

    let err = EditorStore::builder().start_node(duplicated()).build().unwrap_err();
    assert!(matches!(err, EditorError::DuplicateNodeId(ref id) if id == "x"));

    let mut store = store();
    let err = store.set_start_node(Some(duplicated())).unwrap_err();
    assert!(matches!(err, EditorError::DuplicateNodeId(_)));
    assert_eq!(store.start_node().unwrap().id, "start");
    assert!(store.validate().is_ok());
}

#[test]
fn replacements_keep_their_slot_kind() {
    let mut store = store();

    let err = store
        .change_condition("route", WorkflowNode::approver("B"))
        .unwrap_err();
    assert!(matches!(err, EditorError::InvalidPlacement { .. }));

    let err = store.change_node(WorkflowNode::start("a1")).unwrap_err();
    assert!(matches!(err, EditorError::InvalidPlacement { .. }));
    let err = store.change_node(WorkflowNode::condition("n1")).unwrap_err();
    assert!(matches!(err, EditorError::InvalidPlacement { .. }));
    let err = store.change_node(WorkflowNode::notifier("B")).unwrap_err();
    assert!(matches!(err, EditorError::InvalidPlacement { .. }));

    assert!(store.undo_list().is_empty());
    assert!(store.validate().is_ok());
}

#[test]
fn undo_on_empty_history_changes_nothing() {
    let mut store = store();
    store.select_node(Some("a1")).unwrap();
    let before = store.state().clone();

    assert!(!store.undo());
    assert!(!store.redo());

    let after = store.state();
    assert_eq!(after.start_node, before.start_node);
    assert_eq!(after.selected_id, before.selected_id);
    assert!(after.undo_list.is_empty());
    assert!(after.redo_list.is_empty());
}

#[test]
fn moves_swap_neighbours() {
    let mut store = store();
    store.trans_condition_one_step_to_left("route", 1).unwrap();
    assert_eq!(condition_ids(&store), vec!["B", "A", "C"]);

    let mut store = self::store();
    store.trans_condition_one_step_to_right("route", 1).unwrap();
    assert_eq!(condition_ids(&store), vec!["A", "C", "B"]);
}

#[test]
fn redo_replays_and_new_edit_clears_redo() {
    let mut store = store();
    store.remove_node(Some("n1")).unwrap();
    let edited = store.start_node().cloned();

    assert!(store.undo());
    assert!(store.find_node("n1").is_some());
    assert!(store.redo());
    assert_eq!(store.start_node().cloned(), edited);
    assert_eq!(store.undo_list().len(), 1);
    assert!(store.redo_list().is_empty());

    assert!(store.undo());
    assert_eq!(store.redo_list().len(), 1);
    store.add_node("start", WorkflowNode::notifier("n2")).unwrap();
    assert!(store.redo_list().is_empty());
}

#[test]
fn history_is_bounded() {
    let mut store = EditorStore::builder()
        .config(EditorConfig::default().with_max_history(3))
        .start_node(three_way())
        .build()
        .unwrap();

    for i in 0..10 {
        store
            .change_node(WorkflowNode::approver("a1").with_name(format!("v{}", i)))
            .unwrap();
        assert!(store.undo_list().len() <= 3);
    }
    assert_eq!(store.undo_list().len(), 3);

    // The oldest snapshots were dropped, so undo stops at v6
    while store.undo() {}
    assert_eq!(store.find_node("a1").unwrap().name.as_deref(), Some("v6"));
}

#[test]
fn listeners_fire_once_and_only_for_changed_fields() {
    let mut store = store();
    let tree_calls = Rc::new(RefCell::new(0));
    let selected_calls = Rc::new(RefCell::new(Vec::new()));
    let undo_depths = Rc::new(RefCell::new(Vec::new()));

    let counter = tree_calls.clone();
    store.subscribe_start_node_change(move |_| *counter.borrow_mut() += 1);
    let seen = selected_calls.clone();
    store.subscribe_selected_change(move |id| seen.borrow_mut().push(id.map(str::to_string)));
    let depths = undo_depths.clone();
    let undo_sub = store.subscribe_undo_list_change(move |list: &SnapshotList| {
        depths.borrow_mut().push(list.len())
    });

    // remove_condition backs up and edits in one update
    store.remove_condition("route", "B").unwrap();
    assert_eq!(*tree_calls.borrow(), 1);
    assert_eq!(*undo_depths.borrow(), vec![1]);
    assert!(selected_calls.borrow().is_empty());

    store.select_node(Some("a1")).unwrap();
    store.select_node(Some("a1")).unwrap();
    assert_eq!(*selected_calls.borrow(), vec![Some("a1".to_string())]);
    assert_eq!(*tree_calls.borrow(), 1);

    assert!(store.unsubscribe(undo_sub));
    assert!(!store.unsubscribe(undo_sub));
    store.remove_node(Some("n1")).unwrap();
    assert_eq!(*tree_calls.borrow(), 2);
    assert_eq!(*undo_depths.borrow(), vec![1]);
}

#[test]
fn failed_operation_notifies_nobody() {
    let mut store = store();
    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();
    store.subscribe_start_node_change(move |_| *counter.borrow_mut() += 1);

    assert!(store.remove_condition("route", "missing").is_err());
    assert!(store.remove_node(Some("start")).is_err());
    assert_eq!(*calls.borrow(), 0);
    assert!(store.undo_list().is_empty());
}
