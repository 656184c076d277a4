//! The editor store
//!
//! One [`EditorStore`] backs one mounted editor. It owns the current
//! [`EditorState`], and every change goes through the same path:
//!
//! 1. a public operation plans a list of [`EditorAction`]s (usually a
//!    history backup followed by one tree edit),
//! 2. the actions are reduced into a draft state,
//! 3. the draft is committed, then events and subscriptions fire once.
//!
//! If any action fails, the draft is dropped and nothing is committed, so
//! a rejected edit never leaves an orphaned undo point behind.

use std::sync::Arc;

use crate::action::{reduce, EditorAction};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::events::{EditorEvent, EventSink};
use crate::history::HistoryPolicy;
use crate::locale::{keys, Locales};
use crate::material::MaterialRegistry;
use crate::state::{same_node, EditorState, SnapshotList};
use crate::subscribe::{SubscriptionId, Subscriptions};
use crate::tree;
use crate::types::{NodeId, NodeRef, WorkflowNode};
use crate::validation::validate_workflow;

/// State container for one workflow editor
pub struct EditorStore {
    state: EditorState,
    history: HistoryPolicy,
    subscriptions: Subscriptions,
    locales: Locales,
    materials: MaterialRegistry,
    event_sink: Option<Box<dyn EventSink>>,
    debug: bool,
}

impl EditorStore {
    /// Create an empty store from a config, with no materials registered
    pub fn new(config: EditorConfig) -> Self {
        Self::builder().config(config).assemble()
    }

    /// Start building a store
    pub fn builder() -> EditorStoreBuilder {
        EditorStoreBuilder::default()
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Current state
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Root of the workflow tree
    pub fn start_node(&self) -> Option<&NodeRef> {
        self.state.start_node.as_ref()
    }

    /// Currently selected node id
    pub fn selected_id(&self) -> Option<&str> {
        self.state.selected_id.as_deref()
    }

    /// Undo stack, oldest first
    pub fn undo_list(&self) -> &SnapshotList {
        &self.state.undo_list
    }

    /// Redo stack, oldest first
    pub fn redo_list(&self) -> &SnapshotList {
        &self.state.redo_list
    }

    /// Find a node anywhere in the tree
    pub fn find_node(&self, id: &str) -> Option<&NodeRef> {
        self.state
            .start_node
            .as_ref()
            .and_then(|root| tree::find_node(root, id))
    }

    /// Locale manager used for generated text
    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    /// Mutable access to the locale manager
    pub fn locales_mut(&mut self) -> &mut Locales {
        &mut self.locales
    }

    /// Registered node materials
    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Mutable access to the material registry
    pub fn materials_mut(&mut self) -> &mut MaterialRegistry {
        &mut self.materials
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Apply a single action
    pub fn dispatch(&mut self, action: EditorAction) -> Result<()> {
        self.dispatch_all(vec![action])
    }

    /// Apply several actions as one store update
    fn dispatch_all(&mut self, actions: Vec<EditorAction>) -> Result<()> {
        let mut draft = self.state.clone();
        for action in actions {
            if self.debug {
                log::info!("dispatch {}", action.name());
            } else {
                log::debug!("dispatch {}", action.name());
            }
            draft = reduce(&draft, action)?;
        }
        self.commit(draft);
        Ok(())
    }

    /// Apply `action` after recording an undo point
    fn dispatch_with_backup(&mut self, action: EditorAction) -> Result<()> {
        let mut actions = self.history.backup(&self.state);
        actions.push(action);
        self.dispatch_all(actions)
    }

    fn commit(&mut self, next: EditorState) {
        let previous = std::mem::replace(&mut self.state, next);
        self.emit_events(&previous);
        self.subscriptions.notify(&self.state);
    }

    fn emit_events(&self, previous: &EditorState) {
        let Some(sink) = &self.event_sink else {
            return;
        };
        let state = &self.state;
        let mut events = Vec::new();
        if !same_node(&previous.start_node, &state.start_node) {
            events.push(EditorEvent::StartNodeChanged {
                start_node: state.start_node.clone(),
            });
        }
        if previous.selected_id != state.selected_id {
            events.push(EditorEvent::SelectionChanged {
                selected_id: state.selected_id.clone(),
            });
        }
        if !Arc::ptr_eq(&previous.undo_list, &state.undo_list)
            || !Arc::ptr_eq(&previous.redo_list, &state.redo_list)
        {
            events.push(EditorEvent::HistoryChanged {
                undo_depth: state.undo_list.len(),
                redo_depth: state.redo_list.len(),
            });
        }
        for event in events {
            if let Err(e) = sink.send(event) {
                log::warn!("Failed to send editor event: {}", e);
            }
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Push the current tree onto the undo list and clear the redo list
    pub fn backup(&mut self) -> Result<()> {
        let actions = self.history.backup(&self.state);
        self.dispatch_all(actions)
    }

    /// Restore the tree from the last undo snapshot
    ///
    /// Returns `false` (and logs an error) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(actions) = self.history.undo(&self.state) else {
            log::error!("No element in undo list");
            return false;
        };
        self.apply_history(actions)
    }

    /// Restore the tree from the last redo snapshot
    ///
    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(actions) = self.history.redo(&self.state) else {
            log::warn!("No element in redo list");
            return false;
        };
        self.apply_history(actions)
    }

    fn apply_history(&mut self, actions: Vec<EditorAction>) -> bool {
        match self.dispatch_all(actions) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to apply history snapshot: {}", e);
                false
            }
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.state.undo_list.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.state.redo_list.is_empty()
    }

    /// Forget all undo and redo snapshots
    pub fn clear_history(&mut self) -> Result<()> {
        let actions = self.history.clear();
        self.dispatch_all(actions)
    }

    // =========================================================================
    // Tree editing
    // =========================================================================

    /// Replace the whole tree and start a fresh history
    ///
    /// Loading a document is not undoable; the selection is cleared.
    /// Fails with [`EditorError::DuplicateNodeId`] if an id repeats.
    pub fn set_start_node(&mut self, node: Option<WorkflowNode>) -> Result<()> {
        let mut actions = vec![
            EditorAction::SetStartNode {
                node: node.map(Arc::new),
            },
            EditorAction::SelectNode { id: None },
        ];
        actions.extend(self.history.clear());
        self.dispatch_all(actions)
    }

    /// Replace a node (matched by id) with new content
    pub fn change_node(&mut self, node: WorkflowNode) -> Result<()> {
        self.dispatch_with_backup(EditorAction::ChangeNode { node })
    }

    /// Splice a node into the chain after `parent_id`
    pub fn add_node(&mut self, parent_id: &str, node: WorkflowNode) -> Result<()> {
        self.dispatch_with_backup(EditorAction::AddNode {
            parent_id: parent_id.to_string(),
            node,
        })
    }

    /// Create a node from a registered material and add it after `parent_id`
    ///
    /// Returns the id of the new node.
    pub fn add_material_node(&mut self, parent_id: &str, material: &str) -> Result<NodeId> {
        let node = self.materials.create_node(material, &self.locales)?;
        let id = node.id.clone();
        self.add_node(parent_id, node)?;
        Ok(id)
    }

    /// Remove a node; `None` or an empty id is a no-op
    pub fn remove_node(&mut self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) if !id.is_empty() => self.dispatch_with_backup(EditorAction::DeleteNode {
                id: id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Change the selection (not recorded in history)
    pub fn select_node(&mut self, id: Option<&str>) -> Result<()> {
        self.dispatch(EditorAction::SelectNode {
            id: id.map(str::to_string),
        })
    }

    // =========================================================================
    // Route conditions
    // =========================================================================

    /// Look up a route node by id
    fn route(&self, route_id: &str) -> Result<NodeRef> {
        let node = self
            .find_node(route_id)
            .ok_or_else(|| EditorError::NodeNotFound(route_id.to_string()))?;
        if !node.is_route() {
            return Err(EditorError::NotARouteNode(route_id.to_string()));
        }
        Ok(node.clone())
    }

    fn condition_index(route: &WorkflowNode, condition_id: &str) -> Result<usize> {
        route
            .condition_index(condition_id)
            .ok_or_else(|| EditorError::condition_not_found(&route.id, condition_id))
    }

    /// Append a condition to a route
    pub fn add_condition(&mut self, route_id: &str, condition: WorkflowNode) -> Result<()> {
        let route = self.route(route_id)?;
        if !condition.is_condition() {
            return Err(EditorError::InvalidPlacement {
                node_type: condition.node_type(),
                node_id: condition.id,
            });
        }
        let mut conditions = route.conditions().to_vec();
        conditions.push(Arc::new(condition));
        self.change_node(route.with_conditions(conditions))
    }

    /// Replace a condition of a route (matched by id)
    pub fn change_condition(&mut self, route_id: &str, condition: WorkflowNode) -> Result<()> {
        let route = self.route(route_id)?;
        if !condition.is_condition() {
            return Err(EditorError::InvalidPlacement {
                node_type: condition.node_type(),
                node_id: condition.id,
            });
        }
        let index = Self::condition_index(&route, &condition.id)?;
        let mut conditions = route.conditions().to_vec();
        conditions[index] = Arc::new(condition);
        self.change_node(route.with_conditions(conditions))
    }

    /// Remove a condition from a route
    ///
    /// A route that holds two conditions or fewer is removed entirely,
    /// since a branch needs at least two live conditions.
    pub fn remove_condition(&mut self, route_id: &str, condition_id: &str) -> Result<()> {
        let route = self.route(route_id)?;
        Self::condition_index(&route, condition_id)?;
        if route.conditions().len() <= 2 {
            return self.remove_node(Some(route_id));
        }
        let conditions = route
            .conditions()
            .iter()
            .filter(|c| c.id != condition_id)
            .cloned()
            .collect();
        self.change_node(route.with_conditions(conditions))
    }

    /// Swap the condition at `index` with its left neighbour
    ///
    /// No-op at index 0 or past the end of the list.
    pub fn trans_condition_one_step_to_left(&mut self, route_id: &str, index: usize) -> Result<()> {
        let route = self.route(route_id)?;
        let mut conditions = route.conditions().to_vec();
        if index == 0 || index >= conditions.len() {
            return Ok(());
        }
        conditions.swap(index - 1, index);
        self.change_node(route.with_conditions(conditions))
    }

    /// Swap the condition at `index` with its right neighbour
    ///
    /// No-op at the last index or past the end of the list.
    pub fn trans_condition_one_step_to_right(&mut self, route_id: &str, index: usize) -> Result<()> {
        let route = self.route(route_id)?;
        let mut conditions = route.conditions().to_vec();
        if index >= conditions.len().saturating_sub(1) {
            return Ok(());
        }
        conditions.swap(index, index + 1);
        self.change_node(route.with_conditions(conditions))
    }

    /// Duplicate a condition and its whole branch right after the original
    ///
    /// Every node of the copy gets a fresh id and the copy's name gets the
    /// localized "copy" suffix. Returns the id of the new condition.
    pub fn clone_condition(&mut self, route_id: &str, condition_id: &str) -> Result<NodeId> {
        let route = self.route(route_id)?;
        let index = Self::condition_index(&route, condition_id)?;
        let original = &route.conditions()[index];

        let mut copy = tree::reset_ids(original);
        copy.name = Some(format!(
            "{}{}",
            original.name.as_deref().unwrap_or_default(),
            self.locales.t(keys::OF_COPY).unwrap_or_default()
        ));
        let copy_id = copy.id.clone();

        let mut conditions = route.conditions().to_vec();
        conditions.insert(index + 1, Arc::new(copy));
        self.change_node(route.with_conditions(conditions))?;
        Ok(copy_id)
    }

    // =========================================================================
    // Validation and import/export
    // =========================================================================

    /// Check the tree's structural rules
    ///
    /// Returns every problem found as [`EditorError::Invalid`].
    pub fn validate(&self) -> Result<()> {
        let errors = validate_workflow(self.state.start_node.as_deref(), Some(&self.materials));
        if errors.is_empty() {
            Ok(())
        } else {
            Err(EditorError::Invalid(errors))
        }
    }

    /// Serialize the current tree to JSON (`null` when empty)
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.state.start_node)?)
    }

    /// Load a tree from JSON, replacing the current one
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let node: Option<WorkflowNode> = serde_json::from_str(json)?;
        self.set_start_node(node)
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Call `listener` whenever the tree changes
    pub fn subscribe_start_node_change(
        &mut self,
        listener: impl FnMut(Option<&NodeRef>) + 'static,
    ) -> SubscriptionId {
        self.subscriptions.on_start_node(&self.state, listener)
    }

    /// Call `listener` whenever the selection changes
    pub fn subscribe_selected_change(
        &mut self,
        listener: impl FnMut(Option<&str>) + 'static,
    ) -> SubscriptionId {
        self.subscriptions.on_selected(&self.state, listener)
    }

    /// Call `listener` whenever the undo list changes
    pub fn subscribe_undo_list_change(
        &mut self,
        listener: impl FnMut(&SnapshotList) + 'static,
    ) -> SubscriptionId {
        self.subscriptions.on_undo_list(&self.state, listener)
    }

    /// Call `listener` whenever the redo list changes
    pub fn subscribe_redo_list_change(
        &mut self,
        listener: impl FnMut(&SnapshotList) + 'static,
    ) -> SubscriptionId {
        self.subscriptions.on_redo_list(&self.state, listener)
    }

    /// Remove a subscription; returns `false` if it was not active
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(id)
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl std::fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorStore")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("subscriptions", &self.subscriptions.len())
            .field("materials", &self.materials.len())
            .finish()
    }
}

/// Builder for [`EditorStore`]
#[derive(Default)]
pub struct EditorStoreBuilder {
    config: EditorConfig,
    materials: Option<MaterialRegistry>,
    start_node: Option<WorkflowNode>,
    event_sink: Option<Box<dyn EventSink>>,
}

impl EditorStoreBuilder {
    /// Use the given config
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Use the given materials (defaults to an empty registry)
    pub fn materials(mut self, materials: MaterialRegistry) -> Self {
        self.materials = Some(materials);
        self
    }

    /// Seed the store with a tree
    pub fn start_node(mut self, node: WorkflowNode) -> Self {
        self.start_node = Some(node);
        self
    }

    /// Forward change events to `sink`
    pub fn event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.event_sink = Some(Box::new(sink));
        self
    }

    /// Build the store
    ///
    /// Fails with [`EditorError::DuplicateNodeId`] if the seed tree reuses
    /// an id.
    pub fn build(self) -> Result<EditorStore> {
        if let Some(id) = self.start_node.as_ref().and_then(tree::first_duplicate_id) {
            return Err(EditorError::DuplicateNodeId(id));
        }
        Ok(self.assemble())
    }

    fn assemble(self) -> EditorStore {
        let EditorConfig {
            lang,
            max_history,
            debug,
            locales: extra_locales,
        } = self.config;

        let mut locales = Locales::new(lang);
        if let Some(bundle) = extra_locales {
            locales.register_locales(bundle);
        }

        EditorStore {
            state: EditorState::with_start_node(self.start_node.map(Arc::new)),
            history: HistoryPolicy::new(max_history),
            subscriptions: Subscriptions::new(),
            locales,
            materials: self.materials.unwrap_or_default(),
            event_sink: self.event_sink,
            debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::builder::WorkflowBuilder;
    use crate::events::VecEventSink;
    use crate::material::NodeMaterial;
    use crate::types::NodeType;

    fn tree() -> WorkflowNode {
        WorkflowBuilder::new("start")
            .then(WorkflowNode::approver("a1").with_name("Manager"))
            .then_route(
                "route",
                vec![
                    WorkflowNode::condition("A").with_name("A"),
                    WorkflowNode::condition("B").with_name("B"),
                    WorkflowNode::condition("C").with_name("C"),
                ],
            )
            .build()
    }

    fn store() -> EditorStore {
        EditorStore::builder().start_node(tree()).build().unwrap()
    }

    fn condition_ids(store: &EditorStore, route_id: &str) -> Vec<String> {
        store
            .find_node(route_id)
            .unwrap()
            .conditions()
            .iter()
            .map(|c| c.id.clone())
            .collect()
    }

    #[test]
    fn test_add_node_creates_undo_point() {
        let mut store = store();
        store.add_node("start", WorkflowNode::notifier("n1")).unwrap();

        assert_eq!(store.undo_list().len(), 1);
        assert!(store.redo_list().is_empty());
        let root = store.start_node().unwrap();
        assert_eq!(root.child_node.as_ref().unwrap().id, "n1");
    }

    #[test]
    fn test_rejected_edit_leaves_no_undo_point() {
        let mut store = store();
        let err = store.add_node("nope", WorkflowNode::notifier("n1")).unwrap_err();
        assert!(matches!(err, EditorError::NodeNotFound(_)));
        assert!(store.undo_list().is_empty());
    }

    #[test]
    fn test_select_is_not_undoable() {
        let mut store = store();
        store.select_node(Some("a1")).unwrap();
        assert_eq!(store.selected_id(), Some("a1"));
        assert!(store.undo_list().is_empty());
    }

    #[test]
    fn test_remove_node_none_is_noop() {
        let mut store = store();
        store.remove_node(None).unwrap();
        store.remove_node(Some("")).unwrap();
        assert!(store.undo_list().is_empty());

        store.remove_node(Some("a1")).unwrap();
        assert!(store.find_node("a1").is_none());
        assert_eq!(store.undo_list().len(), 1);
    }

    #[test]
    fn test_route_operations_require_route() {
        let mut store = store();
        let err = store.add_condition("a1", WorkflowNode::condition("D")).unwrap_err();
        assert!(matches!(err, EditorError::NotARouteNode(_)));
        let err = store.change_condition("route", WorkflowNode::condition("Z")).unwrap_err();
        assert!(matches!(err, EditorError::ConditionNotFound { .. }));
        let err = store.add_condition("route", WorkflowNode::approver("D")).unwrap_err();
        assert!(matches!(err, EditorError::InvalidPlacement { .. }));
        assert!(store.undo_list().is_empty());
    }

    #[test]
    fn test_add_and_change_condition() {
        let mut store = store();
        store.add_condition("route", WorkflowNode::condition("D")).unwrap();
        assert_eq!(condition_ids(&store, "route"), vec!["A", "B", "C", "D"]);

        store
            .change_condition("route", WorkflowNode::condition("B").with_name("Renamed"))
            .unwrap();
        let route = store.find_node("route").unwrap();
        assert_eq!(route.conditions()[1].name.as_deref(), Some("Renamed"));
        assert_eq!(store.undo_list().len(), 2);
    }

    #[test]
    fn test_remove_condition_single_backup() {
        let mut store = store();
        store.remove_condition("route", "B").unwrap();
        assert_eq!(condition_ids(&store, "route"), vec!["A", "C"]);
        assert_eq!(store.undo_list().len(), 1);
    }

    #[test]
    fn test_clone_condition_uses_locale_suffix() {
        let mut store = EditorStore::builder()
            .config(EditorConfig::default().with_lang("zh-CN"))
            .start_node(tree())
            .build()
            .unwrap();
        let copy_id = store.clone_condition("route", "A").unwrap();
        let route = store.find_node("route").unwrap();
        assert_eq!(route.conditions()[1].id, copy_id);
        assert_eq!(route.conditions()[1].name.as_deref(), Some("A-副本"));
    }

    #[test]
    fn test_add_material_node() {
        let materials: MaterialRegistry = vec![NodeMaterial::new("route", NodeType::Route, "route")]
            .into_iter()
            .collect();
        let mut store = EditorStore::builder()
            .materials(materials)
            .start_node(tree())
            .build()
            .unwrap();

        let id = store.add_material_node("a1", "route").unwrap();
        let node = store.find_node(&id).unwrap();
        assert!(node.is_route());
        assert_eq!(node.name.as_deref(), Some("Route"));
        assert_eq!(node.child_node.as_ref().unwrap().id, "route");
        assert!(store.validate().is_ok());

        let err = store.add_material_node("a1", "missing").unwrap_err();
        assert!(matches!(err, EditorError::UnknownMaterial(_)));
    }

    #[test]
    fn test_set_start_node_resets_history() {
        let mut store = store();
        store.add_node("start", WorkflowNode::notifier("n1")).unwrap();
        store.select_node(Some("n1")).unwrap();
        store.set_start_node(Some(WorkflowNode::start("other"))).unwrap();

        assert_eq!(store.start_node().unwrap().id, "other");
        assert!(store.undo_list().is_empty());
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn test_validate() {
        let store = store();
        // The three-way route is well formed
        assert!(store.validate().is_ok());

        let empty = EditorStore::default();
        let err = empty.validate().unwrap_err();
        assert!(matches!(err, EditorError::Invalid(ref issues) if issues.len() == 1));
        assert!(err.to_string().contains("no start node"));
    }

    #[test]
    fn test_export_import() {
        let mut store = store();
        let json = store.export_json().unwrap();
        let mut other = EditorStore::default();
        other.import_json(&json).unwrap();
        assert_eq!(other.start_node(), store.start_node());

        let err = store
            .import_json(r#"{"id":"x","nodeType":"start","childNode":{"id":"x","nodeType":"audit"}}"#)
            .unwrap_err();
        assert!(matches!(err, EditorError::DuplicateNodeId(_)));
        assert_eq!(store.start_node().unwrap().id, "start");

        store.import_json("null").unwrap();
        assert!(store.start_node().is_none());
    }

    #[test]
    fn test_events_emitted_once_per_update() {
        let sink = Arc::new(VecEventSink::new());
        let mut store = EditorStore::builder()
            .start_node(tree())
            .event_sink(sink.clone())
            .build()
            .unwrap();

        store.add_node("start", WorkflowNode::notifier("n1")).unwrap();
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], EditorEvent::StartNodeChanged { .. }));
        assert!(matches!(
            events[1],
            EditorEvent::HistoryChanged {
                undo_depth: 1,
                redo_depth: 0
            }
        ));

        sink.clear();
        store.select_node(Some("n1")).unwrap();
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], EditorEvent::SelectionChanged { .. }));
    }

    #[test]
    fn test_subscription_sees_committed_value() {
        let mut store = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe_start_node_change(move |node| {
            sink.borrow_mut().push(node.map(|n| n.child_node.as_ref().unwrap().id.clone()));
        });

        store.add_node("start", WorkflowNode::notifier("n1")).unwrap();
        assert_eq!(*seen.borrow(), vec![Some("n1".to_string())]);
    }
}
