//! Serializable editor commands
//!
//! [`EditorCommand`] mirrors the public [`EditorStore`] operations so a
//! host (or a script) can drive the editor with plain JSON:
//!
//! ```json
//! { "command": "addMaterialNode", "parentId": "start", "material": "approver" }
//! { "command": "transConditionOneStepToLeft", "routeId": "r1", "index": 1 }
//! { "command": "undo" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::EditorStore;
use crate::types::WorkflowNode;

/// One store operation in JSON form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditorCommand {
    AddNode { parent_id: String, node: WorkflowNode },
    AddMaterialNode { parent_id: String, material: String },
    ChangeNode { node: WorkflowNode },
    RemoveNode { id: Option<String> },
    SelectNode { id: Option<String> },
    AddCondition { route_id: String, condition: WorkflowNode },
    ChangeCondition { route_id: String, condition: WorkflowNode },
    RemoveCondition { route_id: String, condition_id: String },
    TransConditionOneStepToLeft { route_id: String, index: usize },
    TransConditionOneStepToRight { route_id: String, index: usize },
    CloneCondition { route_id: String, condition_id: String },
    Undo,
    Redo,
    Validate,
}

impl EditorStore {
    /// Run a command against the store
    ///
    /// `undo`/`redo` with an empty history are logged and ignored, the same
    /// as calling [`EditorStore::undo`] directly.
    pub fn apply(&mut self, command: EditorCommand) -> Result<()> {
        match command {
            EditorCommand::AddNode { parent_id, node } => self.add_node(&parent_id, node),
            EditorCommand::AddMaterialNode {
                parent_id,
                material,
            } => self.add_material_node(&parent_id, &material).map(|_| ()),
            EditorCommand::ChangeNode { node } => self.change_node(node),
            EditorCommand::RemoveNode { id } => self.remove_node(id.as_deref()),
            EditorCommand::SelectNode { id } => self.select_node(id.as_deref()),
            EditorCommand::AddCondition {
                route_id,
                condition,
            } => self.add_condition(&route_id, condition),
            EditorCommand::ChangeCondition {
                route_id,
                condition,
            } => self.change_condition(&route_id, condition),
            EditorCommand::RemoveCondition {
                route_id,
                condition_id,
            } => self.remove_condition(&route_id, &condition_id),
            EditorCommand::TransConditionOneStepToLeft { route_id, index } => {
                self.trans_condition_one_step_to_left(&route_id, index)
            }
            EditorCommand::TransConditionOneStepToRight { route_id, index } => {
                self.trans_condition_one_step_to_right(&route_id, index)
            }
            EditorCommand::CloneCondition {
                route_id,
                condition_id,
            } => self.clone_condition(&route_id, &condition_id).map(|_| ()),
            EditorCommand::Undo => {
                self.undo();
                Ok(())
            }
            EditorCommand::Redo => {
                self.redo();
                Ok(())
            }
            EditorCommand::Validate => self.validate(),
        }
    }
}
