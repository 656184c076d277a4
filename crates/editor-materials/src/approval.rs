//! Approval materials
//!
//! Approver and audit (handler) steps. Both carry an empty assignee list
//! that the host's settings panel fills in.

use serde_json::json;
use workflow_editor::{MaterialDescriptor, NodeMaterial, NodeType};

/// A step that must approve or reject the request
pub struct ApproverMaterial;

impl MaterialDescriptor for ApproverMaterial {
    fn descriptor() -> NodeMaterial {
        NodeMaterial::new("approver", NodeType::Approver, "approver")
            .with_color("#ff943e")
            .with_icon("approver")
            .with_default_config(json!({ "assignees": [], "mode": "or" }))
    }
}

inventory::submit!(workflow_editor::MaterialFn(ApproverMaterial::descriptor));

/// A step that handles the request without approving it
pub struct AuditMaterial;

impl MaterialDescriptor for AuditMaterial {
    fn descriptor() -> NodeMaterial {
        NodeMaterial::new("audit", NodeType::Audit, "audit")
            .with_color("#fa6f32")
            .with_icon("audit")
            .with_default_config(json!({ "assignees": [] }))
    }
}

inventory::submit!(workflow_editor::MaterialFn(AuditMaterial::descriptor));
