//! Branching materials
//!
//! A route node splits the flow into conditions; each condition leads its
//! own chain. New routes start with two conditions: a numbered one and a
//! catch-all "other conditions" branch.

use workflow_editor::{MaterialDescriptor, NodeMaterial, NodeType};

/// A conditional branch point
pub struct RouteMaterial;

impl MaterialDescriptor for RouteMaterial {
    fn descriptor() -> NodeMaterial {
        NodeMaterial::new("route", NodeType::Route, "route")
            .with_color("#15bc83")
            .with_icon("branch")
    }
}

inventory::submit!(workflow_editor::MaterialFn(RouteMaterial::descriptor));

/// One branch of a route
///
/// Only valid inside a route's condition list, so it is not offered in the
/// palette.
pub struct ConditionMaterial;

impl MaterialDescriptor for ConditionMaterial {
    fn descriptor() -> NodeMaterial {
        NodeMaterial::new("condition", NodeType::Condition, "condition")
            .with_color("#15bc83")
            .with_default_config(serde_json::json!({ "priority": 0 }))
    }
}

inventory::submit!(workflow_editor::MaterialFn(ConditionMaterial::descriptor));
