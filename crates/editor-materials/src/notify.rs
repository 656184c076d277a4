//! Notifier material

use serde_json::json;
use workflow_editor::{MaterialDescriptor, NodeMaterial, NodeType};

/// A step that copies the request to its recipients
pub struct NotifierMaterial;

impl MaterialDescriptor for NotifierMaterial {
    fn descriptor() -> NodeMaterial {
        NodeMaterial::new("notifier", NodeType::Notifier, "notifier")
            .with_color("#3296fa")
            .with_icon("notifier")
            .with_default_config(json!({ "recipients": [] }))
    }
}

inventory::submit!(workflow_editor::MaterialFn(NotifierMaterial::descriptor));
