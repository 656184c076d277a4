//! Start material
//!
//! The initiator node. It is never offered in the palette; hosts use it to
//! create the root of a new workflow.

use workflow_editor::{MaterialDescriptor, NodeMaterial, NodeType};

/// The workflow initiator
pub struct StartMaterial;

impl MaterialDescriptor for StartMaterial {
    fn descriptor() -> NodeMaterial {
        NodeMaterial::new("start", NodeType::Start, "start")
            .with_color("#576a95")
            .with_icon("user")
    }
}

inventory::submit!(workflow_editor::MaterialFn(StartMaterial::descriptor));
