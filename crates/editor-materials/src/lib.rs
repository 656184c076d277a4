//! Editor Materials
//!
//! Built-in node materials for the Flowpad workflow editor. Each material
//! registers itself through `inventory`, so linking this crate is enough
//! for [`MaterialRegistry::with_builtins`](workflow_editor::MaterialRegistry::with_builtins)
//! to find it.
//!
//! # Categories
//!
//! - **Start**: The initiator at the root of every workflow
//! - **Approval**: Approver and audit (handler) steps
//! - **Notify**: Notifier (carbon-copy) steps
//! - **Branching**: Route nodes and their conditions

pub mod approval;
pub mod branching;
pub mod notify;
pub mod start;

pub use approval::{ApproverMaterial, AuditMaterial};
pub use branching::{ConditionMaterial, RouteMaterial};
pub use notify::NotifierMaterial;
pub use start::StartMaterial;

#[cfg(test)]
mod tests {
    use workflow_editor::{Locales, MaterialRegistry, NodeType};

    #[test]
    fn test_inventory_collects_all_builtins() {
        let registry = MaterialRegistry::with_builtins();
        assert_eq!(registry.len(), 6, "Expected 6 built-in materials");

        for key in ["start", "approver", "notifier", "audit", "route", "condition"] {
            assert!(registry.contains(key), "missing material {}", key);
        }
    }

    #[test]
    fn test_palette_only_offers_chainable_materials() {
        let registry = MaterialRegistry::with_builtins();
        let keys: Vec<&str> = registry.insertable().iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["approver", "audit", "notifier", "route"]);
    }

    #[test]
    fn test_builtin_keys_match_node_types() {
        let registry = MaterialRegistry::with_builtins();
        for material in registry.all() {
            assert_ne!(material.node_type, NodeType::Custom);
            assert_eq!(material.key, material.node_type.as_str());
        }
    }

    #[test]
    fn test_labels_are_localized() {
        let registry = MaterialRegistry::with_builtins();
        let zh = Locales::new("zh-CN");
        let node = registry.create_node("notifier", &zh).unwrap();
        assert_eq!(node.name.as_deref(), Some("抄送人"));
    }
}
