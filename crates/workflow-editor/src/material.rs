//! Node material registry
//!
//! A material describes one kind of node a user can place: its label,
//! colour, icon and default configuration, and which structural
//! [`NodeType`] its nodes have. The registry maps material keys to
//! materials and turns a material into a ready-to-insert node.
//!
//! # Registration
//!
//! Built-in materials are collected at link time through `inventory`:
//!
//! ```ignore
//! inventory::submit!(workflow_editor::MaterialFn(ApproverMaterial::descriptor));
//! ```
//!
//! Callers add their own materials with [`MaterialRegistry::register`] or
//! [`MaterialRegistry::merge`]; later registrations override earlier ones
//! with the same key.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::locale::{keys, Locales};
use crate::tree::create_id;
use crate::types::{NodeKind, NodeType, WorkflowNode};

/// Trait for materials that can describe themselves
pub trait MaterialDescriptor {
    /// Get the static description of this material
    fn descriptor() -> NodeMaterial
    where
        Self: Sized;
}

/// Link-time registration of a material
pub struct MaterialFn(pub fn() -> NodeMaterial);

inventory::collect!(MaterialFn);

/// Definition of a renderable node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMaterial {
    /// Registry key; equals the node type name for built-in kinds
    pub key: String,
    /// Structural type of nodes created from this material
    pub node_type: NodeType,
    /// Locale key (or literal text) of the default node name
    pub label: String,
    /// Accent colour used by the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Icon identifier used by the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Configuration given to new nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_config: Option<serde_json::Value>,
}

impl NodeMaterial {
    /// Create a material with no styling or defaults
    pub fn new(key: impl Into<String>, node_type: NodeType, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            node_type,
            label: label.into(),
            color: None,
            icon: None,
            default_config: None,
        }
    }

    /// Set the accent colour
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the configuration given to new nodes
    pub fn with_default_config(mut self, config: serde_json::Value) -> Self {
        self.default_config = Some(config);
        self
    }

    /// Instantiate a node from this material
    ///
    /// The node gets a fresh id and a localized name. Route materials get
    /// two default conditions, the last one named "other conditions".
    pub fn create_node(&self, locales: &Locales) -> WorkflowNode {
        let kind = match self.node_type {
            NodeType::Start => NodeKind::Start,
            NodeType::Approver => NodeKind::Approver,
            NodeType::Notifier => NodeKind::Notifier,
            NodeType::Audit => NodeKind::Audit,
            NodeType::Condition => NodeKind::Condition,
            NodeType::Custom => NodeKind::Custom {
                material: self.key.clone(),
            },
            NodeType::Route => NodeKind::Route {
                condition_node_list: vec![
                    Arc::new(default_condition(locales, 1)),
                    Arc::new(
                        WorkflowNode::condition(create_id())
                            .with_name(locales.t_or_key(keys::OTHER_CONDITIONS)),
                    ),
                ],
            },
        };

        let mut node = WorkflowNode::new(create_id(), kind).with_name(locales.t_or_key(&self.label));
        node.config = self.default_config.clone();
        node
    }
}

/// Condition node named "<condition> <n>"
pub fn default_condition(locales: &Locales, n: usize) -> WorkflowNode {
    WorkflowNode::condition(create_id())
        .with_name(format!("{} {}", locales.t_or_key(keys::CONDITION), n))
}

/// Registry of node materials keyed by material key
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    entries: HashMap<String, NodeMaterial>,
}

impl MaterialRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every material submitted via `inventory`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for material_fn in inventory::iter::<MaterialFn> {
            registry.register((material_fn.0)());
        }
        registry
    }

    /// Register a material, replacing any with the same key
    pub fn register(&mut self, material: NodeMaterial) {
        self.entries.insert(material.key.clone(), material);
    }

    /// Get a material by key
    pub fn get(&self, key: &str) -> Option<&NodeMaterial> {
        self.entries.get(key)
    }

    /// Check if a material key is registered
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All materials, sorted by key for a stable palette order
    pub fn all(&self) -> Vec<&NodeMaterial> {
        let mut all: Vec<&NodeMaterial> = self.entries.values().collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        all
    }

    /// Materials that can be added to a chain from the palette
    pub fn insertable(&self) -> Vec<&NodeMaterial> {
        self.all()
            .into_iter()
            .filter(|m| m.node_type.is_chainable())
            .collect()
    }

    /// Number of registered materials
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another registry into this one
    ///
    /// Entries from `other` override entries in `self` with the same key.
    pub fn merge(&mut self, other: MaterialRegistry) {
        self.entries.extend(other.entries);
    }

    /// Instantiate a node from the material registered under `key`
    pub fn create_node(&self, key: &str, locales: &Locales) -> Result<WorkflowNode> {
        self.get(key)
            .map(|material| material.create_node(locales))
            .ok_or_else(|| EditorError::UnknownMaterial(key.to_string()))
    }
}

impl FromIterator<NodeMaterial> for MaterialRegistry {
    fn from_iter<I: IntoIterator<Item = NodeMaterial>>(iter: I) -> Self {
        let mut registry = Self::new();
        for material in iter {
            registry.register(material);
        }
        registry
    }
}
